//! Class overview figures for dashboards.

use serde::Serialize;

use crate::model::{ClassAnalysis, ProficiencyLevel};

/// Number of students whose overall score falls in one level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCount {
    pub level: ProficiencyLevel,
    pub count: usize,
}

/// One entry of the class-wide weakest ranking, with its details.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakSkillSummary {
    pub skill_code: String,
    pub description: String,
    pub avg_accuracy: f64,
}

/// Headline numbers derived from a `ClassAnalysis`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOverview {
    pub total_students: usize,
    pub skill_count: usize,
    /// Mean of the students' overall scores, 0 for an empty class.
    pub class_average: f64,
    /// Overall-score distribution, best level first.
    pub level_distribution: Vec<LevelCount>,
    pub students_needing_support: usize,
    pub group_count: usize,
    pub weakest_skills: Vec<WeakSkillSummary>,
}

impl ClassOverview {
    pub fn from_analysis(analysis: &ClassAnalysis) -> Self {
        let total_students = analysis.students.len();
        let class_average = if total_students == 0 {
            0.0
        } else {
            analysis
                .students
                .iter()
                .map(|s| s.overall_score)
                .sum::<f64>()
                / total_students as f64
        };

        let level_distribution = ProficiencyLevel::ALL
            .iter()
            .map(|&level| LevelCount {
                level,
                count: analysis
                    .students
                    .iter()
                    .filter(|s| s.overall_level == level)
                    .count(),
            })
            .collect();

        let weakest_skills = analysis
            .weakest_skills_classwide
            .iter()
            .filter_map(|code| analysis.skill_stats.get(code))
            .map(|stat| WeakSkillSummary {
                skill_code: stat.skill_code.clone(),
                description: stat.description.clone(),
                avg_accuracy: stat.avg_accuracy,
            })
            .collect();

        Self {
            total_students,
            skill_count: analysis.skill_stats.len(),
            class_average,
            level_distribution,
            students_needing_support: analysis.groups.iter().map(|g| g.students.len()).sum(),
            group_count: analysis.groups.len(),
            weakest_skills,
        }
    }

    pub fn count(&self, level: ProficiencyLevel) -> usize {
        self.level_distribution
            .iter()
            .find(|c| c.level == level)
            .map_or(0, |c| c.count)
    }
}
