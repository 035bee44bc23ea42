//! Per-student analysis.

use crate::model::{
    ClipPolicy, ProficiencyLevel, SkillPerformance, StudentAnalysis, StudentRawScore,
    WEAK_SKILL_THRESHOLD,
};
use crate::normalizer::normalize_scores;
use crate::proficiency::accuracy;
use crate::taxonomy::SkillTaxonomy;

/// Analyze one student against the taxonomy.
pub fn analyze_student(
    student: &StudentRawScore,
    taxonomy: &SkillTaxonomy,
    policy: ClipPolicy,
) -> StudentAnalysis {
    let totals = normalize_scores(student, taxonomy, policy);

    let skill_performances: Vec<SkillPerformance> = taxonomy
        .skills()
        .iter()
        .zip(&totals.skills)
        .map(|(skill, marks)| {
            let acc = accuracy(marks.earned, marks.possible);
            SkillPerformance {
                skill_code: skill.code.clone(),
                skill_description: skill.description.clone(),
                marks_earned: marks.earned,
                total_max_marks: marks.possible,
                accuracy: acc,
                level: ProficiencyLevel::classify(acc),
            }
        })
        .collect();

    let overall_score = accuracy(totals.overall.earned, totals.overall.possible);

    StudentAnalysis {
        student_id: student.student_id.clone(),
        student_name: student.student_name.clone(),
        overall_score,
        overall_level: ProficiencyLevel::classify(overall_score),
        weakest_skills: weakest_skills(&skill_performances),
        skill_performances,
    }
}

/// Performances below the weak threshold, ascending by accuracy.
///
/// The sort is stable, so ties keep taxonomy order.
pub fn weakest_skills(performances: &[SkillPerformance]) -> Vec<SkillPerformance> {
    let mut weak: Vec<SkillPerformance> = performances
        .iter()
        .filter(|p| p.accuracy < WEAK_SKILL_THRESHOLD)
        .cloned()
        .collect();
    weak.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
    weak
}
