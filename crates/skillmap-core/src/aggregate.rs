//! Class-wide skill statistics.

use crate::model::{ProficiencyLevel, SkillStat, SkillStatMap, StudentAnalysis};
use crate::taxonomy::SkillTaxonomy;

/// Reduce the student set into one `SkillStat` per known skill.
///
/// Level counts are taken from each performance's stored `level`, so they
/// always agree with what the student view shows.
pub fn aggregate_skills(students: &[StudentAnalysis], taxonomy: &SkillTaxonomy) -> SkillStatMap {
    let stats = taxonomy
        .skills()
        .iter()
        .map(|skill| {
            let performances: Vec<_> = students
                .iter()
                .filter_map(|s| s.performance(&skill.code))
                .collect();

            let avg_accuracy = if performances.is_empty() {
                0.0
            } else {
                performances.iter().map(|p| p.accuracy).sum::<f64>() / performances.len() as f64
            };
            let count = |level: ProficiencyLevel| {
                performances.iter().filter(|p| p.level == level).count()
            };

            SkillStat {
                skill_code: skill.code.clone(),
                description: skill.description.clone(),
                avg_accuracy,
                strong_count: count(ProficiencyLevel::Strong),
                moderate_count: count(ProficiencyLevel::Moderate),
                weak_count: count(ProficiencyLevel::Weak),
                critical_count: count(ProficiencyLevel::Critical),
            }
        })
        .collect();

    SkillStatMap::new(stats)
}

/// The `limit` skill codes with the lowest class average, ascending.
///
/// Stable, so equal averages keep taxonomy order.
pub fn weakest_skills_classwide(stats: &SkillStatMap, limit: usize) -> Vec<String> {
    let mut ranked: Vec<&SkillStat> = stats.iter().collect();
    ranked.sort_by(|a, b| a.avg_accuracy.total_cmp(&b.avg_accuracy));
    ranked
        .into_iter()
        .take(limit)
        .map(|s| s.skill_code.clone())
        .collect()
}
