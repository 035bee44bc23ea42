//! Remedial grouping by each student's single worst skill.

use std::collections::HashMap;

use crate::model::{RemedialGroup, StudentAnalysis};

/// Partition students into remedial groups.
///
/// A student joins the group of `weakest_skills[0]`; students without weak
/// skills join none. Groups appear in the order their skill was first seen
/// and keep students in input order.
pub fn group_students(students: &[StudentAnalysis]) -> Vec<RemedialGroup> {
    let mut groups: Vec<RemedialGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for student in students {
        let Some(worst) = student.worst_skill() else {
            continue;
        };
        let slot = *index.entry(worst.skill_code.as_str()).or_insert_with(|| {
            groups.push(RemedialGroup {
                id: RemedialGroup::group_id(&worst.skill_code),
                skill_code: worst.skill_code.clone(),
                skill_description: worst.skill_description.clone(),
                students: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].students.push(student.clone());
    }

    groups
}
