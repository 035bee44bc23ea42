//! Score normalization: raw student rows into per-skill mark totals.

use std::collections::HashSet;

use crate::headers;
use crate::model::{ClipPolicy, StudentRawScore};
use crate::taxonomy::SkillTaxonomy;
use crate::workbook::Row;

/// Earned and possible marks for one scope (a skill, or a whole row).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkTotals {
    pub earned: f64,
    pub possible: f64,
}

impl MarkTotals {
    pub fn add(&mut self, earned: f64, possible: f64) {
        self.earned += earned;
        self.possible += possible;
    }
}

/// Per-skill and whole-row totals for one student.
///
/// `skills` is parallel to `SkillTaxonomy::skills()`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScores {
    pub skills: Vec<MarkTotals>,
    pub overall: MarkTotals,
}

/// Resolve a raw sheet row into a student record.
///
/// Returns `None` when the student name or id is missing; such rows are
/// excluded from the analysis. Only columns matching a known question are
/// kept, and a question repeated across columns keeps its first non-empty
/// cell.
pub fn resolve_student(row: &Row, taxonomy: &SkillTaxonomy) -> Option<StudentRawScore> {
    let student_name = row.first_of(headers::STUDENT_NAME).and_then(|v| v.as_text());
    let student_id = row.first_of(headers::STUDENT_ID).and_then(|v| v.as_text());
    let (Some(student_name), Some(student_id)) = (student_name, student_id) else {
        return None;
    };

    let mut seen = HashSet::new();
    let scores = row
        .iter()
        .filter(|(header, value)| taxonomy.question(header).is_some() && !value.is_empty())
        .filter(|(header, _)| seen.insert(*header))
        .map(|(header, value)| (header.to_string(), value.clone()))
        .collect();

    Some(StudentRawScore {
        student_id,
        student_name,
        scores,
    })
}

/// Accumulate a student's marks per skill.
///
/// Every known skill starts at zero so it is represented even when the
/// student answered none of its questions. Cells that do not parse as a
/// number are skipped.
pub fn normalize_scores(
    student: &StudentRawScore,
    taxonomy: &SkillTaxonomy,
    policy: ClipPolicy,
) -> NormalizedScores {
    let mut skills = vec![MarkTotals::default(); taxonomy.skill_count()];
    let mut overall = MarkTotals::default();

    for (question_no, value) in &student.scores {
        let Some(question) = taxonomy.question(question_no) else {
            continue;
        };
        let Some(raw) = value.as_number() else {
            tracing::debug!(
                student = %student.student_id,
                question = %question_no,
                "skipping non-numeric score"
            );
            continue;
        };
        let Some(position) = taxonomy.skill_position(&question.skill_code) else {
            continue;
        };

        let earned = policy.apply(raw, question.max_marks);
        skills[position].add(earned, question.max_marks);
        overall.add(earned, question.max_marks);
    }

    NormalizedScores { skills, overall }
}
