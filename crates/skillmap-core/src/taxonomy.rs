//! Skill taxonomy construction from the question mapping sheet.

use std::collections::HashMap;

use crate::headers;
use crate::model::QuestionMapping;
use crate::workbook::Row;

/// A skill known to the taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillInfo {
    pub code: String,
    pub description: String,
}

/// Question → skill lookup plus ordered skill metadata.
///
/// Only skills referenced by at least one question are kept, in the order
/// they were first registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillTaxonomy {
    questions: Vec<QuestionMapping>,
    question_index: HashMap<String, usize>,
    skills: Vec<SkillInfo>,
    skipped_rows: usize,
}

impl SkillTaxonomy {
    /// Build from the rows of the mapping sheet, skipping invalid rows.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut builder = TaxonomyBuilder::default();
        for (index, row) in rows.iter().enumerate() {
            if let Err(reason) = builder.add_row(row) {
                tracing::debug!("skipping mapping row {}: {reason}", index + 1);
            }
        }
        builder.finish()
    }

    pub fn question(&self, question_no: &str) -> Option<&QuestionMapping> {
        self.question_index
            .get(question_no)
            .and_then(|&i| self.questions.get(i))
    }

    pub fn questions(&self) -> &[QuestionMapping] {
        &self.questions
    }

    pub fn skills(&self) -> &[SkillInfo] {
        &self.skills
    }

    pub fn skill(&self, code: &str) -> Option<&SkillInfo> {
        self.skills.iter().find(|s| s.code == code)
    }

    /// Description for a skill code, empty if unknown.
    pub fn description(&self, code: &str) -> &str {
        self.skill(code).map_or("", |s| s.description.as_str())
    }

    /// Position of a skill in taxonomy order.
    pub fn skill_position(&self, code: &str) -> Option<usize> {
        self.skills.iter().position(|s| s.code == code)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of mapping rows rejected while building.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Sum of max marks over the questions of one skill.
    pub fn skill_max_marks(&self, code: &str) -> f64 {
        self.questions
            .iter()
            .filter(|q| q.skill_code == code)
            .map(|q| q.max_marks)
            .sum()
    }
}

/// Incremental taxonomy builder.
#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    questions: Vec<QuestionMapping>,
    question_index: HashMap<String, usize>,
    skills: Vec<SkillInfo>,
    skill_index: HashMap<String, usize>,
    skipped_rows: usize,
}

impl TaxonomyBuilder {
    /// Resolve and register one mapping row.
    ///
    /// Returns the reason when the row is rejected.
    pub fn add_row(&mut self, row: &Row) -> Result<(), String> {
        match parse_mapping_row(row) {
            Ok(mapping) => {
                self.register(mapping);
                Ok(())
            }
            Err(reason) => {
                self.skipped_rows += 1;
                Err(reason)
            }
        }
    }

    /// Register a mapping. A repeated question number replaces the earlier
    /// entry; a repeated skill code replaces the description.
    pub fn register(&mut self, mapping: QuestionMapping) {
        match self.skill_index.get(&mapping.skill_code) {
            Some(&i) => self.skills[i].description = mapping.skill_description.clone(),
            None => {
                self.skill_index
                    .insert(mapping.skill_code.clone(), self.skills.len());
                self.skills.push(SkillInfo {
                    code: mapping.skill_code.clone(),
                    description: mapping.skill_description.clone(),
                });
            }
        }

        match self.question_index.get(&mapping.question_no) {
            Some(&i) => self.questions[i] = mapping,
            None => {
                self.question_index
                    .insert(mapping.question_no.clone(), self.questions.len());
                self.questions.push(mapping);
            }
        }
    }

    pub fn finish(self) -> SkillTaxonomy {
        let questions = self.questions;
        let skills: Vec<SkillInfo> = self
            .skills
            .into_iter()
            .filter(|s| questions.iter().any(|q| q.skill_code == s.code))
            .collect();

        SkillTaxonomy {
            questions,
            question_index: self.question_index,
            skills,
            skipped_rows: self.skipped_rows,
        }
    }
}

fn parse_mapping_row(row: &Row) -> Result<QuestionMapping, String> {
    let question_no = row
        .first_of(headers::QUESTION_NO)
        .and_then(|v| v.as_text())
        .ok_or("missing question number")?;
    let skill_code = row
        .first_of(headers::SKILL_CODE)
        .and_then(|v| v.as_text())
        .ok_or_else(|| format!("question {question_no}: missing skill code"))?;
    let skill_description = row
        .first_of(headers::SKILL_DESCRIPTION)
        .and_then(|v| v.as_text())
        .unwrap_or_default();
    let max_marks = row
        .first_of(headers::MAX_MARKS)
        .and_then(|v| v.as_number())
        .ok_or_else(|| format!("question {question_no}: max marks is not a number"))?;
    if max_marks <= 0.0 {
        return Err(format!(
            "question {question_no}: max marks must be positive, got {max_marks}"
        ));
    }

    Ok(QuestionMapping {
        question_no,
        skill_code,
        skill_description,
        max_marks,
    })
}
