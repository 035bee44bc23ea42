//! Core data model types for skillmap.
//!
//! Everything downstream of the pipeline (dashboards, exports, content
//! generation) reads these types and never mutates them. Field names
//! serialize in camelCase.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::workbook::CellValue;

/// Accuracy below which a skill counts as weak for a student.
pub const WEAK_SKILL_THRESHOLD: f64 = 70.0;

/// Number of skills reported in the class-wide weakest ranking.
pub const CLASSWIDE_WEAKEST_COUNT: usize = 3;

/// One row of the question mapping table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMapping {
    pub question_no: String,
    pub skill_code: String,
    pub skill_description: String,
    pub max_marks: f64,
}

/// A raw student row after identity resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRawScore {
    pub student_id: String,
    pub student_name: String,
    /// Question number → raw cell, in column order.
    pub scores: Vec<(String, CellValue)>,
}

/// Ordinal proficiency bucket over an accuracy percentage.
///
/// Variants are declared best first, so `Strong < Critical` in `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Strong,
    Moderate,
    Weak,
    Critical,
}

/// A student's result on one skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPerformance {
    pub skill_code: String,
    pub skill_description: String,
    pub marks_earned: f64,
    pub total_max_marks: f64,
    /// Percentage in `[0, 100]`; 0 when no marks were possible.
    pub accuracy: f64,
    pub level: ProficiencyLevel,
}

/// Full analysis for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnalysis {
    pub student_id: String,
    pub student_name: String,
    pub overall_score: f64,
    pub overall_level: ProficiencyLevel,
    /// One entry per known skill, in taxonomy order.
    pub skill_performances: Vec<SkillPerformance>,
    /// Entries below 70% accuracy, ascending by accuracy.
    pub weakest_skills: Vec<SkillPerformance>,
}

impl StudentAnalysis {
    /// The single lowest-accuracy weak skill, if any.
    pub fn worst_skill(&self) -> Option<&SkillPerformance> {
        self.weakest_skills.first()
    }

    pub fn performance(&self, skill_code: &str) -> Option<&SkillPerformance> {
        self.skill_performances
            .iter()
            .find(|p| p.skill_code == skill_code)
    }
}

/// Class-wide statistics for one skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStat {
    pub skill_code: String,
    pub description: String,
    pub avg_accuracy: f64,
    pub strong_count: usize,
    pub moderate_count: usize,
    pub weak_count: usize,
    pub critical_count: usize,
}

impl SkillStat {
    pub fn count(&self, level: ProficiencyLevel) -> usize {
        match level {
            ProficiencyLevel::Strong => self.strong_count,
            ProficiencyLevel::Moderate => self.moderate_count,
            ProficiencyLevel::Weak => self.weak_count,
            ProficiencyLevel::Critical => self.critical_count,
        }
    }

    pub fn total(&self) -> usize {
        self.strong_count + self.moderate_count + self.weak_count + self.critical_count
    }
}

/// Skill code → `SkillStat`, kept in taxonomy order.
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillStatMap {
    stats: Vec<SkillStat>,
}

impl SkillStatMap {
    pub fn new(stats: Vec<SkillStat>) -> Self {
        Self { stats }
    }

    pub fn get(&self, skill_code: &str) -> Option<&SkillStat> {
        self.stats.iter().find(|s| s.skill_code == skill_code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillStat> {
        self.stats.iter()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.stats.iter().map(|s| s.skill_code.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a SkillStatMap {
    type Item = &'a SkillStat;
    type IntoIter = std::slice::Iter<'a, SkillStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.stats.iter()
    }
}

impl Serialize for SkillStatMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.stats.iter().map(|s| (&s.skill_code, s)))
    }
}

/// Students sharing the same single worst skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedialGroup {
    /// `group-<skillCode>`.
    pub id: String,
    pub skill_code: String,
    pub skill_description: String,
    pub students: Vec<StudentAnalysis>,
}

impl RemedialGroup {
    pub fn group_id(skill_code: &str) -> String {
        format!("group-{skill_code}")
    }
}

/// The complete output of the analysis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAnalysis {
    /// Students in input row order.
    pub students: Vec<StudentAnalysis>,
    pub skill_stats: SkillStatMap,
    /// Up to three skill codes with the lowest class average, ascending.
    pub weakest_skills_classwide: Vec<String>,
    pub groups: Vec<RemedialGroup>,
}

impl ClassAnalysis {
    pub fn student(&self, student_id: &str) -> Option<&StudentAnalysis> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    pub fn group_for_skill(&self, skill_code: &str) -> Option<&RemedialGroup> {
        self.groups.iter().find(|g| g.skill_code == skill_code)
    }

    /// Group id for every grouped student, keyed by student id.
    pub fn group_membership(&self) -> BTreeMap<&str, &str> {
        self.groups
            .iter()
            .flat_map(|g| {
                g.students
                    .iter()
                    .map(move |s| (s.student_id.as_str(), g.id.as_str()))
            })
            .collect()
    }
}

/// How raw scores outside `[0, max_marks]` are treated before accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipPolicy {
    /// Clamp into `[0, max_marks]`.
    #[default]
    Symmetric,
    /// Only clamp scores above `max_marks`; negative scores pass through.
    UpperOnly,
}

impl ClipPolicy {
    pub fn apply(self, score: f64, max_marks: f64) -> f64 {
        match self {
            ClipPolicy::Symmetric => score.clamp(0.0, max_marks),
            ClipPolicy::UpperOnly => score.min(max_marks),
        }
    }
}

impl fmt::Display for ClipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipPolicy::Symmetric => write!(f, "symmetric"),
            ClipPolicy::UpperOnly => write!(f, "upper-only"),
        }
    }
}

impl FromStr for ClipPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "symmetric" => Ok(ClipPolicy::Symmetric),
            "upper-only" | "upper_only" | "upper" => Ok(ClipPolicy::UpperOnly),
            other => Err(format!("unknown clip policy: {other}")),
        }
    }
}
