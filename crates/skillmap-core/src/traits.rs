//! Content generation seam.
//!
//! Remedial plans and student reports are written by an external generation
//! service. The core only describes what it needs (a skill, where the
//! students are, where they should get to, who is teaching) and accepts either
//! structured or free-text content back. Implementations live outside this
//! crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::ProficiencyLevel;

// ---------------------------------------------------------------------------
// Generator trait
// ---------------------------------------------------------------------------

/// A backend that turns analysis facts into teaching content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Human-readable generator name.
    fn name(&self) -> &str;

    /// Produce content for one request.
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<GeneratedContent>;
}

/// Who the content is written for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub subject: String,
}

/// A weak skill as reported to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillFocus {
    pub skill_code: String,
    pub skill_description: String,
    pub accuracy: f64,
}

/// Inputs for a remedial plan covering one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedialPlanRequest {
    pub group_id: String,
    pub skill_code: String,
    pub skill_description: String,
    /// Mean accuracy of the group's students on the skill.
    pub current_accuracy: f64,
    pub target_accuracy: f64,
    pub student_names: Vec<String>,
    pub profile: TeacherProfile,
}

/// Inputs for an individual student report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportRequest {
    pub student_id: String,
    pub student_name: String,
    pub overall_score: f64,
    pub overall_level: ProficiencyLevel,
    pub weakest_skills: Vec<SkillFocus>,
    pub target_accuracy: f64,
    pub profile: TeacherProfile,
}

/// Everything the generator can be asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GenerationRequest {
    RemedialPlan(RemedialPlanRequest),
    StudentReport(StudentReportRequest),
}

impl GenerationRequest {
    /// Stable key identifying the subject of the request.
    pub fn key(&self) -> &str {
        match self {
            GenerationRequest::RemedialPlan(r) => &r.group_id,
            GenerationRequest::StudentReport(r) => &r.student_id,
        }
    }
}

/// Generator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "body", rename_all = "camelCase")]
pub enum GeneratedContent {
    Structured(serde_json::Value),
    Text(String),
}

impl GeneratedContent {
    /// Decode content as a remedial plan.
    ///
    /// Structured content that matches the plan shape becomes `Plan`;
    /// anything else is kept as text. A plan must at least carry
    /// `objectives` and `activities`.
    pub fn into_plan(self) -> PlanContent {
        match self {
            GeneratedContent::Structured(value) => {
                match serde_json::from_value::<RemedialPlan>(value.clone()) {
                    Ok(plan) => PlanContent::Plan(plan),
                    Err(_) => PlanContent::Text(value.to_string()),
                }
            }
            GeneratedContent::Text(text) => PlanContent::Text(text),
        }
    }
}

/// A structured remedial plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedialPlan {
    pub objectives: Vec<String>,
    pub activities: Vec<String>,
    #[serde(default)]
    pub assessment: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
}

/// A plan as consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "body", rename_all = "camelCase")]
pub enum PlanContent {
    Plan(RemedialPlan),
    Text(String),
}
