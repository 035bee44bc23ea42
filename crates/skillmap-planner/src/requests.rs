//! Generation requests derived from a class analysis.

use skillmap_core::model::{ClassAnalysis, RemedialGroup};
use skillmap_core::traits::{
    GenerationRequest, RemedialPlanRequest, SkillFocus, StudentReportRequest, TeacherProfile,
};

/// One remedial plan request per group, in group order.
pub fn plan_requests(
    analysis: &ClassAnalysis,
    profile: &TeacherProfile,
    target_accuracy: f64,
) -> Vec<RemedialPlanRequest> {
    analysis
        .groups
        .iter()
        .map(|group| RemedialPlanRequest {
            group_id: group.id.clone(),
            skill_code: group.skill_code.clone(),
            skill_description: group.skill_description.clone(),
            current_accuracy: group_accuracy(group),
            target_accuracy,
            student_names: group
                .students
                .iter()
                .map(|s| s.student_name.clone())
                .collect(),
            profile: profile.clone(),
        })
        .collect()
}

/// One report request per student, in student order.
pub fn report_requests(
    analysis: &ClassAnalysis,
    profile: &TeacherProfile,
    target_accuracy: f64,
) -> Vec<StudentReportRequest> {
    analysis
        .students
        .iter()
        .map(|student| StudentReportRequest {
            student_id: student.student_id.clone(),
            student_name: student.student_name.clone(),
            overall_score: student.overall_score,
            overall_level: student.overall_level,
            weakest_skills: student
                .weakest_skills
                .iter()
                .map(|p| SkillFocus {
                    skill_code: p.skill_code.clone(),
                    skill_description: p.skill_description.clone(),
                    accuracy: p.accuracy,
                })
                .collect(),
            target_accuracy,
            profile: profile.clone(),
        })
        .collect()
}

/// Plan requests followed by report requests.
pub fn all_requests(
    analysis: &ClassAnalysis,
    profile: &TeacherProfile,
    target_accuracy: f64,
) -> Vec<GenerationRequest> {
    plan_requests(analysis, profile, target_accuracy)
        .into_iter()
        .map(GenerationRequest::RemedialPlan)
        .chain(
            report_requests(analysis, profile, target_accuracy)
                .into_iter()
                .map(GenerationRequest::StudentReport),
        )
        .collect()
}

/// Mean accuracy of the group's students on the group skill.
fn group_accuracy(group: &RemedialGroup) -> f64 {
    let accuracies: Vec<f64> = group
        .students
        .iter()
        .filter_map(|s| s.performance(&group.skill_code))
        .map(|p| p.accuracy)
        .collect();
    if accuracies.is_empty() {
        0.0
    } else {
        accuracies.iter().sum::<f64>() / accuracies.len() as f64
    }
}
