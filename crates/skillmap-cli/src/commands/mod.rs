//! Subcommand implementations and shared console output.

pub mod analyze;
pub mod demo;
pub mod groups;
pub mod init;
pub mod requests;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::{Cell, Table};

use skillmap_core::model::ClassAnalysis;
use skillmap_core::pipeline::{AnalysisOptions, LoadedAnalysis, Session};
use skillmap_core::summary::ClassOverview;
use skillmap_core::ClipPolicy;
use skillmap_planner::config::{load_config_from, SkillmapConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Load config, then read and analyze `workbook`.
pub async fn load_workbook_analysis(
    workbook: &Path,
    clip: Option<ClipPolicy>,
    config_path: Option<PathBuf>,
) -> Result<(SkillmapConfig, LoadedAnalysis)> {
    let config = load_config_from(config_path.as_deref())?;
    let options = AnalysisOptions {
        clip_policy: clip.unwrap_or(config.clip_policy),
    };

    let mut session = Session::new(options);
    let loaded = session
        .load_file(workbook)
        .await
        .with_context(|| format!("failed to analyze {}", workbook.display()))?
        .clone();
    Ok((config, loaded))
}

pub fn print_overview(analysis: &ClassAnalysis) {
    let overview = ClassOverview::from_analysis(analysis);

    println!(
        "Class overview: {} students, {} skills, class average {:.1}%",
        overview.total_students, overview.skill_count, overview.class_average
    );
    let levels: Vec<String> = overview
        .level_distribution
        .iter()
        .map(|c| format!("{} {}", c.level, c.count))
        .collect();
    println!("Levels: {}", levels.join(" | "));
    println!(
        "Students needing support: {} in {} group(s)",
        overview.students_needing_support, overview.group_count
    );
    if !overview.weakest_skills.is_empty() {
        let weakest: Vec<String> = overview
            .weakest_skills
            .iter()
            .map(|w| format!("{} ({}) {:.1}%", w.skill_code, w.description, w.avg_accuracy))
            .collect();
        println!("Weakest skills: {}", weakest.join(", "));
    }
}

pub fn print_skill_table(analysis: &ClassAnalysis) {
    if analysis.skill_stats.is_empty() {
        println!("No skills found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Skill",
        "Description",
        "Avg",
        "Strong",
        "Moderate",
        "Weak",
        "Critical",
    ]);

    for stat in &analysis.skill_stats {
        table.add_row(vec![
            Cell::new(&stat.skill_code),
            Cell::new(&stat.description),
            Cell::new(format!("{:.1}%", stat.avg_accuracy)),
            Cell::new(stat.strong_count),
            Cell::new(stat.moderate_count),
            Cell::new(stat.weak_count),
            Cell::new(stat.critical_count),
        ]);
    }

    println!("\n{table}");
}

pub fn print_groups(analysis: &ClassAnalysis) {
    if analysis.groups.is_empty() {
        println!("No remedial groups: every student is at 70% or above on every skill.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Group", "Skill", "Description", "Students", "Names"]);

    for group in &analysis.groups {
        let names: Vec<&str> = group
            .students
            .iter()
            .map(|s| s.student_name.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(&group.id),
            Cell::new(&group.skill_code),
            Cell::new(&group.skill_description),
            Cell::new(group.students.len()),
            Cell::new(names.join(", ")),
        ]);
    }

    println!("{table}");
}
