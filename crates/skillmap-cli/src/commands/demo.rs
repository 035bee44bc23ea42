//! The `skillmap demo` command.

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use skillmap_core::pipeline::{AnalysisOptions, Session};
use skillmap_planner::config::load_config_from;

use super::{print_groups, print_overview, print_skill_table, OutputFormat};

pub fn execute(
    students: Option<usize>,
    seed: Option<u64>,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let student_count = students.unwrap_or(config.demo.students);
    anyhow::ensure!(student_count >= 1, "students must be at least 1");

    // Always run from a concrete seed so the printed class can be regenerated.
    let seed = seed.or(config.demo.seed).unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut session = Session::new(AnalysisOptions::default());
    let loaded = session.load_demo(student_count, Some(seed), &mut rng);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&loaded.analysis)?);
        }
        OutputFormat::Text => {
            println!("Demo class: {student_count} students (seed {seed})\n");
            print_overview(&loaded.analysis);
            print_skill_table(&loaded.analysis);
            println!();
            print_groups(&loaded.analysis);
        }
    }

    Ok(())
}
