//! The `skillmap requests` command.

use std::path::PathBuf;

use anyhow::Result;

use skillmap_planner::requests::all_requests;

use super::load_workbook_analysis;

pub async fn execute(
    workbook: PathBuf,
    target: Option<f64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if let Some(target) = target {
        anyhow::ensure!(
            (0.0..=100.0).contains(&target),
            "target must be between 0 and 100"
        );
    }

    let (config, loaded) = load_workbook_analysis(&workbook, None, config_path).await?;
    let target = target.unwrap_or(config.target_accuracy);
    let profile = config.profile.to_profile();

    let requests = all_requests(&loaded.analysis, &profile, target);
    println!("{}", serde_json::to_string_pretty(&requests)?);

    Ok(())
}
