//! The `skillmap groups` command.

use std::path::PathBuf;

use anyhow::Result;

use skillmap_core::ClipPolicy;

use super::{load_workbook_analysis, print_groups, OutputFormat};

pub async fn execute(
    workbook: PathBuf,
    format: OutputFormat,
    clip: Option<ClipPolicy>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, loaded) = load_workbook_analysis(&workbook, clip, config_path).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&loaded.analysis.groups)?);
        }
        OutputFormat::Text => print_groups(&loaded.analysis),
    }

    Ok(())
}
