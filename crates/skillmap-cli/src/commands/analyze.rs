//! The `skillmap analyze` command.

use std::path::PathBuf;

use anyhow::Result;

use skillmap_core::pipeline::AnalysisSource;
use skillmap_core::ClipPolicy;

use super::{load_workbook_analysis, print_overview, print_skill_table, OutputFormat};

pub async fn execute(
    workbook: PathBuf,
    format: OutputFormat,
    clip: Option<ClipPolicy>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, loaded) = load_workbook_analysis(&workbook, clip, config_path).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&loaded.analysis)?);
        }
        OutputFormat::Text => {
            if let AnalysisSource::Upload { file_name } = &loaded.source {
                println!("Analysis of {file_name}\n");
            }
            print_overview(&loaded.analysis);
            print_skill_table(&loaded.analysis);
        }
    }

    Ok(())
}
