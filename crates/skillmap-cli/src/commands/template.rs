//! The `skillmap template` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillmap_core::template::write_template;

pub fn execute(output: PathBuf) -> Result<()> {
    write_template(&output)
        .with_context(|| format!("failed to write template to {}", output.display()))?;

    println!("Created {}", output.display());
    println!("\nFill in both sheets, then run:");
    println!("  skillmap analyze --workbook {}", output.display());

    Ok(())
}
