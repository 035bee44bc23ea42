//! The `skillmap init` command.

use std::path::Path;

use anyhow::Result;

use skillmap_planner::config::write_starter_config;

pub fn execute() -> Result<()> {
    let path = Path::new("skillmap.toml");
    if path.exists() {
        println!("skillmap.toml already exists, skipping.");
    } else {
        write_starter_config(path)?;
        println!("Created skillmap.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit skillmap.toml with your name, school and grade");
    println!("  2. Run: skillmap template --output results.xlsx");
    println!("  3. Run: skillmap analyze --workbook results.xlsx");

    Ok(())
}
