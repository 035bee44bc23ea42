//! skillmap CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use skillmap_core::ClipPolicy;

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "skillmap",
    version,
    about = "Skill-level analysis of class assessment results"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a results workbook
    Analyze {
        /// Path to .xlsx or .json workbook
        #[arg(long)]
        workbook: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Score clipping: symmetric or upper-only (overrides config)
        #[arg(long)]
        clip: Option<ClipPolicy>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show remedial groups for a results workbook
    Groups {
        /// Path to .xlsx or .json workbook
        #[arg(long)]
        workbook: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Score clipping: symmetric or upper-only (overrides config)
        #[arg(long)]
        clip: Option<ClipPolicy>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze a generated demo class
    Demo {
        /// Number of students (default from config)
        #[arg(long)]
        students: Option<usize>,

        /// Random seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the input workbook template
    Template {
        /// Where to write the .xlsx file
        #[arg(long, default_value = "skillmap-template.xlsx")]
        output: PathBuf,
    },

    /// Print remedial plan and student report requests as JSON
    Requests {
        /// Path to .xlsx or .json workbook
        #[arg(long)]
        workbook: PathBuf,

        /// Target accuracy in percent (overrides config)
        #[arg(long)]
        target: Option<f64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter skillmap.toml
    Init,
}

#[tokio::main]
async fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "skillmap=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            workbook,
            format,
            clip,
            config,
        } => commands::analyze::execute(workbook, format, clip, config).await,
        Commands::Groups {
            workbook,
            format,
            clip,
            config,
        } => commands::groups::execute(workbook, format, clip, config).await,
        Commands::Demo {
            students,
            seed,
            format,
            config,
        } => commands::demo::execute(students, seed, format, config),
        Commands::Template { output } => commands::template::execute(output),
        Commands::Requests {
            workbook,
            target,
            config,
        } => commands::requests::execute(workbook, target, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
