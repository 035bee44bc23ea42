//! skillmap-planner — Turns a class analysis into generation work.
//!
//! Builds remedial plan and student report requests from a `ClassAnalysis`,
//! runs them against any `ContentGenerator` with bounded concurrency, and
//! loads the teacher-facing configuration those requests are built with.

pub mod config;
pub mod error;
pub mod mock;
pub mod requests;
pub mod runner;

pub use config::{load_config, load_config_from, SkillmapConfig};
pub use error::GenerationError;
pub use requests::{plan_requests, report_requests};
pub use runner::{run_plans, OutcomeResult, PlanOutcome, RunnerConfig};
