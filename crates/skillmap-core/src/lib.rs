//! skillmap-core — Assessment analysis engine.
//!
//! Turns a two-sheet workbook (question → skill mapping, per-student scores)
//! into a `ClassAnalysis`: per-student skill performance, class-wide skill
//! statistics, the weakest skills of the class and remedial groups.

pub mod aggregate;
pub mod analyzer;
pub mod demo;
pub mod error;
pub mod grouping;
pub mod headers;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod proficiency;
pub mod summary;
pub mod taxonomy;
pub mod template;
pub mod traits;
pub mod workbook;

pub use error::WorkbookError;
pub use model::{ClassAnalysis, ClipPolicy, ProficiencyLevel};
pub use pipeline::{analyze_workbook, AnalysisOptions, Session};
pub use workbook::Workbook;
