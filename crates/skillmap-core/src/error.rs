//! Workbook error types.
//!
//! Structural problems with an input file are the only fatal failures in the
//! analysis pipeline. Row- and cell-level problems are filtered out silently
//! and never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading or analyzing a workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// One or both of the required sheets is missing.
    #[error("Invalid File: Must contain 'QuestionsMapping' and 'StudentResults' sheets.")]
    MissingSheets,

    /// The file could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet container could not be decoded.
    #[error("failed to read spreadsheet: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    /// The JSON workbook could not be parsed.
    #[error("failed to parse workbook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON parsed but does not have the sheet/row shape.
    #[error("invalid workbook JSON: {0}")]
    InvalidJson(String),

    /// The file extension is not a supported workbook format.
    #[error("unsupported workbook format: {0}")]
    UnsupportedFormat(String),

    /// The template workbook could not be written.
    #[error("failed to write template: {0}")]
    Template(#[from] rust_xlsxwriter::XlsxError),
}

impl WorkbookError {
    /// Returns `true` if the file was readable but has the wrong structure.
    ///
    /// Callers show these to the user and ask for a different file.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            WorkbookError::MissingSheets | WorkbookError::InvalidJson(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sheets_message() {
        assert_eq!(
            WorkbookError::MissingSheets.to_string(),
            "Invalid File: Must contain 'QuestionsMapping' and 'StudentResults' sheets."
        );
        assert!(WorkbookError::MissingSheets.is_format_error());
    }

    #[test]
    fn unsupported_format_is_not_format_error() {
        let err = WorkbookError::UnsupportedFormat("csv".into());
        assert!(!err.is_format_error());
        assert!(err.to_string().contains("csv"));
    }
}
