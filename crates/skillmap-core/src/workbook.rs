//! Workbook loading.
//!
//! A workbook is a set of named sheets, each a list of header-keyed rows.
//! Spreadsheet files (`.xlsx`/`.xlsm`) are decoded with calamine; JSON files
//! hold one array of row objects per sheet name.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xlsx};
use serde::Serialize;

use crate::error::WorkbookError;

/// Name of the sheet holding the question → skill mapping.
pub const MAPPING_SHEET: &str = "QuestionsMapping";
/// Name of the sheet holding one row of scores per student.
pub const RESULTS_SHEET: &str = "StudentResults";

/// A single cell value as read from a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Numeric interpretation of the cell.
    ///
    /// Numbers must be finite; text is trimmed and parsed. Everything else,
    /// including blank text, yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Trimmed textual interpretation of the cell, `None` when blank.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Bool(b) => b.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// One data row of a sheet, keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    /// Build a row from `(header, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into().trim().to_string(), v.into()))
                .collect(),
        }
    }

    /// The non-empty value under `header`, if any.
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(h, v)| h == header && !v.is_empty())
            .map(|(_, v)| v)
    }

    /// The first non-empty value found under any of `aliases`, in alias order.
    pub fn first_of(&self, aliases: &[&str]) -> Option<&CellValue> {
        aliases.iter().find_map(|alias| self.get(alias))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    /// Returns `true` if every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_empty())
    }
}

/// A named sheet of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Supported workbook containers, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Json,
}

impl WorkbookFormat {
    pub fn from_path(path: &Path) -> Result<Self, WorkbookError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(WorkbookFormat::Xlsx),
            "json" => Ok(WorkbookFormat::Json),
            "" => Err(WorkbookError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(WorkbookError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// An in-memory workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Look up a sheet by its exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Load a workbook from disk, picking the decoder from the extension.
    pub fn load(path: &Path) -> Result<Self, WorkbookError> {
        let format = WorkbookFormat::from_path(path)?;
        let bytes = std::fs::read(path).map_err(|source| WorkbookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes, format)
    }

    /// Load a workbook, reading the file without blocking the runtime.
    ///
    /// Decoding happens after the read completes and is synchronous.
    pub async fn load_async(path: impl Into<PathBuf>) -> Result<Self, WorkbookError> {
        let path = path.into();
        let format = WorkbookFormat::from_path(&path)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| WorkbookError::Io {
                path: path.clone(),
                source,
            })?;
        Self::from_bytes(bytes, format)
    }

    pub fn from_bytes(bytes: Vec<u8>, format: WorkbookFormat) -> Result<Self, WorkbookError> {
        match format {
            WorkbookFormat::Xlsx => Self::from_xlsx_bytes(bytes),
            WorkbookFormat::Json => {
                let value: serde_json::Value = serde_json::from_slice(&bytes)?;
                Self::from_json_value(&value)
            }
        }
    }

    /// Decode an `.xlsx` file held in memory.
    pub fn from_xlsx_bytes(bytes: Vec<u8>) -> Result<Self, WorkbookError> {
        let mut xlsx: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes))?;
        let mut sheets = Vec::new();
        for name in xlsx.sheet_names() {
            let range = xlsx.worksheet_range(&name)?;
            sheets.push(sheet_from_range(&name, &range));
        }
        Ok(Self { sheets })
    }

    pub fn from_json_str(content: &str) -> Result<Self, WorkbookError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Self::from_json_value(&value)
    }

    /// Convert `{"Sheet": [{"Header": value, ...}, ...], ...}` into a workbook.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, WorkbookError> {
        let object = value
            .as_object()
            .ok_or_else(|| WorkbookError::InvalidJson("top level must be an object".into()))?;

        let mut sheets = Vec::with_capacity(object.len());
        for (name, rows) in object {
            let rows = rows.as_array().ok_or_else(|| {
                WorkbookError::InvalidJson(format!("sheet '{name}' must be an array of rows"))
            })?;
            let rows = rows
                .iter()
                .map(|row| {
                    let fields = row.as_object().ok_or_else(|| {
                        WorkbookError::InvalidJson(format!("rows of sheet '{name}' must be objects"))
                    })?;
                    Ok(Row::new(
                        fields
                            .iter()
                            .map(|(h, v)| (h.trim().to_string(), cell_from_json(v)))
                            .collect(),
                    ))
                })
                .collect::<Result<Vec<_>, WorkbookError>>()?
                .into_iter()
                .filter(|row| !row.is_blank())
                .collect();
            sheets.push(Sheet::new(name.clone(), rows));
        }
        Ok(Self { sheets })
    }
}

fn cell_from_json(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

/// Turn a used range into header-keyed rows.
///
/// The first non-blank row supplies the headers; columns with a blank header
/// and rows with no values are dropped.
fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let Some(header_row) = rows.find(|r| r.iter().any(|c| !matches!(c, Data::Empty))) else {
        return Sheet::new(name, Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_from_data(c).as_text().unwrap_or_default())
        .collect();

    let rows = rows
        .map(|cells| {
            Row::new(
                headers
                    .iter()
                    .zip(cells.iter())
                    .filter(|(h, _)| !h.is_empty())
                    .map(|(h, c)| (h.clone(), cell_from_data(c)))
                    .collect(),
            )
        })
        .filter(|row| !row.is_blank())
        .collect();

    Sheet::new(name, rows)
}
