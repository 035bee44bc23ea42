//! Downloadable input template.
//!
//! The template is a two-sheet workbook in exactly the shape the pipeline
//! reads, seeded with a few example rows.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::error::WorkbookError;
use crate::workbook::{CellValue, Row, Sheet, Workbook, MAPPING_SHEET, RESULTS_SHEET};

const TEMPLATE_QUESTIONS: [(&str, &str, &str, i32); 5] = [
    ("Q1", "NUM.1", "Place value", 2),
    ("Q2", "NUM.1", "Place value", 2),
    ("Q3", "FRA.1", "Equivalent fractions", 3),
    ("Q4", "FRA.1", "Equivalent fractions", 3),
    ("Q5", "GEO.1", "Angles in triangles", 5),
];

const TEMPLATE_STUDENTS: [(&str, &str, [i32; 5]); 3] = [
    ("Maya Lopez", "S001", [2, 2, 3, 2, 4]),
    ("Tom Becker", "S002", [1, 2, 1, 0, 5]),
    ("Priya Nair", "S003", [2, 1, 2, 3, 1]),
];

/// The template content as an in-memory workbook.
pub fn template_workbook() -> Workbook {
    let mapping = TEMPLATE_QUESTIONS
        .iter()
        .map(|(q, code, description, marks)| {
            Row::from_pairs([
                ("Question No", CellValue::from(*q)),
                ("Skill Code", CellValue::from(*code)),
                ("Skill Description", CellValue::from(*description)),
                ("Max Marks", CellValue::from(*marks)),
            ])
        })
        .collect();

    let results = TEMPLATE_STUDENTS
        .iter()
        .map(|(name, id, scores)| {
            let mut cells = vec![
                ("Student Name".to_string(), CellValue::from(*name)),
                ("Student ID".to_string(), CellValue::from(*id)),
            ];
            cells.extend(
                TEMPLATE_QUESTIONS
                    .iter()
                    .zip(scores)
                    .map(|((q, ..), score)| (q.to_string(), CellValue::from(*score))),
            );
            Row::new(cells)
        })
        .collect();

    Workbook::new(vec![
        Sheet::new(MAPPING_SHEET, mapping),
        Sheet::new(RESULTS_SHEET, results),
    ])
}

/// Write the template to `path` as `.xlsx`.
pub fn write_template(path: &Path) -> Result<(), WorkbookError> {
    write_xlsx(&template_workbook(), path)
}

/// Write any workbook to `path` as `.xlsx`, one header row per sheet.
pub fn write_xlsx(workbook: &Workbook, path: &Path) -> Result<(), WorkbookError> {
    let mut book = build_xlsx(workbook)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| WorkbookError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    book.save(path)?;
    Ok(())
}

/// Encode a workbook as `.xlsx` bytes.
pub fn xlsx_bytes(workbook: &Workbook) -> Result<Vec<u8>, WorkbookError> {
    let mut book = build_xlsx(workbook)?;
    Ok(book.save_to_buffer()?)
}

fn build_xlsx(workbook: &Workbook) -> Result<XlsxWorkbook, WorkbookError> {
    let mut book = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    for sheet in &workbook.sheets {
        let headers = sheet_headers(sheet);
        let worksheet = book.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }

        for (r, row) in sheet.rows.iter().enumerate() {
            let excel_row = r as u32 + 1;
            for (col, header) in headers.iter().enumerate() {
                let col = col as u16;
                match row.get(header) {
                    Some(CellValue::Number(n)) => {
                        worksheet.write_number(excel_row, col, *n)?;
                    }
                    Some(CellValue::Text(s)) => {
                        worksheet.write_string(excel_row, col, s)?;
                    }
                    Some(CellValue::Bool(b)) => {
                        worksheet.write_boolean(excel_row, col, *b)?;
                    }
                    Some(CellValue::Empty) | None => {}
                }
            }
        }
    }

    Ok(book)
}

/// Column headers in first-seen order across all rows.
fn sheet_headers(sheet: &Sheet) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in &sheet.rows {
        for (header, _) in row.iter() {
            if !headers.iter().any(|h| h == header) {
                headers.push(header.to_string());
            }
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{analyze_workbook, AnalysisOptions};

    #[test]
    fn template_has_both_sheets() {
        let wb = template_workbook();
        assert_eq!(wb.sheet_names(), vec![MAPPING_SHEET, RESULTS_SHEET]);
        assert_eq!(wb.sheet(MAPPING_SHEET).unwrap().rows.len(), 5);
        assert_eq!(wb.sheet(RESULTS_SHEET).unwrap().rows.len(), 3);
    }

    #[test]
    fn template_analyzes_cleanly() {
        let analysis = analyze_workbook(&template_workbook(), &AnalysisOptions::default()).unwrap();
        assert_eq!(analysis.students.len(), 3);
        assert_eq!(analysis.skill_stats.len(), 3);
        // Tom: FRA.1 = 1/6.
        let tom = analysis.student("S002").unwrap();
        assert_eq!(tom.worst_skill().unwrap().skill_code, "FRA.1");
    }

    #[test]
    fn headers_in_first_seen_order() {
        let wb = template_workbook();
        let headers = sheet_headers(wb.sheet(RESULTS_SHEET).unwrap());
        assert_eq!(
            headers,
            vec!["Student Name", "Student ID", "Q1", "Q2", "Q3", "Q4", "Q5"]
        );
    }

    #[test]
    fn xlsx_round_trip_preserves_analysis() {
        let wb = template_workbook();
        let bytes = xlsx_bytes(&wb).unwrap();
        let reread = Workbook::from_xlsx_bytes(bytes).unwrap();

        let options = AnalysisOptions::default();
        assert_eq!(
            analyze_workbook(&reread, &options).unwrap(),
            analyze_workbook(&wb, &options).unwrap()
        );
    }

    #[test]
    fn write_template_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("template.xlsx");
        write_template(&path).unwrap();

        let loaded = Workbook::load(&path).unwrap();
        assert!(loaded.sheet(MAPPING_SHEET).is_some());
        assert!(loaded.sheet(RESULTS_SHEET).is_some());
    }
}
