//! Analysis pipeline and session state.
//!
//! taxonomy → normalization → per-student analysis → class aggregation →
//! grouping. The pipeline is a synchronous single pass; the only failure is a
//! workbook without the two required sheets.

use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{aggregate_skills, weakest_skills_classwide};
use crate::analyzer::analyze_student;
use crate::demo;
use crate::error::WorkbookError;
use crate::grouping::group_students;
use crate::model::{ClassAnalysis, ClipPolicy, CLASSWIDE_WEAKEST_COUNT};
use crate::normalizer::resolve_student;
use crate::taxonomy::SkillTaxonomy;
use crate::workbook::{Row, Workbook, MAPPING_SHEET, RESULTS_SHEET};

/// Options for a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalysisOptions {
    pub clip_policy: ClipPolicy,
}

/// Analyze a loaded workbook.
///
/// Fails only when `QuestionsMapping` or `StudentResults` is missing.
pub fn analyze_workbook(
    workbook: &Workbook,
    options: &AnalysisOptions,
) -> Result<ClassAnalysis, WorkbookError> {
    let (Some(mapping), Some(results)) =
        (workbook.sheet(MAPPING_SHEET), workbook.sheet(RESULTS_SHEET))
    else {
        return Err(WorkbookError::MissingSheets);
    };

    let taxonomy = SkillTaxonomy::from_rows(&mapping.rows);
    Ok(analyze_rows(&taxonomy, &results.rows, options))
}

/// Analyze student rows against an already built taxonomy.
pub fn analyze_rows(
    taxonomy: &SkillTaxonomy,
    rows: &[Row],
    options: &AnalysisOptions,
) -> ClassAnalysis {
    let students: Vec<_> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let raw = resolve_student(row, taxonomy);
            if raw.is_none() {
                tracing::debug!("skipping student row {}: missing name or id", index + 1);
            }
            raw
        })
        .map(|raw| analyze_student(&raw, taxonomy, options.clip_policy))
        .collect();

    let skill_stats = aggregate_skills(&students, taxonomy);
    let weakest_skills_classwide = weakest_skills_classwide(&skill_stats, CLASSWIDE_WEAKEST_COUNT);
    let groups = group_students(&students);

    tracing::info!(
        students = students.len(),
        skipped = rows.len() - students.len(),
        skills = taxonomy.skill_count(),
        groups = groups.len(),
        "class analysis complete"
    );

    ClassAnalysis {
        students,
        skill_stats,
        weakest_skills_classwide,
        groups,
    }
}

/// Where the current analysis came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalysisSource {
    Upload {
        file_name: String,
    },
    Demo {
        student_count: usize,
        seed: Option<u64>,
    },
}

/// An analysis held by a session, with load metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedAnalysis {
    pub id: Uuid,
    pub source: AnalysisSource,
    pub loaded_at: DateTime<Utc>,
    pub analysis: ClassAnalysis,
}

/// In-memory owner of the current analysis.
///
/// Every successful load replaces the previous analysis entirely. A failed
/// load leaves it untouched.
#[derive(Debug, Default)]
pub struct Session {
    options: AnalysisOptions,
    current: Option<LoadedAnalysis>,
}

impl Session {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&LoadedAnalysis> {
        self.current.as_ref()
    }

    pub fn analysis(&self) -> Option<&ClassAnalysis> {
        self.current.as_ref().map(|l| &l.analysis)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Analyze an in-memory workbook and make it current.
    pub fn load_workbook(
        &mut self,
        file_name: &str,
        workbook: &Workbook,
    ) -> Result<&LoadedAnalysis, WorkbookError> {
        let analysis = analyze_workbook(workbook, &self.options)?;
        Ok(self.replace(
            AnalysisSource::Upload {
                file_name: file_name.to_string(),
            },
            analysis,
        ))
    }

    /// Read a workbook file, analyze it and make it current.
    pub async fn load_file(&mut self, path: &Path) -> Result<&LoadedAnalysis, WorkbookError> {
        let workbook = Workbook::load_async(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_workbook(&file_name, &workbook)
    }

    /// Generate demo data from `rng` and make it current.
    pub fn load_demo<R: Rng + ?Sized>(
        &mut self,
        student_count: usize,
        seed: Option<u64>,
        rng: &mut R,
    ) -> &LoadedAnalysis {
        let analysis = demo::generate_demo(student_count, rng);
        self.replace(
            AnalysisSource::Demo {
                student_count,
                seed,
            },
            analysis,
        )
    }

    fn replace(&mut self, source: AnalysisSource, analysis: ClassAnalysis) -> &LoadedAnalysis {
        self.current.insert(LoadedAnalysis {
            id: Uuid::new_v4(),
            source,
            loaded_at: Utc::now(),
            analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::{CellValue, Sheet};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn workbook() -> Workbook {
        Workbook::new(vec![
            Sheet::new(
                MAPPING_SHEET,
                vec![
                    Row::from_pairs([
                        ("Question No", CellValue::from("Q1")),
                        ("Skill Code", CellValue::from("A")),
                        ("Skill Description", CellValue::from("Adding")),
                        ("Max Marks", CellValue::from(5)),
                    ]),
                    Row::from_pairs([
                        ("Question No", CellValue::from("Q2")),
                        ("Skill Code", CellValue::from("B")),
                        ("Skill Description", CellValue::from("Borrowing")),
                        ("Max Marks", CellValue::from(5)),
                    ]),
                ],
            ),
            Sheet::new(
                RESULTS_SHEET,
                vec![Row::from_pairs([
                    ("Student Name", CellValue::from("Ada")),
                    ("Student ID", CellValue::from("S1")),
                    ("Q1", CellValue::from(5)),
                    ("Q2", CellValue::from(0)),
                ])],
            ),
        ])
    }

    #[test]
    fn missing_sheet_is_fatal() {
        let mut wb = workbook();
        wb.sheets.retain(|s| s.name != RESULTS_SHEET);
        let err = analyze_workbook(&wb, &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, WorkbookError::MissingSheets));
    }

    #[test]
    fn end_to_end_two_skills() {
        let analysis = analyze_workbook(&workbook(), &AnalysisOptions::default()).unwrap();

        assert_eq!(analysis.students.len(), 1);
        assert_eq!(analysis.students[0].overall_score, 50.0);
        assert_eq!(analysis.weakest_skills_classwide, vec!["B", "A"]);
        assert_eq!(analysis.groups.len(), 1);
        assert_eq!(analysis.groups[0].id, "group-B");
        assert_eq!(analysis.groups[0].students[0].student_id, "S1");
    }

    #[test]
    fn session_replaces_on_load_and_keeps_on_failure() {
        let mut session = Session::default();
        assert!(session.current().is_none());

        let first_id = session.load_workbook("class.xlsx", &workbook()).unwrap().id;
        assert_eq!(
            session.current().unwrap().source,
            AnalysisSource::Upload {
                file_name: "class.xlsx".into()
            }
        );

        let broken = Workbook::new(vec![]);
        assert!(session.load_workbook("broken.xlsx", &broken).is_err());
        assert_eq!(session.current().unwrap().id, first_id);

        let mut rng = StdRng::seed_from_u64(7);
        let demo = session.load_demo(12, Some(7), &mut rng);
        assert_ne!(demo.id, first_id);
        assert_eq!(session.analysis().unwrap().students.len(), 12);

        session.clear();
        assert!(session.analysis().is_none());
    }

    #[tokio::test]
    async fn session_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("class.json");
        std::fs::write(
            &path,
            r#"{
                "QuestionsMapping": [{"Question No": "Q1", "Skill Code": "A", "Max Marks": 4}],
                "StudentResults": [{"Student Name": "Ada", "Student ID": "S1", "Q1": 1}]
            }"#,
        )
        .unwrap();

        let mut session = Session::new(AnalysisOptions::default());
        let loaded = session.load_file(&path).await.unwrap();
        assert_eq!(
            loaded.source,
            AnalysisSource::Upload {
                file_name: "class.json".into()
            }
        );
        assert_eq!(loaded.analysis.students[0].overall_score, 25.0);
    }
}
