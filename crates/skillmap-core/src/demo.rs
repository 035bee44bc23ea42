//! Synthetic class data for demos and tests.
//!
//! Demo classes use a fixed six-skill taxonomy and run through the regular
//! pipeline, so every invariant of a real analysis holds for them too. All
//! randomness comes from the caller's RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::ClassAnalysis;
use crate::pipeline::{analyze_rows, AnalysisOptions};
use crate::taxonomy::SkillTaxonomy;
use crate::workbook::{CellValue, Row, Sheet, Workbook, MAPPING_SHEET, RESULTS_SHEET};

/// Skill code, description, and a difficulty offset applied to every
/// student's ability on that skill.
const DEMO_SKILLS: [(&str, &str, f64); 6] = [
    ("NUM.1", "Place value and number sense", 0.10),
    ("NUM.2", "Fractions and decimals", -0.15),
    ("ALG.1", "Patterns and expressions", -0.05),
    ("GEO.1", "Shapes and angles", 0.05),
    ("MEA.1", "Measurement and units", -0.10),
    ("DAT.1", "Data handling and graphs", 0.00),
];

/// Questions per skill in the demo paper.
const QUESTIONS_PER_SKILL: usize = 2;

/// Max marks for the n-th question of a skill.
const QUESTION_MARKS: [i32; QUESTIONS_PER_SKILL] = [4, 6];

const FIRST_NAMES: [&str; 12] = [
    "Aarav", "Bella", "Chen", "Dalia", "Emeka", "Freya", "Goran", "Hana", "Isaac", "Jia",
    "Kofi", "Lena",
];

const SURNAME_INITIALS: [char; 8] = ['A', 'B', 'D', 'K', 'M', 'P', 'R', 'S'];

/// Rows of the demo `QuestionsMapping` sheet.
pub fn demo_mapping_rows() -> Vec<Row> {
    let mut rows = Vec::with_capacity(DEMO_SKILLS.len() * QUESTIONS_PER_SKILL);
    for (skill_index, (code, description, _)) in DEMO_SKILLS.iter().enumerate() {
        for (question_index, marks) in QUESTION_MARKS.iter().enumerate() {
            rows.push(Row::from_pairs([
                (
                    "Question No",
                    CellValue::from(question_number(skill_index, question_index)),
                ),
                ("Skill Code", CellValue::from(*code)),
                ("Skill Description", CellValue::from(*description)),
                ("Max Marks", CellValue::from(*marks)),
            ]));
        }
    }
    rows
}

/// The fixed demo taxonomy.
pub fn demo_taxonomy() -> SkillTaxonomy {
    SkillTaxonomy::from_rows(&demo_mapping_rows())
}

/// Generate `student_count` random `StudentResults` rows.
pub fn demo_student_rows<R: Rng + ?Sized>(student_count: usize, rng: &mut R) -> Vec<Row> {
    (0..student_count)
        .map(|i| {
            let ability: f64 = rng.random_range(0.35..0.95);
            let name = format!(
                "{} {}.",
                FIRST_NAMES[i % FIRST_NAMES.len()],
                SURNAME_INITIALS[(i / FIRST_NAMES.len()) % SURNAME_INITIALS.len()]
            );

            let mut cells = vec![
                ("Student Name".to_string(), CellValue::from(name)),
                ("Student ID".to_string(), CellValue::from(format!("S{:03}", i + 1))),
            ];
            for (skill_index, (_, _, difficulty)) in DEMO_SKILLS.iter().enumerate() {
                for (question_index, marks) in QUESTION_MARKS.iter().enumerate() {
                    let noise: f64 = rng.random_range(-0.25..0.25);
                    let fraction = (ability + difficulty + noise).clamp(0.0, 1.0);
                    let earned = (f64::from(*marks) * fraction).round();
                    cells.push((
                        question_number(skill_index, question_index),
                        CellValue::from(earned),
                    ));
                }
            }
            Row::new(cells)
        })
        .collect()
}

/// A complete demo workbook, in the same shape as an uploaded file.
pub fn demo_workbook<R: Rng + ?Sized>(student_count: usize, rng: &mut R) -> Workbook {
    Workbook::new(vec![
        Sheet::new(MAPPING_SHEET, demo_mapping_rows()),
        Sheet::new(RESULTS_SHEET, demo_student_rows(student_count, rng)),
    ])
}

/// Generate a demo `ClassAnalysis` using `rng`.
pub fn generate_demo<R: Rng + ?Sized>(student_count: usize, rng: &mut R) -> ClassAnalysis {
    let taxonomy = demo_taxonomy();
    let rows = demo_student_rows(student_count, rng);
    analyze_rows(&taxonomy, &rows, &AnalysisOptions::default())
}

/// Generate a reproducible demo `ClassAnalysis`.
pub fn generate_demo_seeded(student_count: usize, seed: u64) -> ClassAnalysis {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_demo(student_count, &mut rng)
}

fn question_number(skill_index: usize, question_index: usize) -> String {
    format!("Q{}", skill_index * QUESTIONS_PER_SKILL + question_index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_taxonomy_has_six_skills() {
        let taxonomy = demo_taxonomy();
        assert_eq!(taxonomy.skill_count(), 6);
        assert_eq!(taxonomy.questions().len(), 12);
        assert_eq!(taxonomy.skill_max_marks("NUM.2"), 10.0);
    }

    #[test]
    fn demo_has_requested_students_and_full_shapes() {
        let analysis = generate_demo_seeded(30, 42);
        assert_eq!(analysis.students.len(), 30);
        assert_eq!(analysis.skill_stats.len(), 6);
        assert_eq!(analysis.weakest_skills_classwide.len(), 3);
        for student in &analysis.students {
            assert_eq!(student.skill_performances.len(), 6);
            assert!((0.0..=100.0).contains(&student.overall_score));
        }
        for stat in &analysis.skill_stats {
            assert_eq!(stat.total(), 30);
        }
    }

    #[test]
    fn same_seed_same_analysis() {
        assert_eq!(generate_demo_seeded(15, 9), generate_demo_seeded(15, 9));
    }

    #[test]
    fn student_ids_are_unique() {
        let analysis = generate_demo_seeded(100, 1);
        let mut ids: Vec<&str> = analysis
            .students
            .iter()
            .map(|s| s.student_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn empty_demo_class() {
        let analysis = generate_demo_seeded(0, 3);
        assert!(analysis.students.is_empty());
        assert!(analysis.groups.is_empty());
        assert!(analysis.skill_stats.iter().all(|s| s.avg_accuracy == 0.0));
    }
}
