use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use skillmap_core::demo::{demo_taxonomy, demo_workbook};
use skillmap_core::pipeline::{analyze_rows, analyze_workbook, AnalysisOptions};
use skillmap_core::proficiency;
use skillmap_core::workbook::RESULTS_SHEET;
use skillmap_core::ProficiencyLevel;

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("sweep_0_100", |b| {
        b.iter(|| {
            (0..=1000)
                .map(|t| ProficiencyLevel::classify(black_box(f64::from(t) / 10.0)))
                .filter(|l| *l == ProficiencyLevel::Critical)
                .count()
        })
    });

    group.bench_function("accuracy", |b| {
        b.iter(|| proficiency::accuracy(black_box(37.0), black_box(52.0)))
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let options = AnalysisOptions::default();

    for students in [30usize, 300, 3000] {
        let mut rng = StdRng::seed_from_u64(17);
        let workbook = demo_workbook(students, &mut rng);

        group.bench_function(format!("workbook_{students}_students"), |b| {
            b.iter(|| analyze_workbook(black_box(&workbook), black_box(&options)))
        });
    }

    let taxonomy = demo_taxonomy();
    let mut rng = StdRng::seed_from_u64(17);
    let workbook = demo_workbook(300, &mut rng);
    if let Some(results) = workbook.sheet(RESULTS_SHEET) {
        group.bench_function("rows_300_prebuilt_taxonomy", |b| {
            b.iter(|| analyze_rows(black_box(&taxonomy), black_box(&results.rows), &options))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_pipeline);
criterion_main!(benches);
