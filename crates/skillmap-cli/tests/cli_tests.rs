//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CLASS_JSON: &str = r#"{
    "QuestionsMapping": [
        {"Question No": "Q1", "Skill Code": "ADD", "Skill Description": "Addition", "Max Marks": 5},
        {"Question No": "Q2", "Skill Code": "SUB", "Skill Description": "Subtraction", "Max Marks": 5},
        {"Question No": "Q3", "Skill Code": "MUL", "Skill Description": "Multiplication", "Max Marks": 10}
    ],
    "StudentResults": [
        {"Student Name": "Ada", "Student ID": "S1", "Q1": 5, "Q2": 5, "Q3": 10},
        {"Student Name": "Ben", "Student ID": "S2", "Q1": 1, "Q2": 4, "Q3": 9},
        {"Student Name": "Cleo", "Student ID": "S3", "Q1": 4, "Q2": 1, "Q3": 2},
        {"Student ID": "S4", "Q1": 0, "Q2": 0, "Q3": 0}
    ]
}"#;

fn skillmap() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("skillmap").unwrap();
    cmd.env_remove("SKILLMAP_TARGET_ACCURACY")
        .env_remove("SKILLMAP_DEMO_SEED")
        .env_remove("RUST_LOG");
    cmd
}

fn write_class(dir: &Path) -> PathBuf {
    let path = dir.join("class.json");
    std::fs::write(&path, CLASS_JSON).unwrap();
    path
}

#[test]
fn analyze_text_output() {
    let dir = TempDir::new().unwrap();
    let workbook = write_class(dir.path());

    skillmap()
        .current_dir(dir.path())
        .arg("analyze")
        .arg("--workbook")
        .arg(&workbook)
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis of class.json"))
        .stdout(predicate::str::contains("3 students, 3 skills"))
        .stdout(predicate::str::contains("Multiplication"));
}

#[test]
fn analyze_json_output() {
    let dir = TempDir::new().unwrap();
    let workbook = write_class(dir.path());

    let output = skillmap()
        .current_dir(dir.path())
        .args(["analyze", "--format", "json", "--workbook"])
        .arg(&workbook)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["students"].as_array().unwrap().len(), 3);
    assert_eq!(json["students"][1]["weakestSkills"][0]["skillCode"], "ADD");
    assert_eq!(json["weakestSkillsClasswide"].as_array().unwrap().len(), 3);
    assert_eq!(json["groups"][0]["id"], "group-ADD");
}

#[test]
fn analyze_missing_sheets_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"Sheet1": []}"#).unwrap();

    skillmap()
        .current_dir(dir.path())
        .arg("analyze")
        .arg("--workbook")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid File: Must contain 'QuestionsMapping' and 'StudentResults' sheets.",
        ));
}

#[test]
fn analyze_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    skillmap()
        .current_dir(dir.path())
        .args(["analyze", "--workbook", "nonexistent.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn analyze_rejects_unknown_clip_policy() {
    let dir = TempDir::new().unwrap();
    let workbook = write_class(dir.path());

    skillmap()
        .current_dir(dir.path())
        .args(["analyze", "--clip", "sideways", "--workbook"])
        .arg(&workbook)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown clip policy"));
}

#[test]
fn groups_text_output() {
    let dir = TempDir::new().unwrap();
    let workbook = write_class(dir.path());

    skillmap()
        .current_dir(dir.path())
        .arg("groups")
        .arg("--workbook")
        .arg(&workbook)
        .assert()
        .success()
        .stdout(predicate::str::contains("group-ADD"))
        .stdout(predicate::str::contains("group-SUB"))
        .stdout(predicate::str::contains("Cleo"));
}

#[test]
fn groups_honours_clip_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("penalties.json");
    std::fs::write(
        &path,
        r#"{
            "QuestionsMapping": [
                {"Question No": "Q1", "Skill Code": "ADD", "Skill Description": "Addition", "Max Marks": 5},
                {"Question No": "Q2", "Skill Code": "SUB", "Skill Description": "Subtraction", "Max Marks": 5}
            ],
            "StudentResults": [
                {"Student Name": "Ada", "Student ID": "S1", "Q1": -5, "Q2": 5}
            ]
        }"#,
    )
    .unwrap();

    let overall = |clip: &str| {
        let output = skillmap()
            .current_dir(dir.path())
            .args(["groups", "--format", "json", "--clip", clip, "--workbook"])
            .arg(&path)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json[0]["id"], "group-ADD");
        json[0]["students"][0]["overallScore"].as_f64().unwrap()
    };

    assert_eq!(overall("symmetric"), 50.0);
    assert_eq!(overall("upper-only"), 0.0);
}

#[test]
fn demo_is_reproducible_with_seed() {
    let dir = TempDir::new().unwrap();
    let run = || {
        skillmap()
            .current_dir(dir.path())
            .args(["demo", "--students", "12", "--seed", "42", "--format", "json"])
            .output()
            .unwrap()
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(json["students"].as_array().unwrap().len(), 12);
}

#[test]
fn demo_text_reports_seed() {
    let dir = TempDir::new().unwrap();
    skillmap()
        .current_dir(dir.path())
        .args(["demo", "--students", "5", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo class: 5 students (seed 7)"));
}

#[test]
fn demo_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "[demo]\nstudents = 9\nseed = 3\n").unwrap();

    skillmap()
        .current_dir(dir.path())
        .arg("demo")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo class: 9 students (seed 3)"));
}

#[test]
fn template_then_analyze() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("template.xlsx");

    skillmap()
        .current_dir(dir.path())
        .arg("template")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(output.exists());

    skillmap()
        .current_dir(dir.path())
        .arg("analyze")
        .arg("--workbook")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 students, 3 skills"));
}

#[test]
fn requests_json_output() {
    let dir = TempDir::new().unwrap();
    let workbook = write_class(dir.path());

    let output = skillmap()
        .current_dir(dir.path())
        .args(["requests", "--target", "85", "--workbook"])
        .arg(&workbook)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let requests = json.as_array().unwrap();
    assert_eq!(requests[0]["type"], "remedialPlan");
    assert_eq!(requests[0]["targetAccuracy"], 85.0);
    assert_eq!(
        requests
            .iter()
            .filter(|r| r["type"] == "studentReport")
            .count(),
        3
    );
}

#[test]
fn requests_rejects_out_of_range_target() {
    let dir = TempDir::new().unwrap();
    let workbook = write_class(dir.path());

    skillmap()
        .current_dir(dir.path())
        .args(["requests", "--target", "120", "--workbook"])
        .arg(&workbook)
        .assert()
        .failure()
        .stderr(predicate::str::contains("target must be between 0 and 100"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    skillmap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skillmap.toml"));

    assert!(dir.path().join("skillmap.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    skillmap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    skillmap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_config_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let workbook = write_class(dir.path());

    skillmap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let output = skillmap()
        .current_dir(dir.path())
        .arg("requests")
        .arg("--workbook")
        .arg(&workbook)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["profile"]["subject"], "Mathematics");
}

#[test]
fn help_output() {
    skillmap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Skill-level analysis of class assessment results",
        ));
}

#[test]
fn version_output() {
    skillmap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skillmap"));
}
