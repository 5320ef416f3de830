//! Integration tests for the Tategaki CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = "羅生門\n芥川龍之介\n\n\
    或日の暮方の事である。一人の下人《げにん》が、羅生門の下で雨やみを待っていた。\n\
    広い門の下には、この男のほかに誰もいない。";

/// Create a text file for testing
fn create_test_text(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn tategaki() -> Command {
    Command::cargo_bin("tategaki").unwrap()
}

#[test]
fn test_help() {
    tategaki()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("paginate"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_version() {
    tategaki()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tategaki"));
}

#[test]
fn test_paginate_help() {
    tategaki()
        .args(["paginate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lay a text out into pages"))
        .stdout(predicate::str::contains("--width"))
        .stdout(predicate::str::contains("--settings"))
        .stdout(predicate::str::contains("--horizontal"));
}

#[test]
fn test_info_nonexistent_file() {
    tategaki()
        .args(["info", "/nonexistent/file.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}

#[test]
fn test_info_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "notes.md", "# heading");

    tategaki()
        .args(["info", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No decoder available"));
}

#[test]
fn test_info_text() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    tategaki()
        .args(["info", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:       羅生門"))
        .stdout(predicate::str::contains("Author:      芥川龍之介"))
        .stdout(predicate::str::contains("Encoding:    UTF-8"));
}

#[test]
fn test_info_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    let output = tategaki()
        .args(["info", "--json", input.to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(json["title"], "羅生門");
    assert_eq!(json["diagnostics"], 0);
    assert!(json["length"].as_u64().unwrap() > 0);
}

#[test]
fn test_paginate_text_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    tategaki()
        .args(["paginate", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Page 1/"))
        .stdout(predicate::str::contains("下人"));
}

#[test]
fn test_paginate_json_small_viewport() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    let output = tategaki()
        .args([
            "paginate",
            input.to_str().unwrap(),
            "--width",
            "200",
            "--height",
            "200",
            "--font-size",
            "20",
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    // 152px usable each way: 7 glyphs per column, 4 columns
    assert_eq!(json["capacity"]["total_characters"], 28);
    assert_eq!(json["orientation"], "vertical");
    assert!(json["page_count"].as_u64().unwrap() >= 2);
    assert_eq!(
        json["pages"].as_array().unwrap().len() as u64,
        json["page_count"].as_u64().unwrap()
    );
}

#[test]
fn test_paginate_with_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);
    let settings = create_test_text(
        &temp_dir,
        "settings.json",
        r#"{"verticalMode": false, "fontSize": 16, "useCapacityBasedWrapping": false}"#,
    );

    let output = tategaki()
        .args([
            "paginate",
            input.to_str().unwrap(),
            "--settings",
            settings.to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["orientation"], "horizontal");
}

#[test]
fn test_paginate_page_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    tategaki()
        .args(["paginate", input.to_str().unwrap(), "--page", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_paginate_invalid_font_size() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    tategaki()
        .args(["paginate", input.to_str().unwrap(), "--font-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot lay out"));
}

#[test]
fn test_validate_clean_text() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    tategaki()
        .args(["validate", "--strict", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid text file"));
}

#[test]
fn test_validate_reports_markup_warnings() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "broken.txt", "本文［＃小さな文字終わり］");

    tategaki()
        .args(["validate", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Markup warnings: 1"));

    tategaki()
        .args(["validate", "--strict", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("markup warnings"));
}

#[test]
fn test_validate_invalid_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sjis.txt");
    fs::write(&input, [0x82, 0xA0, 0x82, 0xA2]).unwrap();

    tategaki()
        .args(["validate", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn test_batch_invalid_jobs() {
    tategaki()
        .args(["batch", "in", "--output-dir", "out", "--jobs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("jobs must be at least 1"));
}

#[test]
fn test_batch_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");

    fs::create_dir_all(&input_dir).unwrap();

    tategaki()
        .args([
            "batch",
            input_dir.to_str().unwrap(),
            "--output-dir",
            output_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No supported files"));
}

#[test]
fn test_batch_with_files() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");

    fs::create_dir_all(&input_dir).unwrap();
    fs::write(input_dir.join("rashomon.txt"), SAMPLE).unwrap();
    fs::write(input_dir.join("neko.txt"), "吾輩は猫である\n夏目漱石\n名前はまだ無い。").unwrap();
    fs::write(input_dir.join("ignored.md"), "# skipped").unwrap();

    tategaki()
        .args([
            "batch",
            input_dir.to_str().unwrap(),
            "--output-dir",
            output_dir.to_str().unwrap(),
            "--jobs",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    let written = fs::read_to_string(output_dir.join("neko.pages.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["summary"]["title"], "吾輩は猫である");
    assert!(!json["pages"].as_array().unwrap().is_empty());
    assert!(output_dir.join("rashomon.pages.json").exists());
}

#[test]
fn test_verbose_flag() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_text(&temp_dir, "rashomon.txt", SAMPLE);

    tategaki()
        .args(["--verbose", "info", input.to_str().unwrap()])
        .assert()
        .success();
}
