//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bandscore() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bandscore").unwrap();
    cmd.env_remove("BANDSCORE_SECTION")
        .env_remove("BANDSCORE_STRATEGY");
    cmd
}

const READING_KEY: &str = "../../samples/reading-key.json";
const READING_RESPONSES: &str = "../../samples/reading-responses.json";
const LISTENING_KEY: &str = "../../samples/listening-key.json";
const LISTENING_RESPONSES: &str = "../../samples/listening-responses.json";

#[test]
fn score_reading_sample() {
    bandscore()
        .args(["score", "--key", READING_KEY, "--responses", READING_RESPONSES])
        .assert()
        .success()
        .stdout(predicate::str::contains("30/40"))
        .stdout(predicate::str::contains("6.5"))
        .stdout(predicate::str::contains("Review: 5, 9, 14"))
        .stdout(predicate::str::contains("Unanswered: 2"));
}

#[test]
fn score_listening_sample() {
    bandscore()
        .args(["score", "--key", LISTENING_KEY, "--responses", LISTENING_RESPONSES])
        .args(["--section", "listening"])
        .assert()
        .success()
        .stdout(predicate::str::contains("32/40"))
        .stdout(predicate::str::contains("7.0"));
}

#[test]
fn score_with_percentage_strategy() {
    bandscore()
        .args(["score", "--key", READING_KEY, "--responses", READING_RESPONSES])
        .args(["--strategy", "percentage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7.0"))
        .stdout(predicate::str::contains("percentage"));
}

#[test]
fn score_with_timings() {
    bandscore()
        .args(["score", "--key", READING_KEY, "--responses", READING_RESPONSES])
        .args(["--timings", "../../samples/reading-timings.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Time: 2760s total"));
}

#[test]
fn score_markdown_format() {
    bandscore()
        .args(["score", "--key", READING_KEY, "--responses", READING_RESPONSES])
        .args(["--format", "markdown", "--test-name", "Sample Test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Sample Test (reading)"))
        .stdout(predicate::str::contains("**Band 6.5**"));
}

#[test]
fn score_writes_json_and_html() {
    let dir = TempDir::new().unwrap();

    bandscore()
        .args(["score", "--key", READING_KEY, "--responses", READING_RESPONSES])
        .args(["--format", "json,html", "--output"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Results saved to"))
        .stderr(predicate::str::contains("HTML report"));

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    let json = files
        .iter()
        .find(|p| p.extension().is_some_and(|e| e == "json"))
        .expect("json report written");
    assert!(files
        .iter()
        .any(|p| p.extension().is_some_and(|e| e == "html")));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
    assert_eq!(value["summary"]["band_score"], 6.5);
    assert_eq!(value["summary"]["raw_correct_count"], 30);
    assert_eq!(value["strategy"], "raw-table");
}

#[test]
fn score_rejects_unknown_format() {
    bandscore()
        .args(["score", "--key", READING_KEY, "--responses", READING_RESPONSES])
        .args(["--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn score_empty_key_fails() {
    let dir = TempDir::new().unwrap();
    let key = dir.path().join("key.json");
    std::fs::write(&key, "{}").unwrap();

    bandscore()
        .arg("score")
        .arg("--key")
        .arg(&key)
        .args(["--responses", READING_RESPONSES])
        .assert()
        .failure()
        .stderr(predicate::str::contains("answer key is empty"));
}

#[test]
fn score_missing_key_file_fails() {
    bandscore()
        .args(["score", "--key", "nonexistent.json", "--responses", READING_RESPONSES])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn band_for_tally() {
    bandscore()
        .args(["band", "--correct", "35", "--total", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reading 35/40: band 7.5 (raw-table)"));
}

#[test]
fn band_scales_short_tests() {
    bandscore()
        .args(["band", "--correct", "15", "--total", "20", "--section", "listening"])
        .assert()
        .success()
        .stdout(predicate::str::contains("band 6.5"));
}

#[test]
fn band_percentage_fallback_for_short_tests() {
    bandscore()
        .args(["band", "--correct", "15", "--total", "20", "--strategy", "percentage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("band 7.5 (percentage)"));
}

#[test]
fn band_rejects_impossible_tally() {
    bandscore()
        .args(["band", "--correct", "41", "--total", "40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds total"));
}

#[test]
fn band_rejects_negative_count() {
    bandscore()
        .args(["band", "--correct", "-1", "--total", "40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be negative"));
}

#[test]
fn band_rejects_unknown_section() {
    bandscore()
        .args(["band", "--correct", "20", "--total", "40", "--section", "writing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section type: writing"));
}

#[test]
fn band_section_from_env() {
    bandscore()
        .env("BANDSCORE_SECTION", "listening")
        .args(["band", "--correct", "16", "--total", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("listening 16/40: band 4.0"));
}

#[test]
fn band_uses_config_tables() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bandscore.toml");
    std::fs::write(
        &config,
        "[tables]\nreading = [{ min_raw = 0.0, band = 1.0 }, { min_raw = 20.0, band = 5.0 }]\n",
    )
    .unwrap();

    bandscore()
        .args(["band", "--correct", "20", "--total", "40", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("band 5.0"));
}

#[test]
fn extract_practice_text() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("key.json");

    bandscore()
        .args(["extract", "--text", "../../samples/practice-test.txt", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 6 questions and 6 answers"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["2"], "NOT GIVEN");
    assert_eq!(value["5"], "C");
}

#[test]
fn extract_short_text_fails() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("short.txt");
    std::fs::write(&text, "1. A").unwrap();

    bandscore()
        .arg("extract")
        .arg("--text")
        .arg(&text)
        .assert()
        .failure()
        .stderr(predicate::str::contains("extraction failed"));
}

#[test]
fn summarize_keeps_opening_sentences() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("passage.txt");
    std::fs::write(
        &text,
        "Tea reached Europe in the 1600s.\nIt was first sold as a medicine. Prices fell by 3.5 times later. Tea became a daily drink.",
    )
    .unwrap();

    bandscore()
        .arg("summarize")
        .arg("--text")
        .arg(&text)
        .args(["--ratio", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Tea reached Europe in the 1600s. It was first sold as a medicine.",
        ))
        .stdout(predicate::str::contains("Prices fell").not());
}

#[test]
fn summarize_default_ratio_keeps_one_sentence() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("passage.txt");
    std::fs::write(&text, "First point here. Second point here.").unwrap();

    bandscore()
        .arg("summarize")
        .arg("--text")
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains("First point here."))
        .stdout(predicate::str::contains("Second").not());
}

#[test]
fn summarize_rejects_zero_ratio() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("passage.txt");
    std::fs::write(&text, "Only one sentence.").unwrap();

    bandscore()
        .arg("summarize")
        .arg("--text")
        .arg(&text)
        .args(["--ratio", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("summary ratio must be above 0"));
}

#[test]
fn tables_lists_both_sections() {
    bandscore()
        .arg("tables")
        .assert()
        .success()
        .stdout(predicate::str::contains("reading"))
        .stdout(predicate::str::contains("listening"))
        .stdout(predicate::str::contains(">= 97.5%"));
}

#[test]
fn validate_sample_key() {
    bandscore()
        .args(["validate", "--key", READING_KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("40 questions"))
        .stdout(predicate::str::contains("Answer key valid"));
}

#[test]
fn validate_reports_gaps() {
    let dir = TempDir::new().unwrap();
    let key = dir.path().join("key.json");
    std::fs::write(&key, r#"{"1": "A", "3": "B"}"#).unwrap();

    bandscore()
        .arg("validate")
        .arg("--key")
        .arg(&key)
        .assert()
        .success()
        .stdout(predicate::str::contains("[Q2] WARNING"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_rejects_bad_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bandscore.toml");
    std::fs::write(&config, "[tables]\nreading = []\n").unwrap();

    bandscore()
        .args(["validate", "--key", READING_KEY, "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no entries"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    bandscore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created bandscore.toml"))
        .stdout(predicate::str::contains("Created answers/key.json"));

    assert!(dir.path().join("bandscore.toml").exists());
    assert!(dir.path().join("answers/responses.json").exists());

    // The generated files work with the other commands.
    bandscore()
        .current_dir(dir.path())
        .args(["score", "--key", "answers/key.json", "--responses", "answers/responses.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3/5"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    bandscore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    bandscore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    bandscore()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Band score calculator for reading and listening practice tests",
        ));
}

#[test]
fn version_output() {
    bandscore()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bandscore"));
}
