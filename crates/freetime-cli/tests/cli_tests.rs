//! End-to-end tests for the `freetime` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn freetime() -> Command {
    Command::cargo_bin("freetime").unwrap()
}

const TWO_PEOPLE: &str = r#"{
    "participants": [
        [{"weekday": "Mon", "start": "08:00", "end": "09:40"}],
        [{"weekday": "Mon", "start": "14:00", "end": "15:30", "weeks": [1]}]
    ],
    "week": 1
}"#;

fn run_json(args: &[&str], stdin: &str) -> serde_json::Value {
    let output = freetime().args(args).write_stdin(stdin).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn temp_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ── compute ─────────────────────────────────────────────────────────────────

#[test]
fn compute_from_stdin() {
    let report = run_json(&["compute"], TWO_PEOPLE);
    assert_eq!(report["week"], 1);
    assert_eq!(report["recommended_interval"]["weekday"], "Mon");
    assert_eq!(report["recommended_interval"]["start"], "15:30");
    assert_eq!(report["recommended_interval"]["end"], "22:00");
    assert_eq!(report["recommended_interval"]["duration_minutes"], 390);
}

#[test]
fn compute_from_file() {
    let file = temp_file(TWO_PEOPLE);
    let path = file.path().to_str().unwrap();
    let report = run_json(&["compute", "--request", path], "");
    assert_eq!(report["free_intervals"][0]["start"], "15:30");
}

#[test]
fn week_flag_overrides_request() {
    let report = run_json(&["compute", "--week", "2"], TWO_PEOPLE);
    assert_eq!(report["week"], 2);
    // Participant B's class is week-1 only
    assert_eq!(report["free_intervals"][0]["start"], "10:00");
    assert_eq!(report["free_intervals"][0]["duration_minutes"], 720);
}

#[test]
fn today_flag_derives_week() {
    // 2024-09-18 is a Wednesday in week 3 of the default term
    let report = run_json(&["compute", "--today", "2024-09-18"], TWO_PEOPLE);
    assert_eq!(report["week"], 3);
}

#[test]
fn pretty_output_is_indented() {
    freetime()
        .args(["compute", "--pretty"])
        .write_stdin(TWO_PEOPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"week\": 1"));
}

#[test]
fn malformed_records_are_reported_in_output() {
    let request = r#"{"participants": [[{"day": "Blursday", "start": "08:00", "end": "09:00"}]]}"#;
    let report = run_json(&["compute"], request);
    assert_eq!(report["diagnostics"][0]["reason"]["kind"], "unknown_weekday");
    assert_eq!(report["total_free_blocks"], 140);
}

#[test]
fn stored_week_text_is_accepted() {
    let request = r#"{"participants": [[
        {"weekday": "Mon", "start": "08:00", "end": "22:00", "weeks": "1-8"}
    ]]}"#;
    let week8 = run_json(&["compute", "--week", "8"], request);
    let week9 = run_json(&["compute", "--week", "9"], request);
    assert_eq!(week8["total_free_blocks"], 4 * 28);
    assert_eq!(week9["total_free_blocks"], 5 * 28);
}

#[test]
fn record_with_null_weekday_is_dropped_not_fatal() {
    let request = r#"{"participants": [[
        {"weekday": "Mon", "start": "08:00", "end": "09:00"},
        {"weekday": null, "start": "08:00", "end": "09:00"}
    ]]}"#;
    let report = run_json(&["compute"], request);
    assert_eq!(report["diagnostics"].as_array().unwrap().len(), 1);
    assert_eq!(report["diagnostics"][0]["record"]["index"], 1);
    assert_eq!(report["total_free_blocks"], 5 * 28 - 2);
}

#[test]
fn out_of_range_ideal_hour_fails() {
    freetime()
        .arg("compute")
        .write_stdin(r#"{"participants": [[]], "ideal_hour": 99}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ideal hour"));
}

#[test]
fn no_participants_fails() {
    freetime()
        .arg("compute")
        .write_stdin(r#"{"participants": []}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one participant"));
}

#[test]
fn invalid_json_fails() {
    freetime()
        .arg("compute")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse request JSON"));
}

// ── config ──────────────────────────────────────────────────────────────────

#[test]
fn config_file_changes_grid() {
    let config = temp_file("[grid]\nday_start = \"09:00\"\nday_end = \"17:00\"\nblock_minutes = 60\n");
    let path = config.path().to_str().unwrap();
    let report = run_json(
        &["compute", "--config", path],
        r#"{"participants": [[]]}"#,
    );
    assert_eq!(report["total_free_blocks"], 5 * 8);
    assert_eq!(report["free_intervals"][0]["start"], "09:00");
    assert_eq!(report["free_intervals"][0]["end"], "17:00");
}

#[test]
fn invalid_config_fails_before_computing() {
    let config = temp_file("[grid]\nblock_minutes = 45\n");
    let path = config.path().to_str().unwrap();
    freetime()
        .args(["compute", "--config", path])
        .write_stdin(TWO_PEOPLE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not divisible"));
}

// ── current-week / week-dates ───────────────────────────────────────────────

#[test]
fn current_week_for_date() {
    freetime()
        .args(["current-week", "--today", "2024-09-09"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn current_week_before_term_is_one() {
    freetime()
        .args(["current-week", "--today", "2024-01-01"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn week_dates_lists_weekdays() {
    let output = freetime()
        .args(["week-dates", "--week", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let week: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(week["week"], 1);
    assert_eq!(week["first_day"], "2024-09-02");
    assert_eq!(week["last_day"], "2024-09-08");
    let dates = &week["dates"];
    assert_eq!(dates.as_array().unwrap().len(), 5);
    assert_eq!(dates[0]["weekday"], "Mon");
    assert_eq!(dates[0]["date"], "2024-09-02");
    assert_eq!(dates[0]["label"], "周一");
    assert_eq!(dates[4]["date"], "2024-09-06");
}

#[test]
fn week_dates_rejects_week_zero() {
    freetime()
        .args(["week-dates", "--week", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid target week"));
}
