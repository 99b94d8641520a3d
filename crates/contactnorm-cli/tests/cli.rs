use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;

const INPUT: &str = "\
id;phone;dob
1;0501234567;21/05/1990
2;00971501234567;05/21/1990
;0501234567;3 Jan 1985
4;12345;01/02/75
";

fn run(config_home: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("contactnorm")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run command")
}

fn run_ok(config_home: &Path, args: &[&str]) -> String {
    let output = run(config_home, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

#[test]
fn cli_normalize_writes_derived_file_next_to_input() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("input_data.csv");
    fs::write(&input, INPUT).expect("write input");

    let stdout = run_ok(temp.path(), &["normalize", input.to_str().expect("path")]);
    assert!(stdout.contains("processed 4, normalized 2, skipped 2"));
    assert!(stdout.contains("- row 4: ID value is missing"));
    assert!(stdout.contains("- row 5: Phone value is too short for E.164 format"));

    let written =
        fs::read_to_string(temp.path().join("normalized-input_data.csv")).expect("output file");
    assert_eq!(
        written,
        "id;phone;dob\n1;+971501234567;1990-05-21\n2;+971501234567;1990-05-21\n"
    );
}

#[test]
fn cli_normalize_json_report() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("people");
    fs::write(&input, INPUT).expect("write input");
    let out_dir = temp.path().join("out");
    fs::create_dir(&out_dir).expect("out dir");

    let stdout = run_ok(
        temp.path(),
        &[
            "--json",
            "normalize",
            input.to_str().expect("path"),
            "--out-dir",
            out_dir.to_str().expect("path"),
        ],
    );
    let report: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(report["filename"], "normalized-people.csv");
    assert_eq!(report["content_type"], "text/csv");
    assert_eq!(report["processed_rows"], 4);
    assert_eq!(report["normalized_rows"], 2);
    assert_eq!(report["skipped_rows"], 2);
    assert_eq!(report["skipped"][0]["row_number"], 4);
    assert!(report.get("content").is_none());
    assert!(out_dir.join("normalized-people.csv").exists());
}

#[test]
fn cli_normalize_to_stdout_keeps_summary_on_stderr() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("contacts.csv");
    fs::write(&input, "id;phone;dob\n1;0501234567;19900521\n").expect("write input");

    let output = run(
        temp.path(),
        &["normalize", input.to_str().expect("path"), "--out", "-"],
    );
    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        "id;phone;dob\n1;+971501234567;1990-05-21\n"
    );
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("processed 1, normalized 1, skipped 0"));
}

#[test]
fn cli_normalize_missing_column_fails_with_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("contacts.csv");
    fs::write(&input, "id;phone\n1;0501234567\n").expect("write input");

    let output = run(temp.path(), &["normalize", input.to_str().expect("path")]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("Missing required column(s): dob"));
    assert!(!temp.path().join("normalized-contacts.csv").exists());
}

#[test]
fn cli_country_code_from_config_and_flag() {
    let temp = TempDir::new().expect("temp dir");
    let config_dir = temp.path().join("contactnorm");
    fs::create_dir(&config_dir).expect("config dir");
    fs::write(
        config_dir.join("config.toml"),
        "[normalizer]\ndefault_country_code = \"44\"\n",
    )
    .expect("write config");

    let from_config = run_ok(temp.path(), &["phone", "07946095812"]);
    assert_eq!(from_config.trim(), "+447946095812");

    let from_flag = run_ok(temp.path(), &["--country-code", "1", "phone", "4155551212"]);
    assert_eq!(from_flag.trim(), "+14155551212");
}

#[test]
fn cli_dob_reports_parse_failures() {
    let temp = TempDir::new().expect("temp dir");
    let parsed = run_ok(temp.path(), &["--json", "dob", "March 3rd, 1985"]);
    let value: Value = serde_json::from_str(&parsed).expect("json");
    assert_eq!(value["value"], "1985-03-03");

    let output = run(temp.path(), &["dob", "5 Jan Feb 1990"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("Ambiguous month tokens"));
}

#[test]
fn cli_pivot_year_flag_changes_century() {
    let temp = TempDir::new().expect("temp dir");
    let default = run_ok(temp.path(), &["dob", "01/02/20"]);
    assert_eq!(default.trim(), "2020-02-01");
    let lowered = run_ok(temp.path(), &["--pivot-year", "10", "dob", "01/02/20"]);
    assert_eq!(lowered.trim(), "1920-02-01");
}
