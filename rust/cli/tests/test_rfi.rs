use std::path::PathBuf;

use handscope_cli::run;
use serde_json::Value;
use serial_test::serial;

fn fixture() -> String {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("../engine/tests/fixtures/sample_session.txt");
    p.to_string_lossy().into_owned()
}

fn clear_env() {
    for key in [
        "HANDSCOPE_CONFIG",
        "HANDSCOPE_POLICY",
        "HANDSCOPE_MIN_SEAT",
        "HANDSCOPE_MAX_SEAT",
    ] {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let mut argv = vec!["handscope"];
    argv.extend_from_slice(args);
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

fn group<'a>(report: &'a Value, label: &str) -> &'a Value {
    report["groups"]
        .as_array()
        .expect("groups array")
        .iter()
        .find(|g| g["label"] == label)
        .expect("group present")
}

#[test]
#[serial]
fn rfi_reports_six_max_open_raises() {
    clear_env();
    let input = fixture();
    let (code, stdout, stderr) = run_cli(&[
        "rfi", "--input", &input, "--player", "Hero", "--min-seat", "6", "--max-seat", "6",
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let report: Value = serde_json::from_str(&stdout).expect("json report");
    assert_eq!(report["player"], "Hero");
    assert_eq!(report["hands"], 6);
    assert_eq!(report["filters"]["min_seat"], 6);
    assert_eq!(report["policy"]["exclude_all_in"], true);

    let sb = group(&report, "SB");
    assert_eq!(sb["opportunities"], 1);
    assert_eq!(sb["raises"], 1);
    assert_eq!(sb["frequency"], 100.0);
    assert_eq!(group(&report, "BTN")["opportunities"], 0);
    assert_eq!(group(&report, "CO")["frequency"], 0.0);

    // Hand 1004 has no big blind.
    assert!(stderr.contains("WARNING: 1 of 6 hands have no positions and are skipped"));
}

#[test]
#[serial]
fn rfi_flags_override_policy_and_bounds() {
    clear_env();
    let input = fixture();
    let (code, stdout, _) = run_cli(&[
        "rfi",
        "--input",
        &input,
        "--player",
        "Hero",
        "--policy",
        "shove",
        "--max-bet-bb",
        "15",
        "--min-seat",
        "6",
        "--max-seat",
        "6",
    ]);
    assert_eq!(code, 0);
    let report: Value = serde_json::from_str(&stdout).expect("json report");
    assert_eq!(report["policy"]["require_full_stack_raise"], true);
    let btn = group(&report, "BTN");
    assert_eq!((btn["opportunities"].as_u64(), btn["raises"].as_u64()), (Some(1), Some(1)));
    let sb = group(&report, "SB");
    assert_eq!((sb["opportunities"].as_u64(), sb["raises"].as_u64()), (Some(1), Some(0)));
}

#[test]
#[serial]
fn rfi_seat_bounds_come_from_environment() {
    clear_env();
    unsafe {
        std::env::set_var("HANDSCOPE_MIN_SEAT", "6");
        std::env::set_var("HANDSCOPE_MAX_SEAT", "6");
    }
    let input = fixture();
    let (code, stdout, _) = run_cli(&[
        "rfi", "--input", &input, "--player", "Hero", "--max-bb", "100",
    ]);
    clear_env();

    assert_eq!(code, 0);
    let report: Value = serde_json::from_str(&stdout).expect("json report");
    assert_eq!(report["filters"]["max_seat"], 6);
    assert_eq!(group(&report, "CO")["frequency"], 100.0);
}

#[test]
#[serial]
fn rfi_text_format_prints_a_table() {
    clear_env();
    let input = fixture();
    let (code, stdout, _) = run_cli(&[
        "rfi", "--input", &input, "--player", "Hero", "--min-seat", "6", "--max-seat", "6",
        "--format", "text",
    ]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("GROUP"));
    assert!(lines.contains(&"SB          1      1   100.0%"));
}

#[test]
#[serial]
fn rfi_any_player_pools_everyone() {
    clear_env();
    let input = fixture();
    let (code, stdout, _) = run_cli(&["rfi", "--input", &input, "--any-player"]);
    assert_eq!(code, 0);
    let report: Value = serde_json::from_str(&stdout).expect("json report");
    assert!(report["player"].is_null());
    assert_eq!(report["groups"].as_array().map(Vec::len), Some(6));
    // Hero's UTG+1 open in the nine-handed 1006.
    assert_eq!(group(&report, "EP")["raises"], 1);
}

#[test]
#[serial]
fn rfi_reads_zstd_input() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.txt.zst");
    let text = std::fs::read(fixture()).unwrap();
    std::fs::write(&path, zstd::bulk::compress(&text, 3).unwrap()).unwrap();

    let (code, stdout, _) = run_cli(&[
        "rfi",
        "--input",
        path.to_str().unwrap(),
        "--player",
        "Hero",
        "--min-seat",
        "6",
        "--max-seat",
        "6",
    ]);
    assert_eq!(code, 0);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(group(&report, "SB")["raises"], 1);
}

#[test]
#[serial]
fn rfi_rejects_missing_input_and_bad_bounds() {
    clear_env();
    let (code, stdout, stderr) = run_cli(&[
        "rfi", "--input", "/nonexistent/session.txt", "--player", "Hero",
    ]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error: Invalid input: /nonexistent/session.txt"));

    let input = fixture();
    let (code, _, stderr) = run_cli(&[
        "rfi", "--input", &input, "--player", "Hero", "--min-bb", "50",
    ]);
    assert_eq!(code, 2);
    assert!(stderr.contains("--min-bb must not exceed --max-bb"));
}

#[test]
#[serial]
fn empty_transcript_warns_and_reports_zeros() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "").unwrap();
    let path = path.to_string_lossy().into_owned();

    let (code, stdout, stderr) = run_cli(&["rfi", "--input", &path, "--player", "Hero"]);
    assert_eq!(code, 0);
    assert!(stderr.contains(&format!("WARNING: no hands found in {path}")));
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["hands"], 0);
}
