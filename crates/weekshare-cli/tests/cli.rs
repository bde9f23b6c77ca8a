use assert_cmd::Command;
use predicates::prelude::*;

/// Monday 2025-01-06 09:00 UTC, inside the anchor week.
const MONDAY_NINE_UTC: i64 = 1_736_121_600_000 + 9 * 3_600_000;

fn weekshare() -> Command {
    let mut cmd = Command::cargo_bin("weekshare").unwrap();
    cmd.env_remove("RUST_LOG").env("WEEKSHARE_TZ", "UTC");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn warsaw_token() -> String {
    stdout_of(weekshare().args([
        "--tz",
        "Europe/Warsaw",
        "add",
        "--day",
        "0",
        "--from",
        "18",
        "--to",
        "19",
    ]))
}

#[test]
fn test_encode_then_decode_json() {
    let ranges = format!(
        r#"[{{"start": {MONDAY_NINE_UTC}, "end": {}}}]"#,
        MONDAY_NINE_UTC + 3_600_000
    );
    let token = stdout_of(weekshare().args(["encode"]).write_stdin(ranges));

    let json = stdout_of(weekshare().args(["decode", &token, "--json"]));
    let state: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(state["timezone"], "UTC");
    assert_eq!(state["ranges"][0]["start"], MONDAY_NINE_UTC);
    assert_eq!(state["ranges"][0]["end"], MONDAY_NINE_UTC + 3_600_000);
}

#[test]
fn test_encode_rejects_overlapping_ranges() {
    let ranges = format!(
        r#"[{{"start": {a}, "end": {b}}}, {{"start": {c}, "end": {d}}}]"#,
        a = MONDAY_NINE_UTC,
        b = MONDAY_NINE_UTC + 3_600_000,
        c = MONDAY_NINE_UTC + 1_800_000,
        d = MONDAY_NINE_UTC + 5_400_000,
    );
    weekshare()
        .arg("encode")
        .write_stdin(ranges)
        .assert()
        .failure()
        .stderr(predicate::str::contains("range 1"))
        .stderr(predicate::str::contains("overlaps"));
}

#[test]
fn test_encode_with_base_url() {
    weekshare()
        .args(["encode", "--base-url", "https://example.com/week"])
        .write_stdin("[]")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("https://example.com/week?state="));
}

#[test]
fn test_view_in_another_zone() {
    let token = warsaw_token();
    weekshare()
        .args(["--tz", "Asia/Tokyo", "view", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("shared from Europe/Warsaw, shown in Asia/Tokyo"))
        .stdout(predicate::str::contains("Monday 17:00–18:00 JST"));
}

#[test]
fn test_view_accepts_share_url_and_12h_format() {
    let token = warsaw_token();
    let url = format!("https://example.com/?state={token}");
    weekshare()
        .args(["--tz", "Europe/Warsaw", "--format", "12", "view", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday 9:00 AM–10:00 AM CET"));
}

#[test]
fn test_view_grid() {
    let token = warsaw_token();
    weekshare()
        .args(["--tz", "Europe/Warsaw", "view", "--grid", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00 #1"))
        .stdout(predicate::str::contains("09:30 |"));
}

#[test]
fn test_add_to_existing_token_keeps_owner_zone() {
    let token = warsaw_token();
    let token = stdout_of(weekshare().args([
        "--tz", "Asia/Tokyo", "add", &token, "--day", "2", "--from", "20", "--to", "21",
    ]));

    let decoded = stdout_of(weekshare().args(["decode", &token]));
    assert!(decoded.contains("timezone: Europe/Warsaw"));
    assert!(decoded.contains("ranges: 2"));
    assert!(decoded.contains("Wednesday 10:00–11:00 CET"));
}

#[test]
fn test_add_rejects_overlap() {
    let token = warsaw_token();
    weekshare()
        .args(["add", &token, "--day", "0", "--from", "19", "--to", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("selection was rejected"));
}

#[test]
fn test_remove() {
    let token = warsaw_token();
    let emptied = stdout_of(weekshare().args(["remove", &token, "1"]));
    weekshare()
        .args(["decode", &emptied])
        .assert()
        .success()
        .stdout(predicate::str::contains("ranges: 0"));

    weekshare()
        .args(["remove", &token, "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no range with id 7"));
}

#[test]
fn test_decode_rejects_garbage() {
    weekshare()
        .args(["decode", "!!!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not decode share token"));
}

#[test]
fn test_segment_across_midnight() {
    let start = MONDAY_NINE_UTC + 14 * 3_600_000; // Monday 23:00
    let end = start + 2 * 3_600_000;
    let json = stdout_of(weekshare().args([
        "segment",
        "--start",
        &start.to_string(),
        "--end",
        &end.to_string(),
    ]));
    let segments: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(segments.as_array().unwrap().len(), 2);
    assert_eq!(segments[0]["day_index"], 0);
    assert_eq!(segments[1]["day_index"], 1);
    assert_eq!(segments[1]["end"], end);
}

#[test]
fn test_zones_search() {
    weekshare()
        .args(["zones", "warsaw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Europe/Warsaw"))
        .stdout(predicate::str::contains("Asia/Tokyo").not());
}

#[test]
fn test_config_file() {
    let dir = std::env::temp_dir().join(format!("weekshare-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let config = dir.join("config.json");
    std::fs::write(&config, r#"{"time_format": "12", "max_ranges": 1}"#).unwrap();
    let config = config.to_str().unwrap();

    let token = warsaw_token();
    weekshare()
        .args(["--tz", "Europe/Warsaw", "--config", config, "view", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("9:00 AM"));

    weekshare()
        .args(["--config", config, "add", &token, "--day", "3", "--from", "0", "--to", "1"])
        .assert()
        .failure();
}
