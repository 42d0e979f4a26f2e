//! End-to-end CLI tests for chatunify.
//!
//! These tests run the actual binary with various arguments and check the
//! output files and messages.
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// Creates a temporary directory with export fixtures for both platforms.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    let wechat = "[2024/02/01 14:30:25] 张三: 你好，今天有空吗？\n\
                  [2024/02/01 14:31:02] 李四: 有的\n\
                  [2024/02/01 14:31:40] 张三: 我手机13812345678\n";
    fs::write(dir.path().join("wechat.txt"), wechat).unwrap();

    let qq = "2024-02-01 14:32:10 王五(10001)\n收到\n";
    fs::write(dir.path().join("qq.txt"), qq).unwrap();

    fs::write(dir.path().join("garbage.txt"), "not a chat export at all\n").unwrap();

    dir
}

fn chatunify() -> Command {
    Command::cargo_bin("chatunify").expect("binary exists")
}

#[test]
fn test_no_args_shows_usage() {
    chatunify()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_version_flag() {
    chatunify()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chatunify"));
}

#[test]
fn test_extract_single_wechat_file() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.json");

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg("--type")
        .arg("wechat")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 messages"));

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"format_version\": \"1.0\""));
    assert!(json.contains("张三"));
}

#[test]
fn test_extract_auto_detects_multiple_files() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.json");

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg(dir.path().join("qq.txt"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 messages"));

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("wechat-text-export"));
    assert!(json.contains("qq-text-export"));
}

#[test]
fn test_extract_paired_type_hints() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.json");

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg(dir.path().join("qq.txt"))
        .arg("--type")
        .arg("wechat")
        .arg("--type")
        .arg("qq")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 messages"));

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("wechat-text-export"));
    assert!(json.contains("qq-text-export"));
}

#[test]
fn test_extract_mismatched_hint_count_fails() {
    let dir = setup_fixtures();

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg(dir.path().join("qq.txt"))
        .arg(dir.path().join("garbage.txt"))
        .arg("--type")
        .arg("wechat")
        .arg("--type")
        .arg("qq")
        .assert()
        .failure()
        .stderr(predicate::str::contains("one per input"));
}

#[test]
fn test_extract_advanced_privacy_anonymizes_output() {
    let dir = setup_fixtures();
    let output = dir.path().join("anon.json");

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg("--privacy")
        .arg("advanced")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let json = fs::read_to_string(&output).unwrap();
    assert!(!json.contains("张三"));
    assert!(!json.contains("13812345678"));
    assert!(json.contains("User 1"));
    assert!(json.contains("[PHONE]"));
}

#[test]
fn test_extract_with_sender_filter() {
    let dir = setup_fixtures();
    let output = dir.path().join("filtered.json");

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg("--from")
        .arg("李四")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 messages after filtering"));
}

#[test]
fn test_extract_rejects_bad_date() {
    let dir = setup_fixtures();

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg("--after")
        .arg("01/02/2024")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_extract_warns_on_undetectable_file_but_succeeds() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.json");

    chatunify()
        .arg("extract")
        .arg(dir.path().join("garbage.txt"))
        .arg(dir.path().join("qq.txt"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));
}

#[test]
fn test_transcript_from_export() {
    let dir = setup_fixtures();
    let output = dir.path().join("out.json");

    chatunify()
        .arg("extract")
        .arg(dir.path().join("wechat.txt"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    chatunify()
        .arg("transcript")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("[2024-02-01 14:30:25] 张三:"));
}

#[test]
fn test_transcript_missing_input_fails() {
    chatunify()
        .arg("transcript")
        .arg("/no/such/export.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_scan_runs_without_accounts() {
    let dir = tempdir().unwrap();

    chatunify()
        .env("CHATUNIFY_EXPORT_DIR", dir.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 account(s)"));
}

#[test]
fn test_scan_finds_seeded_account() {
    let dir = tempdir().unwrap();
    let msg = dir.path().join("wxid_testuser").join("Msg");
    fs::create_dir_all(&msg).unwrap();
    fs::write(msg.join("MSG0.db"), b"").unwrap();

    let output = dir.path().join("scan.json");
    chatunify()
        .env("CHATUNIFY_EXPORT_DIR", dir.path())
        .arg("scan")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("wxid_testuser"));

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("wxid_testuser"));
}

#[test]
fn test_scan_advanced_masks_identifiers() {
    let dir = tempdir().unwrap();
    let msg = dir.path().join("wxid_secret").join("Msg");
    fs::create_dir_all(&msg).unwrap();
    fs::write(msg.join("MSG0.db"), b"").unwrap();

    chatunify()
        .env("CHATUNIFY_EXPORT_DIR", dir.path())
        .arg("scan")
        .arg("--privacy")
        .arg("advanced")
        .assert()
        .success()
        .stdout(predicate::str::contains("wxid_secret").not())
        .stdout(predicate::str::contains("user-"));
}
