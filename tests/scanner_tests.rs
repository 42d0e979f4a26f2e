//! Account discovery tests over temporary directory trees.

use std::fs;
use std::path::Path;

use tempfile::{TempDir, tempdir};

use chatunify::parser::Platform;
use chatunify::privacy::PrivacyLevel;
use chatunify::scanner::{AccountScanner, ScanConfig};

/// Builds a fake WeChat Files tree with one account and two data stores.
fn wechat_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let msg = dir.path().join("wxid_a1b2c3d4").join("Msg");
    fs::create_dir_all(&msg).unwrap();
    fs::write(msg.join("MSG0.db"), b"").unwrap();
    fs::write(msg.join("MicroMsg.db"), b"").unwrap();
    fs::write(msg.join("notes.txt"), b"").unwrap();
    dir
}

/// Builds a fake QQ tree with one numeric account dir.
fn qq_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let account = dir.path().join("123456789");
    fs::create_dir_all(&account).unwrap();
    fs::write(account.join("Msg3.0.db"), b"").unwrap();
    fs::write(account.join("config.ini"), b"").unwrap();
    dir
}

fn scanner_for(wechat_root: &Path, qq_root: &Path) -> AccountScanner {
    AccountScanner::new(
        ScanConfig::default()
            .with_wechat_root(wechat_root)
            .with_qq_root(qq_root),
    )
}

#[test]
fn test_finds_wechat_account() {
    let wechat = wechat_tree();
    let qq = tempdir().unwrap();
    let scanner = scanner_for(wechat.path(), qq.path());

    let accounts = scanner.scan(Platform::WeChat, PrivacyLevel::Basic);
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].identifier, "wxid_a1b2c3d4");
    assert_eq!(accounts[0].data_store_count, 2);
    assert!(
        accounts[0]
            .data_store_files
            .iter()
            .any(|f| f.contains("MSG0.db"))
    );
}

#[test]
fn test_wechat_account_requires_msg_subdir() {
    let dir = tempdir().unwrap();
    // wxid_ name but no Msg/ inside: not an account
    fs::create_dir_all(dir.path().join("wxid_empty")).unwrap();
    let scanner = scanner_for(dir.path(), dir.path());

    assert!(scanner.scan(Platform::WeChat, PrivacyLevel::Basic).is_empty());
}

#[test]
fn test_finds_qq_account() {
    let qq = qq_tree();
    let wechat = tempdir().unwrap();
    let scanner = scanner_for(wechat.path(), qq.path());

    let accounts = scanner.scan(Platform::Qq, PrivacyLevel::Basic);
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].identifier, "123456789");
    // Only the .db file whose name contains "Msg" counts.
    assert_eq!(accounts[0].data_store_count, 1);
}

#[test]
fn test_non_matching_dirs_are_skipped() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("All Users")).unwrap();
    fs::create_dir_all(dir.path().join("Applet")).unwrap();
    let scanner = scanner_for(dir.path(), dir.path());

    assert!(scanner.scan(Platform::WeChat, PrivacyLevel::Basic).is_empty());
    assert!(scanner.scan(Platform::Qq, PrivacyLevel::Basic).is_empty());
}

#[test]
fn test_missing_roots_never_error() {
    let scanner = AccountScanner::new(
        ScanConfig::default()
            .with_wechat_root("/definitely/not/here")
            .with_qq_root("/also/missing"),
    );
    let result = scanner.scan_all(PrivacyLevel::Basic);
    assert!(result.wechat_accounts.is_empty());
    assert!(result.qq_accounts.is_empty());
}

#[test]
fn test_scan_survives_one_bad_root() {
    let wechat = wechat_tree();
    let scanner = AccountScanner::new(
        ScanConfig::default()
            .with_wechat_root("/bogus/root")
            .with_wechat_root(wechat.path())
            .with_qq_root("/bogus/qq"),
    );
    let result = scanner.scan_all(PrivacyLevel::Basic);
    assert_eq!(result.wechat_accounts.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_scan_survives_unreadable_account_subdir() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let good_msg = dir.path().join("wxid_good").join("Msg");
    fs::create_dir_all(&good_msg).unwrap();
    fs::write(good_msg.join("MSG0.db"), b"").unwrap();

    let locked_msg = dir.path().join("wxid_locked").join("Msg");
    fs::create_dir_all(&locked_msg).unwrap();
    fs::write(locked_msg.join("MSG0.db"), b"").unwrap();
    fs::set_permissions(&locked_msg, fs::Permissions::from_mode(0o000)).unwrap();

    // Mode bits don't bind root; there is nothing to exercise then.
    if fs::read_dir(&locked_msg).is_ok() {
        fs::set_permissions(&locked_msg, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let qq = tempdir().unwrap();
    let scanner = scanner_for(dir.path(), qq.path());
    let accounts = scanner.scan(Platform::WeChat, PrivacyLevel::Basic);

    fs::set_permissions(&locked_msg, fs::Permissions::from_mode(0o755)).unwrap();

    // Both accounts reported; the unreadable one just yields no stores.
    assert_eq!(accounts.len(), 2);
    let good = accounts.iter().find(|a| a.identifier == "wxid_good").unwrap();
    assert_eq!(good.data_store_count, 1);
    let locked = accounts
        .iter()
        .find(|a| a.identifier == "wxid_locked")
        .unwrap();
    assert_eq!(locked.data_store_count, 0);
}

#[test]
fn test_advanced_privacy_masks_listing() {
    let wechat = wechat_tree();
    let qq = tempdir().unwrap();
    let scanner = scanner_for(wechat.path(), qq.path());

    let accounts = scanner.scan(Platform::WeChat, PrivacyLevel::Advanced);
    assert_eq!(accounts.len(), 1);
    let account = &accounts[0];

    assert!(account.identifier.starts_with("user-"));
    assert_ne!(account.identifier, "wxid_a1b2c3d4");
    assert_eq!(account.path, "***");
    assert!(
        account
            .data_store_files
            .iter()
            .all(|f| f.starts_with("data-store-"))
    );
    // Counts stay accurate even when names are masked.
    assert_eq!(account.data_store_count, 2);
}

#[test]
fn test_pseudonym_is_stable_across_scans() {
    let wechat = wechat_tree();
    let qq = tempdir().unwrap();
    let scanner = scanner_for(wechat.path(), qq.path());

    let first = scanner.scan(Platform::WeChat, PrivacyLevel::Advanced);
    let second = scanner.scan(Platform::WeChat, PrivacyLevel::Advanced);
    assert_eq!(first[0].identifier, second[0].identifier);
}

#[test]
fn test_scan_result_serializes() {
    let wechat = wechat_tree();
    let qq = qq_tree();
    let scanner = scanner_for(wechat.path(), qq.path());

    let result = scanner.scan_all(PrivacyLevel::Basic);
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("wxid_a1b2c3d4"));
    assert!(json.contains("123456789"));
    assert!(json.contains("scan_time"));
}
