//! Account directory discovery.
//!
//! The scanner walks a configurable set of candidate roots per platform and
//! reports account-like directories plus the data-store files found under
//! them. Discovery is by naming convention only: data-store files are never
//! opened, and discovering an account does not imply its messages were read.
//!
//! Failure policy: an unreadable root or directory entry is logged and
//! skipped; a scan never errors outward.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatunify::scanner::{AccountScanner, ScanConfig};
//! use chatunify::parser::Platform;
//! use chatunify::privacy::PrivacyLevel;
//!
//! let scanner = AccountScanner::new(ScanConfig::for_user("alice"));
//! let accounts = scanner.scan(Platform::WeChat, PrivacyLevel::Basic);
//! for account in accounts {
//!     println!("{}: {} data stores", account.identifier, account.data_store_count);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::parser::Platform;
use crate::privacy::{PrivacyLevel, REDACTED_FIELD};

/// Candidate filesystem roots per platform.
///
/// Base paths are derived from a caller-provided username; the library
/// itself never reads the environment. Only roots that exist at scan time
/// are probed.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Candidate WeChat install locations.
    pub wechat_roots: Vec<PathBuf>,
    /// Candidate QQ install locations.
    pub qq_roots: Vec<PathBuf>,
}

impl ScanConfig {
    /// Builds the default candidate roots for a username.
    pub fn for_user(username: &str) -> Self {
        Self {
            wechat_roots: vec![
                PathBuf::from(format!("C:/Users/{username}/Documents/WeChat Files")),
                PathBuf::from(format!(
                    "C:/Users/{username}/AppData/Roaming/Tencent/WeChat/WeChat Files"
                )),
                PathBuf::from("D:/WeChat/WeChat Files"),
            ],
            qq_roots: vec![
                PathBuf::from(format!("C:/Users/{username}/Documents/Tencent Files")),
                PathBuf::from(format!("C:/Users/{username}/AppData/Roaming/Tencent/QQ")),
                PathBuf::from("D:/Tencent Files"),
                PathBuf::from("E:/Tencent Files"),
            ],
        }
    }

    /// Adds a WeChat candidate root.
    #[must_use]
    pub fn with_wechat_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.wechat_roots.push(root.into());
        self
    }

    /// Adds a QQ candidate root.
    #[must_use]
    pub fn with_qq_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.qq_roots.push(root.into());
        self
    }

    fn roots(&self, platform: Platform) -> &[PathBuf] {
        match platform {
            Platform::WeChat => &self.wechat_roots,
            Platform::Qq => &self.qq_roots,
        }
    }
}

/// One discovered account directory.
///
/// Never contains parsed message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Platform account id, real or pseudonymized depending on the level.
    pub identifier: String,
    /// Filesystem location; `***` under non-basic privacy levels.
    pub path: String,
    /// Discovered data-store file paths; placeholders under non-basic levels.
    pub data_store_files: Vec<String>,
    /// Number of discovered data-store files, always reported accurately.
    pub data_store_count: usize,
    /// Last modification time of the account directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of scanning all platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Discovered WeChat accounts.
    pub wechat_accounts: Vec<Account>,
    /// Discovered QQ accounts.
    pub qq_accounts: Vec<Account>,
    /// When the scan ran.
    pub scan_time: DateTime<Utc>,
}

/// Walks candidate roots and reports account directories.
pub struct AccountScanner {
    config: ScanConfig,
}

impl AccountScanner {
    /// Creates a scanner over the given candidate roots.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scans both platforms.
    pub fn scan_all(&self, level: PrivacyLevel) -> ScanResult {
        ScanResult {
            wechat_accounts: self.scan(Platform::WeChat, level),
            qq_accounts: self.scan(Platform::Qq, level),
            scan_time: Utc::now(),
        }
    }

    /// Scans one platform's candidate roots.
    ///
    /// Returns whatever accounts were successfully discovered, possibly
    /// empty; never errors.
    pub fn scan(&self, platform: Platform, level: PrivacyLevel) -> Vec<Account> {
        let mut accounts = Vec::new();

        for root in self.config.roots(platform) {
            if !root.exists() {
                debug!(root = %root.display(), "candidate root absent, skipping");
                continue;
            }

            let entries = match fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "cannot read candidate root");
                    continue;
                }
            };

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(root = %root.display(), error = %e, "unreadable directory entry");
                        continue;
                    }
                };
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().into_owned();

                if !path.is_dir() || !is_account_name(platform, &name) {
                    continue;
                }

                if let Some(account) = analyze_account_dir(platform, &path, &name, level) {
                    accounts.push(account);
                }
            }
        }

        debug!(%platform, count = accounts.len(), "scan complete");
        accounts
    }
}

/// Account directory naming convention per platform.
fn is_account_name(platform: Platform, name: &str) -> bool {
    match platform {
        Platform::WeChat => name.starts_with("wxid_"),
        Platform::Qq => !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()),
    }
}

/// Data-store naming convention per platform. Name pattern only; contents
/// stay unread.
fn is_data_store(platform: Platform, file_name: &str) -> bool {
    match platform {
        Platform::WeChat => file_name.ends_with(".db"),
        Platform::Qq => file_name.ends_with(".db") && file_name.contains("Msg"),
    }
}

fn analyze_account_dir(
    platform: Platform,
    account_path: &Path,
    identifier: &str,
    level: PrivacyLevel,
) -> Option<Account> {
    // WeChat keeps its databases under a Msg subdirectory; a directory
    // without one is not a data-bearing account.
    let search_root = match platform {
        Platform::WeChat => {
            let msg = account_path.join("Msg");
            if !msg.exists() {
                return None;
            }
            msg
        }
        Platform::Qq => account_path.to_path_buf(),
    };

    let data_store_files: Vec<String> = WalkDir::new(&search_root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(dir = %search_root.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_data_store(platform, &entry.file_name().to_string_lossy()))
        .map(|entry| entry.path().display().to_string())
        .collect();

    let last_modified = fs::metadata(account_path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    let count = data_store_files.len();
    let account = if level.policy().anonymizes {
        Account {
            identifier: pseudonymize(identifier),
            path: REDACTED_FIELD.to_string(),
            data_store_files: (1..=count).map(|i| format!("data-store-{i}")).collect(),
            data_store_count: count,
            last_modified,
        }
    } else {
        Account {
            identifier: identifier.to_string(),
            path: account_path.display().to_string(),
            data_store_files,
            data_store_count: count,
            last_modified,
        }
    };

    Some(account)
}

/// Stable hash-derived pseudonym for an account identifier.
fn pseudonymize(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.as_bytes());
    format!("user-{:02x}{:02x}{:02x}{:02x}", digest[0], digest[1], digest[2], digest[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_naming_convention() {
        assert!(is_account_name(Platform::WeChat, "wxid_a1b2c3"));
        assert!(!is_account_name(Platform::WeChat, "All Users"));
        assert!(is_account_name(Platform::Qq, "123456789"));
        assert!(!is_account_name(Platform::Qq, "12345a"));
        assert!(!is_account_name(Platform::Qq, ""));
    }

    #[test]
    fn test_data_store_naming_convention() {
        assert!(is_data_store(Platform::WeChat, "MicroMsg.db"));
        assert!(!is_data_store(Platform::WeChat, "readme.txt"));
        assert!(is_data_store(Platform::Qq, "Msg3.0.db"));
        assert!(!is_data_store(Platform::Qq, "cache.db"));
        assert!(!is_data_store(Platform::Qq, "MsgBackup.txt"));
    }

    #[test]
    fn test_pseudonym_is_stable() {
        assert_eq!(pseudonymize("123456789"), pseudonymize("123456789"));
        assert_ne!(pseudonymize("123456789"), pseudonymize("987654321"));
        assert!(pseudonymize("123456789").starts_with("user-"));
    }

    #[test]
    fn test_scan_missing_roots_is_empty() {
        let config = ScanConfig::default()
            .with_wechat_root("/definitely/not/a/real/path")
            .with_qq_root("/also/not/real");
        let scanner = AccountScanner::new(config);

        assert!(scanner.scan(Platform::WeChat, PrivacyLevel::Basic).is_empty());
        assert!(scanner.scan(Platform::Qq, PrivacyLevel::Basic).is_empty());
    }

    #[test]
    fn test_for_user_builds_roots() {
        let config = ScanConfig::for_user("alice");
        assert!(config.wechat_roots[0].to_string_lossy().contains("alice"));
        assert!(config.qq_roots[0].to_string_lossy().contains("alice"));
    }
}
