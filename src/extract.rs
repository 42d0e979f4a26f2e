//! Extraction orchestration: fan-out parsing, merge/dedup, reporting.
//!
//! [`ExtractionManager`] ties the pieces together. It reads each configured
//! export file (with a size guard and a GBK retry for non-UTF-8 files),
//! resolves the platform from the hint or by auto-detection, annotates the
//! records with their origin, and leaves merging and reporting to
//! [`merge_and_sort`] and [`ExtractionManager::generate_report`].
//!
//! Failure isolation: a missing or unreadable file produces a warning and
//! zero records; the batch always completes with whatever was extracted.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatunify::config::ExtractConfig;
//! use chatunify::extract::{ExtractionManager, FileConfig, TypeHint, merge_and_sort};
//!
//! let manager = ExtractionManager::new(ExtractConfig::default());
//! let extraction = manager.extract_from_files(&[
//!     FileConfig::new("wechat_export.txt", TypeHint::WeChat),
//!     FileConfig::new("qq_export.txt", TypeHint::Auto),
//! ]);
//! let unified = merge_and_sort(extraction.messages);
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::Message;
use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::parser::{Platform, attach_parse_context, create_parser, parse_auto};
use crate::privacy::{PrivacyLevel, PrivacyManager};
use crate::scanner::ScanResult;

/// Platform hint for one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    /// Parse with the WeChat rule only.
    WeChat,
    /// Parse with the QQ rule only.
    Qq,
    /// Run format auto-detection.
    Auto,
}

impl TypeHint {
    fn platform(self) -> Option<Platform> {
        match self {
            TypeHint::WeChat => Some(Platform::WeChat),
            TypeHint::Qq => Some(Platform::Qq),
            TypeHint::Auto => None,
        }
    }
}

impl std::fmt::Display for TypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeHint::WeChat => write!(f, "wechat"),
            TypeHint::Qq => write!(f, "qq"),
            TypeHint::Auto => write!(f, "auto"),
        }
    }
}

impl std::str::FromStr for TypeHint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wechat" | "wx" => Ok(TypeHint::WeChat),
            "qq" => Ok(TypeHint::Qq),
            "auto" => Ok(TypeHint::Auto),
            _ => Err(format!(
                "Unknown type hint: '{s}'. Expected one of: wechat, qq, auto"
            )),
        }
    }
}

/// One input file plus its platform hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Path to the export file.
    pub path: PathBuf,
    /// Platform hint, or `Auto` for detection.
    pub hint: TypeHint,
}

impl FileConfig {
    /// Creates a file config.
    pub fn new(path: impl Into<PathBuf>, hint: TypeHint) -> Self {
        Self {
            path: path.into(),
            hint,
        }
    }
}

/// Outcome of a batch extraction: records plus per-file warnings.
#[derive(Debug, Default)]
pub struct Extraction {
    /// All extracted records, in file order then appearance order.
    pub messages: Vec<Message>,
    /// One entry per skipped or failed input.
    pub warnings: Vec<String>,
}

/// Orchestrates parsing, privacy application and reporting.
pub struct ExtractionManager {
    config: ExtractConfig,
    privacy: PrivacyManager,
}

impl ExtractionManager {
    /// Creates a manager with the given configuration and a fresh
    /// privacy manager.
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            privacy: PrivacyManager::new(),
        }
    }

    /// Returns the privacy manager this orchestrator owns.
    pub fn privacy(&self) -> &PrivacyManager {
        &self.privacy
    }

    /// Reads one export file, enforcing the size guard and retrying GBK
    /// when the content is not UTF-8.
    fn read_export(&self, path: &Path) -> Result<String> {
        let size = fs::metadata(path)?.len();
        if size > self.config.max_file_size {
            return Err(ExtractError::size_limit(path, size, self.config.max_file_size));
        }

        let bytes = fs::read(path)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                let (decoded, _, had_errors) = encoding_rs::GBK.decode(e.as_bytes());
                if had_errors {
                    Err(ExtractError::encoding(Some(path.to_path_buf())))
                } else {
                    info!(file = %path.display(), "decoded with GBK fallback");
                    Ok(decoded.into_owned())
                }
            }
        }
    }

    fn parse_one(&self, path: &Path, hint: TypeHint) -> Result<(Platform, Vec<Message>)> {
        let content = self.read_export(path)?;
        match hint.platform() {
            Some(platform) => {
                let messages = create_parser(platform)
                    .parse_str(&content)
                    .map_err(|e| attach_parse_context(platform, e, path))?;
                Ok((platform, messages))
            }
            None => parse_auto(&content),
        }
    }

    /// Extracts records from multiple export files.
    ///
    /// Missing files are skipped with a warning; per-file read or parse
    /// failures contribute zero records. The batch never aborts. Every
    /// record is annotated with its originating file path and the platform
    /// that was resolved for it.
    pub fn extract_from_files(&self, configs: &[FileConfig]) -> Extraction {
        let mut extraction = Extraction::default();

        for config in configs {
            if !config.path.exists() {
                let note = format!("file not found: {}", config.path.display());
                warn!("{note}");
                extraction.warnings.push(note);
                continue;
            }

            match self.parse_one(&config.path, config.hint) {
                Ok((platform, messages)) => {
                    info!(
                        file = %config.path.display(),
                        %platform,
                        count = messages.len(),
                        "extracted messages"
                    );
                    let path_str = config.path.display().to_string();
                    extraction.messages.extend(messages.into_iter().map(|msg| {
                        msg.with_source_file(path_str.clone())
                            .with_detected_type(platform)
                    }));
                }
                Err(e) => {
                    let note = format!("skipped {}: {e}", config.path.display());
                    warn!("{note}");
                    extraction.warnings.push(note);
                }
            }
        }

        extraction
    }

    /// Full pipeline for one privacy level: extract, anonymize when the
    /// policy asks for it, then merge and sort.
    pub fn extract_unified(&self, configs: &[FileConfig], level: PrivacyLevel) -> Extraction {
        let mut extraction = self.extract_from_files(configs);

        if level.policy().anonymizes {
            extraction.messages = self.privacy.anonymize(&extraction.messages);
        } else {
            for msg in &mut extraction.messages {
                msg.privacy_level = level;
            }
        }

        extraction.messages = merge_and_sort(std::mem::take(&mut extraction.messages));
        extraction
    }

    /// Builds a report over a scan result and an extracted message set.
    ///
    /// Entirely recomputed on each call; nothing is cached.
    pub fn generate_report(&self, scan: &ScanResult, messages: &[Message]) -> ExtractionReport {
        ExtractionReport {
            scan_summary: ScanSummary {
                wechat_accounts: scan.wechat_accounts.len(),
                qq_accounts: scan.qq_accounts.len(),
                scan_time: scan.scan_time,
            },
            extraction_summary: ExtractionSummary {
                total_messages: messages.len(),
                message_sources: count_sources(messages),
                time_range: time_range(messages),
                top_senders: top_senders(messages, self.config.top_senders),
            },
            recommendations: recommendations(scan, messages),
        }
    }
}

/// Sorts chronologically and drops exact duplicates.
///
/// - Sort is stable and ascending by timestamp; records with an unknown
///   timestamp sort first, and ties keep their order of appearance.
/// - The dedup key is (`timestamp`, `sender`, first 50 chars of content);
///   the first occurrence in sorted order is kept.
///
/// Calling this on its own output returns the input unchanged.
pub fn merge_and_sort(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by_key(|m| m.timestamp);

    let before = messages.len();
    let mut seen: HashSet<(Option<DateTime<Utc>>, String, String)> = HashSet::new();
    messages.retain(|msg| {
        seen.insert((msg.timestamp, msg.sender.clone(), msg.content_prefix(50)))
    });

    if messages.len() < before {
        info!(
            before,
            after = messages.len(),
            "removed duplicate messages"
        );
    }
    messages
}

// ============================================================================
// Report types
// ============================================================================

/// Derived summary over a scan result and a message set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Account discovery summary.
    pub scan_summary: ScanSummary,
    /// Message extraction summary.
    pub extraction_summary: ExtractionSummary,
    /// Policy text, not computed from message content beyond presence checks.
    pub recommendations: Vec<String>,
}

/// Account counts from the scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of WeChat accounts discovered.
    pub wechat_accounts: usize,
    /// Number of QQ accounts discovered.
    pub qq_accounts: usize,
    /// When the scan ran.
    pub scan_time: DateTime<Utc>,
}

/// Aggregates over the extracted message set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Total records.
    pub total_messages: usize,
    /// Record count per source tag.
    pub message_sources: BTreeMap<String, usize>,
    /// Min/max timestamp over records that have one; `None` when none do.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    /// Most active senders, descending by count.
    pub top_senders: Vec<SenderCount>,
}

/// Span between the earliest and latest known timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Earliest timestamp.
    pub earliest: DateTime<Utc>,
    /// Latest timestamp.
    pub latest: DateTime<Utc>,
}

/// One sender's message count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderCount {
    /// Sender display name or pseudonym.
    pub sender: String,
    /// Number of messages.
    pub message_count: usize,
}

fn count_sources(messages: &[Message]) -> BTreeMap<String, usize> {
    let mut sources = BTreeMap::new();
    for msg in messages {
        let key = if msg.source.is_empty() {
            "unknown".to_string()
        } else {
            msg.source.clone()
        };
        *sources.entry(key).or_insert(0) += 1;
    }
    sources
}

fn time_range(messages: &[Message]) -> Option<TimeRange> {
    let timestamps: Vec<DateTime<Utc>> = messages.iter().filter_map(|m| m.timestamp).collect();
    Some(TimeRange {
        earliest: *timestamps.iter().min()?,
        latest: *timestamps.iter().max()?,
    })
}

/// Frequency count over senders, descending; ties resolve to the sender
/// encountered first.
fn top_senders(messages: &[Message], limit: usize) -> Vec<SenderCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (i, msg) in messages.iter().enumerate() {
        *counts.entry(msg.sender.as_str()).or_insert(0) += 1;
        first_seen.entry(msg.sender.as_str()).or_insert(i);
    }

    let mut senders: Vec<(&str, usize)> = counts.into_iter().collect();
    senders.sort_by_key(|(sender, count)| (Reverse(*count), first_seen[sender]));
    senders.truncate(limit);

    senders
        .into_iter()
        .map(|(sender, message_count)| SenderCount {
            sender: sender.to_string(),
            message_count,
        })
        .collect()
}

fn recommendations(scan: &ScanResult, messages: &[Message]) -> Vec<String> {
    let mut recs = Vec::new();

    if messages.is_empty() {
        recs.push("No messages were extracted; check the file format or paths.".to_string());
    }
    if !scan.wechat_accounts.is_empty() {
        recs.push(
            "WeChat accounts discovered; prefer the official WeChat export feature \
             for complete history."
                .to_string(),
        );
    }
    if !scan.qq_accounts.is_empty() {
        recs.push(
            "QQ accounts discovered; prefer a dedicated QQ history export tool.".to_string(),
        );
    }
    recs.push("Clean up exported chat files regularly to protect privacy.".to_string());
    recs.push("Make sure everyone involved has consented before processing.".to_string());

    recs
}
