//! Persisted unified export and plain-text transcripts.
//!
//! [`UnifiedExport`] is the on-disk JSON envelope: a format version, the
//! export time, a message count, free-form metadata and the messages
//! themselves. [`write_unified`] and [`read_unified`] round-trip it so that
//! sender, content and source survive byte-for-byte.
//!
//! [`format_transcript`] flattens messages into `[timestamp] sender: content`
//! lines for downstream summarization.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::error::Result;

/// Version string written into every export envelope.
pub const FORMAT_VERSION: &str = "1.0";

/// The persisted unified export envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedExport {
    /// Envelope format version, currently `"1.0"`.
    pub format_version: String,
    /// When the export was produced.
    pub export_time: DateTime<Utc>,
    /// Number of messages in the envelope.
    pub message_count: usize,
    /// Free-form metadata, e.g. tool version or privacy level.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// The messages, in the order they were merged.
    pub messages: Vec<Message>,
}

impl UnifiedExport {
    /// Wraps a message set in a fresh envelope stamped with the current time.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            export_time: Utc::now(),
            message_count: messages.len(),
            metadata: BTreeMap::new(),
            messages,
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Writes an export envelope as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_unified(export: &UnifiedExport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads an export envelope back from JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid envelope.
pub fn read_unified(path: &Path) -> Result<UnifiedExport> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Flattens messages into `[timestamp] sender: content` lines, one per
/// message, in input order. Messages without a timestamp render
/// `[unknown time]`.
pub fn format_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for msg in messages {
        match msg.timestamp {
            Some(ts) => {
                let _ = writeln!(
                    out,
                    "[{}] {}: {}",
                    ts.format("%Y-%m-%d %H:%M:%S"),
                    msg.sender,
                    msg.content
                );
            }
            None => {
                let _ = writeln!(out, "[unknown time] {}: {}", msg.sender, msg.content);
            }
        }
    }
    out
}
