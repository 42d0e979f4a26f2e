//! Normalized message type shared by all parsers.
//!
//! This module provides [`Message`], the single record shape every export
//! format is normalized into.
//!
//! # Overview
//!
//! A message consists of:
//! - **Required**: `sender`, `content`, `source`
//! - **Optional**: `timestamp`, `sender_handle`, `source_file`, `detected_type`
//!
//! `timestamp` is `None` when the source text carried a timestamp that could
//! not be parsed under any known layout. Records with an unknown timestamp
//! are kept, sort before everything else in [`merge_and_sort`], and are
//! excluded from report time ranges.
//!
//! [`merge_and_sort`]: crate::extract::merge_and_sort
//!
//! # Examples
//!
//! ```
//! use chatunify::Message;
//!
//! let msg = Message::new("Alice", "Hello, world!");
//! assert_eq!(msg.sender, "Alice");
//! assert!(msg.timestamp.is_none());
//! ```
//!
//! ```
//! use chatunify::Message;
//! use chrono::Utc;
//!
//! let msg = Message::new("Bob", "ping")
//!     .with_source("qq-text-export")
//!     .with_timestamp(Utc::now())
//!     .with_handle("123456789");
//!
//! assert_eq!(msg.source, "qq-text-export");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::Platform;
use crate::privacy::PrivacyLevel;

/// A normalized chat message from any supported platform.
///
/// Parsers create these; the privacy manager may rewrite `sender`,
/// `content`, `sender_handle` and `source_file`; the extraction manager
/// annotates `source_file` and `detected_type`. After merging, records are
/// never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Display name or pseudonym of the message author.
    pub sender: String,

    /// Text content, trimmed of leading/trailing whitespace.
    ///
    /// May contain newlines for multiline messages.
    pub content: String,

    /// When the message was sent, or `None` if the source timestamp could
    /// not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Origin platform and extraction method, e.g. `"wechat-text-export"`.
    #[serde(default)]
    pub source: String,

    /// The policy under which this record was produced.
    #[serde(default)]
    pub privacy_level: PrivacyLevel,

    /// Platform-specific sender identifier (e.g. a QQ number).
    ///
    /// Redactable independently of `sender`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sender_handle: Option<String>,

    /// Path of the originating export file.
    ///
    /// Attached by the extraction manager, not by parsers.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source_file: Option<String>,

    /// The platform the extraction manager resolved for this record.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub detected_type: Option<Platform>,
}

impl Message {
    /// Creates a new message with only sender and content.
    ///
    /// All other fields take their defaults; `source` is empty until a
    /// parser tags it.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: None,
            source: String::new(),
            privacy_level: PrivacyLevel::Basic,
            sender_handle: None,
            source_file: None,
            detected_type: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Builder method to set the source tag.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Builder method to set the privacy level.
    #[must_use]
    pub fn with_privacy_level(mut self, level: PrivacyLevel) -> Self {
        self.privacy_level = level;
        self
    }

    /// Builder method to set the platform-specific handle.
    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.sender_handle = Some(handle.into());
        self
    }

    /// Builder method to set the originating file path.
    #[must_use]
    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    /// Builder method to set the detected platform.
    #[must_use]
    pub fn with_detected_type(mut self, platform: Platform) -> Self {
        self.detected_type = Some(platform);
        self
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns `true` if this message's content is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Returns the first `n` characters of the content.
    ///
    /// Used as part of the dedup key; counted in `char`s, not bytes, so
    /// multibyte text never splits.
    pub fn content_prefix(&self, n: usize) -> String {
        self.content.chars().take(n).collect()
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new("", "")
    }
}
