//! Privacy levels, redaction and pseudonymization.
//!
//! This module decides what a given privacy level allows and applies content
//! redaction and sender pseudonymization to message sets.
//!
//! # Overview
//!
//! - [`PrivacyLevel`] — the small closed set of levels (`basic`, `advanced`)
//! - [`PrivacyPolicy`] — what a level allows, resolved by [`PrivacyLevel::policy`]
//! - [`PrivacyManager`] — applies redaction rules and pseudonym mapping
//!
//! The pseudonym mapping is local to one [`PrivacyManager::anonymize`] call.
//! It is never persisted or reused, so the same sender gets the same
//! pseudonym within a call but a fresh one on the next call.
//!
//! # Example
//!
//! ```
//! use chatunify::privacy::PrivacyManager;
//! use chatunify::Message;
//!
//! let manager = PrivacyManager::new();
//! let messages = vec![Message::new("Alice", "call me at 13812345678")];
//! let anonymized = manager.anonymize(&messages);
//!
//! assert_eq!(anonymized[0].sender, "User 1");
//! assert!(anonymized[0].content.contains("[PHONE]"));
//! ```

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Message;

/// Named privacy policy level.
///
/// Unknown level names resolve to [`PrivacyLevel::Basic`], the most
/// conservative policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// Local-only processing, no anonymization, caller supplies their own key.
    #[default]
    Basic,
    /// Data may leave the machine; identifiers and content are anonymized.
    Advanced,
}

impl PrivacyLevel {
    /// Resolves a level name, falling back to `Basic` for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "advanced" => PrivacyLevel::Advanced,
            _ => PrivacyLevel::Basic,
        }
    }

    /// Returns the fixed policy for this level.
    pub fn policy(self) -> PrivacyPolicy {
        match self {
            PrivacyLevel::Basic => PrivacyPolicy {
                allows_sharing: false,
                requires_own_key: true,
                anonymizes: false,
                local_only: true,
            },
            PrivacyLevel::Advanced => PrivacyPolicy {
                allows_sharing: true,
                requires_own_key: false,
                anonymizes: true,
                local_only: false,
            },
        }
    }
}

impl std::str::FromStr for PrivacyLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl std::fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyLevel::Basic => write!(f, "basic"),
            PrivacyLevel::Advanced => write!(f, "advanced"),
        }
    }
}

/// What a privacy level allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivacyPolicy {
    /// Whether processed data may be shared with external services.
    pub allows_sharing: bool,
    /// Whether the caller must supply their own API key.
    pub requires_own_key: bool,
    /// Whether content and identifiers are anonymized.
    pub anonymizes: bool,
    /// Whether processing must stay on the local machine.
    pub local_only: bool,
}

/// Placeholder written over secondary identifier fields.
pub const REDACTED_FIELD: &str = "***";

/// One sensitive-content rule: a pattern and the tag that replaces matches.
struct RedactionRule {
    tag: &'static str,
    pattern: Regex,
}

/// Applies redaction rules and sender pseudonymization.
///
/// Construct one explicitly and pass it to whatever needs it; there is no
/// process-wide instance.
pub struct PrivacyManager {
    rules: Vec<RedactionRule>,
}

impl PrivacyManager {
    /// Creates a manager with the standard ordered rule set.
    ///
    /// Rules apply in order; later rules operate on the already-redacted
    /// output of earlier rules, so a substring consumed by one rule cannot
    /// also match a later one.
    pub fn new() -> Self {
        // Order matters: the narrow CN mobile rule must run before the
        // generic digit rules that would otherwise swallow its matches.
        let specs: [(&'static str, &'static str); 7] = [
            ("PHONE", r"1[3-9]\d{9}"),
            ("EMAIL", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
            ("ID_CARD", r"\d{17}[\dXx]"),
            ("BANK_CARD", r"\d{16,19}"),
            ("ADDRESS", r"[一-龥]+[省市区县][^\s]{2,20}"),
            ("QQ_NUMBER", r"[1-9]\d{4,10}"),
            ("WECHAT_ID", r"wxid_[a-zA-Z0-9_-]+"),
        ];

        let rules = specs
            .into_iter()
            .map(|(tag, pattern)| RedactionRule {
                tag,
                // Patterns are fixed literals; compilation cannot fail.
                pattern: Regex::new(pattern).expect("built-in redaction pattern"),
            })
            .collect();

        Self { rules }
    }

    /// Gates whether extraction and scanning may proceed at all.
    ///
    /// Always grants today; real consent enforcement lives in the
    /// application layer that owns user-facing configuration.
    pub fn consent_granted(&self, _level: PrivacyLevel) -> bool {
        true
    }

    /// Redacts sensitive substrings, replacing each match with its
    /// bracketed category tag (e.g. `[PHONE]`).
    pub fn redact(&self, content: &str) -> String {
        let mut redacted = content.to_string();
        for rule in &self.rules {
            redacted = rule
                .pattern
                .replace_all(&redacted, format!("[{}]", rule.tag))
                .into_owned();
        }
        redacted
    }

    /// Anonymizes a message set: sequential sender pseudonyms, content
    /// redaction, and placeholder substitution for secondary identifiers.
    ///
    /// Never drops a record and never changes record order or count.
    /// The sender mapping lives only for this call.
    pub fn anonymize(&self, messages: &[Message]) -> Vec<Message> {
        let mut sender_mapping: HashMap<String, String> = HashMap::new();

        messages
            .iter()
            .map(|msg| {
                let next = sender_mapping.len() + 1;
                let pseudonym = sender_mapping
                    .entry(msg.sender.clone())
                    .or_insert_with(|| format!("User {next}"))
                    .clone();

                let mut anonymized = msg.clone();
                anonymized.sender = pseudonym;
                anonymized.content = self.redact(&msg.content);
                if anonymized.sender_handle.is_some() {
                    anonymized.sender_handle = Some(REDACTED_FIELD.to_string());
                }
                if anonymized.source_file.is_some() {
                    anonymized.source_file = Some(REDACTED_FIELD.to_string());
                }
                anonymized.privacy_level = PrivacyLevel::Advanced;
                anonymized
            })
            .collect()
    }
}

impl Default for PrivacyManager {
    fn default() -> Self {
        Self::new()
    }
}
