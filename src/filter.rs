//! Filter messages by date range and sender.
//!
//! [`FilterConfig`] holds the criteria and [`apply_filters`] applies them.
//! Filters are combined with AND logic; an empty config passes everything
//! through unchanged.
//!
//! # Examples
//!
//! ```
//! use chatunify::Message;
//! use chatunify::filter::{FilterConfig, apply_filters};
//!
//! let messages = vec![
//!     Message::new("Alice", "Hello"),
//!     Message::new("Bob", "Hi there"),
//!     Message::new("Alice", "How are you?"),
//! ];
//!
//! // Case-insensitive sender matching
//! let config = FilterConfig::new().with_sender("alice");
//! let filtered = apply_filters(messages, &config);
//! assert_eq!(filtered.len(), 2);
//! ```
//!
//! # Behavior Notes
//!
//! - Messages without timestamps are **excluded** when date filters are active
//! - Sender matching is case-insensitive for ASCII characters

use chrono::{DateTime, NaiveDate, Utc};

use crate::Message;
use crate::error::ExtractError;

/// Criteria for filtering messages by date and sender.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Include only messages on or after this timestamp.
    pub after: Option<DateTime<Utc>>,

    /// Include only messages on or before this timestamp.
    pub before: Option<DateTime<Utc>>,

    /// Include only messages from this sender (case-insensitive).
    pub from: Option<String>,
}

impl FilterConfig {
    /// Creates an empty filter configuration; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, ExtractError> {
        let naive = parse_date(date_str)?;
        self.after = naive.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, ExtractError> {
        let naive = parse_date(date_str)?;
        // End of the day to include the full day
        self.before = naive.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc());
        Ok(self)
    }

    /// Sets the sender filter. Matching is case-insensitive for ASCII.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.from = Some(sender.into());
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.after.is_some() || self.before.is_some() || self.from.is_some()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate, ExtractError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ExtractError::invalid_date(date_str))
}

/// Filters a collection of messages against the given configuration.
///
/// Returns only the messages that match all active filters. With no active
/// filters the input vector is returned unchanged.
pub fn apply_filters(messages: Vec<Message>, config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages;
    }

    messages
        .into_iter()
        .filter(|msg| {
            if let Some(ref from) = config.from
                && !msg.sender.eq_ignore_ascii_case(from)
            {
                return false;
            }

            if config.has_date_filter() {
                let Some(ts) = msg.timestamp else {
                    return false;
                };
                if let Some(after) = config.after
                    && ts < after
                {
                    return false;
                }
                if let Some(before) = config.before
                    && ts > before
                {
                    return false;
                }
            }

            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dated(sender: &str, content: &str, day: u32) -> Message {
        Message::new(sender, content)
            .with_timestamp(Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_inactive_config_passes_everything() {
        let messages = vec![Message::new("a", "1"), Message::new("b", "2")];
        let filtered = apply_filters(messages.clone(), &FilterConfig::new());
        assert_eq!(filtered.len(), messages.len());
    }

    #[test]
    fn test_sender_filter_is_case_insensitive() {
        let messages = vec![
            Message::new("Alice", "1"),
            Message::new("ALICE", "2"),
            Message::new("Bob", "3"),
        ];
        let config = FilterConfig::new().with_sender("alice");
        assert_eq!(apply_filters(messages, &config).len(), 2);
    }

    #[test]
    fn test_date_range_inclusive() {
        let messages = vec![dated("a", "early", 1), dated("a", "mid", 15), dated("a", "late", 30)];
        let config = FilterConfig::new()
            .with_date_from("2024-06-15")
            .unwrap()
            .with_date_to("2024-06-30")
            .unwrap();
        let filtered = apply_filters(messages, &config);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].content, "mid");
    }

    #[test]
    fn test_date_filter_excludes_undated() {
        let messages = vec![dated("a", "dated", 15), Message::new("a", "undated")];
        let config = FilterConfig::new().with_date_from("2024-06-01").unwrap();
        let filtered = apply_filters(messages, &config);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].content, "dated");
    }

    #[test]
    fn test_invalid_date_string() {
        let err = FilterConfig::new().with_date_from("15/06/2024").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDate { .. }));
    }

    #[test]
    fn test_combined_filters_use_and_logic() {
        let messages = vec![dated("Alice", "in", 15), dated("Bob", "wrong sender", 15)];
        let config = FilterConfig::new()
            .with_sender("Alice")
            .with_date_from("2024-06-10")
            .unwrap();
        let filtered = apply_filters(messages, &config);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sender, "Alice");
    }
}
