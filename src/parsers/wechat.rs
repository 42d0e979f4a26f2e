//! WeChat text export parser.
//!
//! WeChat text exports use a bracketed timestamp followed by the sender and
//! the first content line:
//!
//! ```text
//! [2024/2/1 14:30:00] Alice: hello
//! [2024/2/1 14:31:00] Bob: hi there
//! ```
//!
//! Lines that do not start a new message continue the previous message's
//! content. Single-digit month/day/hour fields are accepted.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::Message;
use crate::error::{ExtractError, Result};
use crate::parser::{ChatParser, Platform};

/// Source tag attached to every record this parser produces.
pub const SOURCE_TAG: &str = "wechat-text-export";

const HEADER_PATTERN: &str =
    r"^\[(\d{4}/\d{1,2}/\d{1,2}\s+\d{1,2}:\d{1,2}:\d{1,2})\]\s+([^:]+?):\s*(.*)$";

/// Primary and fallback timestamp layouts.
///
/// The dash layout shows up in exports that went through third-party tools.
const TIMESTAMP_LAYOUTS: [&str; 2] = ["%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parser for WeChat text exports.
///
/// # Example
///
/// ```rust
/// use chatunify::parsers::WeChatParser;
/// use chatunify::parser::ChatParser;
///
/// let parser = WeChatParser::new();
/// let messages = parser.parse_str("[2024/2/1 14:30:00] Alice: hello")?;
/// assert_eq!(messages.len(), 1);
/// # Ok::<(), chatunify::ExtractError>(())
/// ```
pub struct WeChatParser {
    header: Regex,
}

impl WeChatParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self {
            header: Regex::new(HEADER_PATTERN).expect("built-in header pattern"),
        }
    }
}

impl Default for WeChatParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a captured timestamp, trying the primary layout then one fallback.
///
/// Returns `None` when both fail; the record is kept with an unknown
/// timestamp rather than guessing a time.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    // Collapse runs of whitespace between date and time.
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, layout) {
            return Some(naive.and_utc());
        }
    }
    None
}

impl ChatParser for WeChatParser {
    fn name(&self) -> &'static str {
        "WeChat"
    }

    fn platform(&self) -> Platform {
        Platform::WeChat
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = Vec::new();
        let mut matched_any = false;

        for line in content.lines() {
            if let Some(caps) = self.header.captures(line) {
                matched_any = true;

                let raw_ts = caps.get(1).map_or("", |m| m.as_str());
                let sender = caps.get(2).map_or("", |m| m.as_str().trim());
                let first_line = caps.get(3).map_or("", |m| m.as_str());

                let mut msg = Message::new(sender, first_line).with_source(SOURCE_TAG);
                if let Some(ts) = parse_timestamp(raw_ts) {
                    msg = msg.with_timestamp(ts);
                }
                messages.push(msg);
            } else if let Some(last) = messages.last_mut() {
                // Continuation of a multiline message.
                last.content.push('\n');
                last.content.push_str(line);
            }
            // Orphan lines before the first header are dropped.
        }

        if !matched_any {
            return Err(ExtractError::format_detection(
                "no WeChat bracketed-timestamp header found",
            ));
        }

        for msg in &mut messages {
            msg.content = msg.content.trim().to_string();
        }

        Ok(messages)
    }
}
