//! QQ text export parser.
//!
//! QQ history exports carry an unbracketed timestamp header followed by the
//! nickname and, usually, the sender's QQ number in parentheses; the message
//! body sits on the following lines:
//!
//! ```text
//! 2024-02-01 14:30:00 Alice(123456789)
//! hello
//! 2024-02-01 14:31:00 Bob(987654321)
//! hi there
//! ```
//!
//! Some tools flatten the record onto one line instead
//! (`2024-02-01 14:30:00 Alice: hello`); both layouts are accepted.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::Message;
use crate::error::{ExtractError, Result};
use crate::parser::{ChatParser, Platform};

/// Source tag attached to every record this parser produces.
pub const SOURCE_TAG: &str = "qq-text-export";

/// Header with the numeric QQ handle; content follows on later lines.
const HANDLE_HEADER_PATTERN: &str =
    r"^(\d{4}-\d{1,2}-\d{1,2}\s+\d{1,2}:\d{1,2}:\d{1,2})\s+(.+?)\((\d{1,11})\)\s*$";

/// Flattened header with the content on the same line, no handle.
const INLINE_HEADER_PATTERN: &str =
    r"^(\d{4}-\d{1,2}-\d{1,2}\s+\d{1,2}:\d{1,2}:\d{1,2})\s+([^:]+?):\s*(.*)$";

const TIMESTAMP_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Parser for QQ text exports.
///
/// # Example
///
/// ```rust
/// use chatunify::parsers::QqParser;
/// use chatunify::parser::ChatParser;
///
/// let parser = QqParser::new();
/// let messages = parser.parse_str("2024-02-01 14:30:00 Alice(123456)\nhello")?;
/// assert_eq!(messages[0].sender_handle.as_deref(), Some("123456"));
/// # Ok::<(), chatunify::ExtractError>(())
/// ```
pub struct QqParser {
    handle_header: Regex,
    inline_header: Regex,
}

impl QqParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self {
            handle_header: Regex::new(HANDLE_HEADER_PATTERN).expect("built-in header pattern"),
            inline_header: Regex::new(INLINE_HEADER_PATTERN).expect("built-in header pattern"),
        }
    }
}

impl Default for QqParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, layout) {
            return Some(naive.and_utc());
        }
    }
    None
}

impl ChatParser for QqParser {
    fn name(&self) -> &'static str {
        "QQ"
    }

    fn platform(&self) -> Platform {
        Platform::Qq
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = Vec::new();
        let mut matched_any = false;

        for line in content.lines() {
            // The handle form ends the line after `(digits)`, the inline
            // form requires a colon; try the handle form first.
            if let Some(caps) = self.handle_header.captures(line) {
                matched_any = true;

                let raw_ts = caps.get(1).map_or("", |m| m.as_str());
                let sender = caps.get(2).map_or("", |m| m.as_str().trim());
                let handle = caps.get(3).map_or("", |m| m.as_str());

                let mut msg = Message::new(sender, "")
                    .with_source(SOURCE_TAG)
                    .with_handle(handle);
                if let Some(ts) = parse_timestamp(raw_ts) {
                    msg = msg.with_timestamp(ts);
                }
                messages.push(msg);
            } else if let Some(caps) = self.inline_header.captures(line) {
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
                if !last.content.is_empty() {
                    last.content.push('\n');
                }
                last.content.push_str(line);
            }
        }

        if !matched_any {
            return Err(ExtractError::format_detection(
                "no QQ timestamp header found",
            ));
        }

        for msg in &mut messages {
            msg.content = msg.content.trim().to_string();
        }

        Ok(messages)
    }
}
