//! Chat export parsers, one per platform.
//!
//! Each parser implements the [`ChatParser`] trait and converts one
//! platform's text export layout into normalized [`Message`] records.
//!
//! - [`WeChatParser`] — bracketed-timestamp WeChat text exports
//! - [`QqParser`] — unbracketed-timestamp QQ text exports
//!
//! # Example
//!
//! ```rust
//! use chatunify::parser::{ChatParser, Platform, create_parser};
//!
//! let parser = create_parser(Platform::WeChat);
//! let messages = parser.parse_str("[2024/2/1 14:30:00] Alice: hello")?;
//! assert_eq!(messages[0].sender, "Alice");
//! # Ok::<(), chatunify::ExtractError>(())
//! ```
//!
//! [`ChatParser`]: crate::parser::ChatParser
//! [`Message`]: crate::Message

mod qq;
mod wechat;

pub use qq::QqParser;
pub use wechat::WeChatParser;
