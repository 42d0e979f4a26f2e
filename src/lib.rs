//! # Chatunify
//!
//! A Rust library for extracting, normalizing and anonymizing chat history
//! exported from Chinese messaging platforms.
//!
//! ## Overview
//!
//! Chatunify provides a unified API for working with text exports from:
//! - **WeChat** — bracketed-header exports (`[2024/02/01 14:30:25] sender: ...`)
//! - **QQ** — unbracketed exports (`2024-02-01 14:30:25 sender(10001) ...`)
//!
//! The library auto-detects which format an input file uses, normalizes every
//! record into a single [`Message`] shape, merges and deduplicates records
//! across files, and applies configurable privacy protection (pseudonyms,
//! pattern-based redaction) before anything leaves the machine.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatunify::config::ExtractConfig;
//! use chatunify::extract::{ExtractionManager, FileConfig, TypeHint, merge_and_sort};
//! use chatunify::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let manager = ExtractionManager::new(ExtractConfig::default());
//!
//!     // Extract from multiple exports; per-file failures become warnings.
//!     let extraction = manager.extract_from_files(&[
//!         FileConfig::new("wechat_chat.txt", TypeHint::WeChat),
//!         FileConfig::new("qq_chat.txt", TypeHint::Auto),
//!     ]);
//!
//!     // Chronological merge with exact-duplicate removal.
//!     let unified = merge_and_sort(extraction.messages);
//!     println!("{} messages", unified.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Privacy
//!
//! [`PrivacyManager`](privacy::PrivacyManager) replaces sender names with
//! per-batch pseudonyms and redacts phone numbers, emails, ID cards, bank
//! cards, addresses, QQ numbers and WeChat ids from message content:
//!
//! ```rust
//! use chatunify::privacy::PrivacyManager;
//!
//! let privacy = PrivacyManager::new();
//! let clean = privacy.redact("我的手机是13812345678");
//! assert_eq!(clean, "我的手机是[PHONE]");
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — Format detection and the [`ChatParser`](parser::ChatParser) trait
//! - [`parsers`] — [`WeChatParser`](parsers::WeChatParser), [`QqParser`](parsers::QqParser)
//! - [`scanner`] — On-disk account discovery ([`AccountScanner`](scanner::AccountScanner))
//! - [`extract`] — Batch extraction, merge/dedup, reporting
//! - [`privacy`] — Privacy levels, redaction rules, anonymization
//! - [`export`] — Unified JSON envelope and transcript formatting
//! - [`filter`] — [`FilterConfig`](filter::FilterConfig), [`apply_filters`](filter::apply_filters)
//! - [`summarize`] — [`Summarizer`](summarize::Summarizer) trait seam
//! - [`config`] — [`ExtractConfig`](config::ExtractConfig)
//! - [`error`] — Unified error types ([`ExtractError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod privacy;
pub mod scanner;
pub mod summarize;

// Re-export the main types at the crate root for convenience
pub use error::{ExtractError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatunify::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::Message;

    // Error types
    pub use crate::error::{ExtractError, Result};

    // Format detection and parsing
    pub use crate::parser::{ChatParser, Platform, create_parser, detect_platform, parse_auto};
    pub use crate::parsers::{QqParser, WeChatParser};

    // Discovery
    pub use crate::scanner::{Account, AccountScanner, ScanConfig, ScanResult};

    // Extraction pipeline
    pub use crate::extract::{
        Extraction, ExtractionManager, ExtractionReport, FileConfig, TypeHint, merge_and_sort,
    };

    // Privacy
    pub use crate::privacy::{PrivacyLevel, PrivacyManager, PrivacyPolicy};

    // Export and transcripts
    pub use crate::export::{UnifiedExport, format_transcript, read_unified, write_unified};

    // Filtering
    pub use crate::filter::{FilterConfig, apply_filters};

    // Summarization seam
    pub use crate::summarize::{SummaryRequest, Summarizer};

    // Configuration
    pub use crate::config::ExtractConfig;
}
