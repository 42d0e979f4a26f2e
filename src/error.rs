//! Unified error types for chatunify.
//!
//! This module provides a single [`ExtractError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - Failures local to one file or directory are logged and skipped by the
//!   batch operations; only failures that make the requested operation
//!   itself meaningless propagate as errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatunify operations.
///
/// # Example
///
/// ```rust
/// use chatunify::error::Result;
/// use chatunify::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExtractError>;

/// The error type for all chatunify operations.
///
/// Each variant carries context about what went wrong and, where applicable,
/// the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing an export)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Text could not be decoded as UTF-8 or as GBK.
    ///
    /// The extractor retries GBK once before giving up on a file.
    #[error("Could not decode text{}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Encoding {
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// No export format could be detected in the input text.
    ///
    /// Returned instead of a partial or garbled parse when neither
    /// platform's pattern matches anything.
    #[error("Could not detect chat export format: {message}")]
    FormatDetection {
        /// Description of what detection tried
        message: String,
    },

    /// Failed to parse the input under a known format.
    #[error("Failed to parse {format} export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "WeChat text", "QQ text")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// Input exceeds the configured byte ceiling.
    ///
    /// Rejected before any parsing attempt.
    #[error("File too large: {size} bytes (limit: {limit} bytes) for {}", path.display())]
    SizeLimit {
        /// The offending file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Invalid date format in a filter.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// JSON parsing/serialization error.
    ///
    /// This can occur when reading or writing the unified export document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The summarization collaborator returned a non-success status.
    ///
    /// Carries the upstream status and message; never swallowed.
    #[error("Summarization service failed with status {status}: {message}")]
    Service {
        /// Upstream status code
        status: u16,
        /// Upstream error message
        message: String,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// Regex/pattern matching error
    #[error("{0}")]
    Pattern(String),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ExtractError {
    /// Creates a parse error for the WeChat text format.
    pub fn wechat_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ExtractError::Parse {
            format: "WeChat text",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates a parse error for the QQ text format.
    pub fn qq_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ExtractError::Parse {
            format: "QQ text",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates a format detection error.
    pub fn format_detection(message: impl Into<String>) -> Self {
        ExtractError::FormatDetection {
            message: message.into(),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(path: Option<PathBuf>) -> Self {
        ExtractError::Encoding { path }
    }

    /// Creates a size limit error.
    pub fn size_limit(path: impl Into<PathBuf>, size: u64, limit: u64) -> Self {
        ExtractError::SizeLimit {
            path: path.into(),
            size,
            limit,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ExtractError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a service failure error.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        ExtractError::Service {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ExtractError::Io(_))
    }

    /// Returns `true` if the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExtractError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ExtractError::Parse { .. })
    }

    /// Returns `true` if this is a format detection failure.
    pub fn is_format_detection(&self) -> bool {
        matches!(self, ExtractError::FormatDetection { .. })
    }

    /// Returns `true` if this is a size limit rejection.
    pub fn is_size_limit(&self) -> bool {
        matches!(self, ExtractError::SizeLimit { .. })
    }

    /// Returns `true` if this is an encoding error.
    pub fn is_encoding(&self) -> bool {
        matches!(self, ExtractError::Encoding { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
