//! Extraction configuration.
//!
//! # Example
//!
//! ```rust
//! use chatunify::config::ExtractConfig;
//!
//! let config = ExtractConfig::new()
//!     .with_max_file_size(10 * 1024 * 1024)
//!     .with_top_senders(5);
//! ```

use serde::{Deserialize, Serialize};

/// Default byte ceiling for a single export file (100 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Default number of senders listed in a report.
pub const DEFAULT_TOP_SENDERS: usize = 10;

/// Settings for the extraction manager.
///
/// Environment-derived values (username, export directory) are resolved by
/// the binary at startup and passed in; the library takes no direct
/// dependency on environment access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Inputs above this many bytes are rejected before any parsing attempt.
    pub max_file_size: u64,

    /// How many senders the report's frequency table keeps.
    pub top_senders: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            top_senders: DEFAULT_TOP_SENDERS,
        }
    }
}

impl ExtractConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-file byte ceiling.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Sets how many senders reports keep.
    #[must_use]
    pub fn with_top_senders(mut self, n: usize) -> Self {
        self.top_senders = n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.max_file_size, 100 * 1024 * 1024);
        assert_eq!(config.top_senders, 10);
    }

    #[test]
    fn test_builder() {
        let config = ExtractConfig::new()
            .with_max_file_size(1024)
            .with_top_senders(3);
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.top_senders, 3);
    }
}
