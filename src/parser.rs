//! Unified parser trait, platform selection and format auto-detection.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatunify::parser::{ChatParser, Platform, create_parser};
//! use std::path::Path;
//!
//! # fn main() -> chatunify::Result<()> {
//! let parser = create_parser(Platform::WeChat);
//! let messages = parser.parse(Path::new("wechat_export.txt"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Auto-detection
//!
//! When the caller has no format hint, [`parse_auto`] scores the text against
//! a ranked list of [`FormatDetector`]s. Each detector counts platform
//! lexical markers plus structural probe matches (does the platform's
//! timestamp pattern appear anywhere?). Selection is deterministic: highest
//! count wins, and on a tie the first-registered detector (WeChat) wins.
//! If scoring is inconclusive, both parsers run and the larger result set
//! is kept.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Message;
use crate::error::{ExtractError, Result};

/// Supported chat platforms.
///
/// # Example
///
/// ```rust
/// use chatunify::parser::Platform;
/// use std::str::FromStr;
///
/// let platform = Platform::from_str("wechat").unwrap();
/// assert_eq!(platform, Platform::WeChat);
///
/// // Aliases are supported
/// let platform = Platform::from_str("wx").unwrap();
/// assert_eq!(platform, Platform::WeChat);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// WeChat text exports, bracketed timestamps
    #[serde(alias = "wx")]
    WeChat,

    /// QQ text exports, unbracketed timestamps
    Qq,
}

impl Platform {
    /// Returns all available platforms, in registration order.
    pub fn all() -> &'static [Platform] {
        &[Platform::WeChat, Platform::Qq]
    }

    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["wechat", "wx", "qq"]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::WeChat => write!(f, "WeChat"),
            Platform::Qq => write!(f, "QQ"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wechat" | "wx" => Ok(Platform::WeChat),
            "qq" => Ok(Platform::Qq),
            _ => Err(format!(
                "Unknown platform: '{}'. Expected one of: {}",
                s,
                Platform::all_names().join(", ")
            )),
        }
    }
}

/// Trait for parsing chat exports from different platforms.
///
/// Parsing is a pure function of the input text plus the platform's
/// recognition rules: no side effects, output in order of appearance.
pub trait ChatParser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the platform this parser handles.
    fn platform(&self) -> Platform;

    /// Parses a chat export file and returns all messages.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file cannot be read, or
    /// [`ExtractError::Parse`] naming the format and the file when the
    /// content matches nothing.
    fn parse(&self, path: &Path) -> Result<Vec<Message>> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
            .map_err(|e| attach_parse_context(self.platform(), e, path))
    }

    /// Parses chat content from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FormatDetection`] when no message header
    /// matches at all; a partial parse is never returned for unmatched text.
    fn parse_str(&self, content: &str) -> Result<Vec<Message>>;
}

/// A ranked format detector: lexical markers plus a structural probe.
pub struct FormatDetector {
    platform: Platform,
    markers: &'static [&'static str],
    probe: Regex,
}

impl FormatDetector {
    fn new(platform: Platform, markers: &'static [&'static str], probe: &str) -> Self {
        Self {
            platform,
            markers,
            probe: Regex::new(probe).expect("built-in probe pattern"),
        }
    }

    /// Returns the platform this detector recognizes.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Scores the text: one point per marker present plus one per probe hit.
    pub fn score(&self, text: &str) -> usize {
        let marker_hits = self.markers.iter().filter(|m| text.contains(*m)).count();
        let probe_hits = self.probe.find_iter(text).count();
        marker_hits + probe_hits
    }
}

/// Returns the detector registry in rank order.
///
/// WeChat is registered first, so it wins ties.
pub fn detectors() -> Vec<FormatDetector> {
    vec![
        FormatDetector::new(
            Platform::WeChat,
            &["wxid_", "微信"],
            r"\[\d{4}/\d{1,2}/\d{1,2}\s+\d{1,2}:\d{1,2}:\d{1,2}\]",
        ),
        FormatDetector::new(
            Platform::Qq,
            &["QQ", "qq.com", "腾讯"],
            r"(?m)^\d{4}-\d{1,2}-\d{1,2}\s+\d{1,2}:\d{1,2}:\d{1,2}",
        ),
    ]
}

/// Scores the text against all detectors and returns the winner, if any.
///
/// Returns `None` when no detector scores, or when more than one scores and
/// none stands out (the caller should then try both parsers).
pub fn detect_platform(text: &str) -> Option<Platform> {
    let detectors = detectors();
    let scores: Vec<usize> = detectors.iter().map(|d| d.score(text)).collect();

    let max = *scores.iter().max()?;
    if max == 0 {
        return None;
    }

    let winner = scores.iter().position(|&s| s == max)?;
    debug!(
        platform = %detectors[winner].platform(),
        score = max,
        "format detected"
    );
    Some(detectors[winner].platform())
}

/// Promotes a pattern-level failure to a file-level [`ExtractError::Parse`]
/// carrying the format name and the offending path.
///
/// Anything other than a detection failure passes through untouched.
pub fn attach_parse_context(platform: Platform, err: ExtractError, path: &Path) -> ExtractError {
    match err {
        ExtractError::FormatDetection { message } => match platform {
            Platform::WeChat => ExtractError::wechat_parse(message, Some(path.to_path_buf())),
            Platform::Qq => ExtractError::qq_parse(message, Some(path.to_path_buf())),
        },
        other => other,
    }
}

/// Creates a parser for the specified platform.
///
/// # Example
///
/// ```rust
/// use chatunify::parser::{Platform, create_parser};
///
/// let parser = create_parser(Platform::Qq);
/// assert_eq!(parser.name(), "QQ");
/// ```
pub fn create_parser(platform: Platform) -> Box<dyn ChatParser> {
    match platform {
        Platform::WeChat => Box::new(crate::parsers::WeChatParser::new()),
        Platform::Qq => Box::new(crate::parsers::QqParser::new()),
    }
}

/// Parses text with format auto-detection.
///
/// Returns the resolved platform together with the messages. When detection
/// is inconclusive, both platform rules run and the one producing more
/// records wins, ties favoring WeChat.
///
/// # Errors
///
/// Returns [`ExtractError::FormatDetection`] when neither rule produces a
/// single record.
pub fn parse_auto(text: &str) -> Result<(Platform, Vec<Message>)> {
    if let Some(platform) = detect_platform(text) {
        if let Ok(messages) = create_parser(platform).parse_str(text) {
            if !messages.is_empty() {
                return Ok((platform, messages));
            }
        }
        debug!(%platform, "detected platform produced no records, trying all rules");
    }

    // Inconclusive: run every rule and keep the largest result set.
    let mut best: Option<(Platform, Vec<Message>)> = None;
    for &platform in Platform::all() {
        let messages = create_parser(platform)
            .parse_str(text)
            .unwrap_or_default();
        match &best {
            Some((_, current)) if current.len() >= messages.len() => {}
            _ if messages.is_empty() => {}
            _ => best = Some((platform, messages)),
        }
    }

    best.ok_or_else(|| {
        ExtractError::format_detection("no platform's message pattern matched the input")
    })
}
