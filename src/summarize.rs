//! Summarization seam for external collaborators.
//!
//! The core stays transport-free: [`Summarizer`] is the trait a caller
//! implements against whatever backend they use, and [`SummaryRequest`]
//! carries the flattened transcript plus an optional focus hint. Upstream
//! failures surface as [`ExtractError::Service`].

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A transcript to summarize, with an optional focus hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Flattened `[timestamp] sender: content` transcript.
    pub transcript: String,
    /// Optional aspect to focus the summary on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

impl SummaryRequest {
    /// Creates a request for the given transcript.
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            focus: None,
        }
    }

    /// Sets the focus hint.
    #[must_use]
    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }
}

/// A backend that turns a transcript into a prose summary.
///
/// Implementations own their transport and credentials. A non-success
/// upstream status should be reported as [`crate::ExtractError::Service`].
pub trait Summarizer {
    /// Produces a summary for the request.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable or rejects the
    /// request.
    fn summarize(&self, request: &SummaryRequest) -> Result<String>;
}
