use std::fmt;

/// Which stage of [`crate::ArticlePipeline::process_article`] gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidUrl,
    FallbackFailed,
    SummarizationFailed,
}

impl FailureReason {
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::InvalidUrl => "Invalid URL format",
            FailureReason::FallbackFailed => "Failed to extract or summarize article",
            FailureReason::SummarizationFailed => "Failed to generate summary",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The only failure `process_article` surfaces.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to process article: {reason}")]
pub struct ProcessingFailed {
    pub reason: FailureReason,
    /// Underlying cause, for logs and `--verbose` output.
    pub detail: String,
}

impl ProcessingFailed {
    pub fn new(reason: FailureReason, detail: impl fmt::Display) -> Self {
        Self {
            reason,
            detail: detail.to_string(),
        }
    }
}
