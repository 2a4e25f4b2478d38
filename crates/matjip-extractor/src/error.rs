//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during caption extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Caption was empty or whitespace-only
    #[error("Caption is empty")]
    EmptyCaption,

    /// Caption exceeds the configured maximum length
    #[error("Caption too long: {0} chars (max: {1})")]
    CaptionTooLong(usize, usize),

    /// Completion service unreachable or returned an error
    #[error("LLM error: {0}")]
    Llm(String),

    /// No parseable JSON object in the model output
    #[error("Unparseable response: {0}")]
    UnparseableResponse(String),
}

impl ExtractorError {
    /// Whether the error was caused by the caller's input rather than a dependency
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExtractorError::EmptyCaption | ExtractorError::CaptionTooLong(_, _)
        )
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::UnparseableResponse(e.to_string())
    }
}
