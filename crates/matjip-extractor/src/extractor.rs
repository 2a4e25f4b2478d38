//! Core CaptionExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_candidate;
use crate::prompt::PromptBuilder;
use matjip_domain::traits::LlmProvider;
use matjip_domain::PlaceCandidate;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Request to extract a place from a caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionExtractionRequest {
    /// Free-form caption text
    #[serde(default)]
    pub caption: String,
}

/// The CaptionExtractor converts a caption into a place candidate
///
/// Stateless between calls: each `extract` builds its own prompt and makes a
/// single completion request.
pub struct CaptionExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> CaptionExtractor<L>
where
    L: LlmProvider,
{
    /// Create a new CaptionExtractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Name of the model behind the completion provider
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Extract a place candidate from a caption request
    pub async fn extract_request(
        &self,
        request: &CaptionExtractionRequest,
    ) -> Result<PlaceCandidate, ExtractorError> {
        self.extract(&request.caption).await
    }

    /// Extract a place candidate from caption text
    ///
    /// # Errors
    ///
    /// - `EmptyCaption` / `CaptionTooLong` before any network call
    /// - `Llm` when the completion service fails
    /// - `UnparseableResponse` when no JSON object can be parsed from the output
    pub async fn extract(&self, caption: &str) -> Result<PlaceCandidate, ExtractorError> {
        if caption.trim().is_empty() {
            return Err(ExtractorError::EmptyCaption);
        }

        let length = caption.chars().count();
        if length > self.config.max_caption_length {
            return Err(ExtractorError::CaptionTooLong(
                length,
                self.config.max_caption_length,
            ));
        }

        info!(
            "Extracting place from caption ({} chars) with model '{}'",
            length,
            self.llm_provider.model_name()
        );

        let prompt = PromptBuilder::new(caption).build();
        debug!("Prompt length: {} chars", prompt.len());

        let started = Instant::now();
        let response = self
            .llm_provider
            .generate(&prompt, self.config.max_tokens)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!(
            "LLM response length: {} chars in {} ms",
            response.len(),
            started.elapsed().as_millis()
        );

        let candidate = parse_candidate(&response, self.config.default_category).map_err(|e| {
            warn!("Could not parse model output: {}", e);
            debug!("Raw model output: {}", response);
            e
        })?;

        info!(
            "Extracted '{}' ({}) at '{}'",
            candidate.name, candidate.category, candidate.address
        );

        Ok(candidate)
    }
}
