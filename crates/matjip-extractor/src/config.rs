//! Configuration for the Extractor

use matjip_domain::Category;
use serde::{Deserialize, Serialize};

/// Configuration for the caption extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum caption length (characters)
    pub max_caption_length: usize,

    /// Token budget handed to the completion service
    pub max_tokens: u32,

    /// Category used when the model omits one or strays outside the enumeration
    pub default_category: Category,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_caption_length: 10_000,
            max_tokens: 1024,
            default_category: Category::Other,
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_caption_length == 0 {
            return Err("max_caption_length must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}
