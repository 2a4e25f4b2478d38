//! Matjip Extractor
//!
//! Turns a free-form social-media caption into a structured
//! [`PlaceCandidate`](matjip_domain::PlaceCandidate) using a language model.
//!
//! # Architecture
//!
//! ```text
//! Caption → PromptBuilder → LlmProvider → raw text → JSON scanner → PlaceCandidate
//! ```
//!
//! The model is asked for a single JSON object but is not trusted to comply:
//! the first balanced `{...}` span is located with a bracket-depth scanner
//! that tolerates commentary before or after it. Missing fields fall back to
//! deterministic defaults and the category is always coerced into the fixed
//! enumeration.
//!
//! # Example Usage
//!
//! ```no_run
//! use matjip_extractor::{CaptionExtractor, ExtractorConfig};
//! use matjip_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"name": "도미노피자", "address": "서울 마포구 양화로 160", "category": "fast_food"}"#);
//! let extractor = CaptionExtractor::new(llm, ExtractorConfig::default());
//!
//! let candidate = extractor.extract("홍대 맛집 🍕 도미노피자 서울 마포구 양화로 160").await?;
//! println!("{} @ {}", candidate.name, candidate.address);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::{CaptionExtractionRequest, CaptionExtractor};
pub use parser::{find_json_object, parse_candidate};
pub use prompt::PromptBuilder;
