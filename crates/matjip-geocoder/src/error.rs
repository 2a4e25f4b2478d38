//! Error types for the Geocoder

use thiserror::Error;

/// Errors surfaced by the resolver to its callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// Address was empty or whitespace-only
    #[error("invalid input")]
    InvalidInput,

    /// Every provider in the chain came back without a usable candidate
    #[error("not found")]
    NotFound,
}

/// Errors from a single provider call
///
/// These never cross the resolver boundary: the resolver logs them and moves
/// on to the next provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status
    #[error("HTTP {0}: {1}")]
    Status(u16, String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Provider misconfigured (missing key, HTTP client setup)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}
