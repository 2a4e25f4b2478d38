//! The geocoding provider capability

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One location match returned by a provider
///
/// Providers name and order their coordinate fields differently (`y`/`x`,
/// `lat`/`lon`); each implementation maps them into this shape. Values stay
/// strings until the resolver parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    /// Latitude as returned by the provider
    pub latitude: String,

    /// Longitude as returned by the provider
    pub longitude: String,

    /// Human-readable label for logging, if the provider supplies one
    pub label: Option<String>,
}

impl GeocodeCandidate {
    /// Create a candidate without a label
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            label: None,
        }
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A geocoding backend that can search for an address
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Short provider name, for logs and health output
    fn name(&self) -> &str;

    /// Search for the query text, returning candidates in provider rank order
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError>;
}
