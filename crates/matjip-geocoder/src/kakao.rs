//! Kakao Local API provider
//!
//! Tuned for Korean addressing conventions (road-name and lot-number
//! addresses). Coordinates come back as strings in `y` (latitude) and `x`
//! (longitude).

use crate::config::{KakaoConfig, KakaoSearchKind};
use crate::error::ProviderError;
use crate::provider::{GeocodeCandidate, GeocodeProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default Kakao API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://dapi.kakao.com";

/// Kakao Local search provider
pub struct KakaoProvider {
    endpoint: String,
    api_key: String,
    search: KakaoSearchKind,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct KakaoResponse {
    documents: Vec<KakaoDocument>,
}

#[derive(Deserialize)]
struct KakaoDocument {
    x: String,
    y: String,
    #[serde(default)]
    address_name: Option<String>,
    #[serde(default)]
    place_name: Option<String>,
}

impl From<KakaoDocument> for GeocodeCandidate {
    fn from(doc: KakaoDocument) -> Self {
        GeocodeCandidate {
            latitude: doc.y,
            longitude: doc.x,
            label: doc.place_name.or(doc.address_name),
        }
    }
}

impl KakaoProvider {
    /// Create a provider from config
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Config` if the API key is empty or the HTTP
    /// client cannot be built.
    pub fn new(config: &KakaoConfig, timeout_secs: u64) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Config("Kakao API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            search: config.search,
            client,
        })
    }
}

#[async_trait]
impl GeocodeProvider for KakaoProvider {
    fn name(&self) -> &str {
        "kakao"
    }

    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        let url = format!("{}{}", self.endpoint, self.search.path());

        let response = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status(status.as_u16(), body));
        }

        let parsed: KakaoResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        debug!("Kakao returned {} documents", parsed.documents.len());
        Ok(parsed.documents.into_iter().map(Into::into).collect())
    }
}
