//! OpenStreetMap Nominatim provider
//!
//! Global coverage fallback. The usage policy requires every request to carry
//! a `User-Agent` that identifies the application.

use crate::config::NominatimConfig;
use crate::error::ProviderError;
use crate::provider::{GeocodeCandidate, GeocodeProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default Nominatim endpoint
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Default `User-Agent`
pub const DEFAULT_USER_AGENT: &str = concat!("matjip/", env!("CARGO_PKG_VERSION"));

/// Nominatim search provider
pub struct NominatimProvider {
    endpoint: String,
    user_agent: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl From<NominatimPlace> for GeocodeCandidate {
    fn from(place: NominatimPlace) -> Self {
        GeocodeCandidate {
            latitude: place.lat,
            longitude: place.lon,
            label: place.display_name,
        }
    }
}

impl NominatimProvider {
    /// Create a provider from config
    pub fn new(config: &NominatimConfig, timeout_secs: u64) -> Result<Self, ProviderError> {
        if config.user_agent.trim().is_empty() {
            return Err(ProviderError::Config(
                "Nominatim requires a User-Agent".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            client,
        })
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        let url = format!("{}/search", self.endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status(status.as_u16(), body));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        debug!("Nominatim returned {} places", places.len());
        Ok(places.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider_for(server: &MockServer) -> NominatimProvider {
        let config = NominatimConfig {
            enabled: true,
            endpoint: server.base_url(),
            user_agent: "matjip-test/1.0".to_string(),
        };
        NominatimProvider::new(&config, 5).unwrap()
    }

    #[test]
    fn test_requires_user_agent() {
        let config = NominatimConfig {
            user_agent: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            NominatimProvider::new(&config, 5),
            Err(ProviderError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_search_maps_lat_lon() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "350 5th Ave, New York")
                .query_param("format", "json")
                .query_param("limit", "1")
                .header("user-agent", "matjip-test/1.0");
            then.status(200).json_body(json!([
                {"lat": "40.7484", "lon": "-73.9857", "display_name": "Empire State Building"}
            ]));
        });

        let candidates = provider_for(&server)
            .search("350 5th Ave, New York")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(candidates, vec![
            GeocodeCandidate::new("40.7484", "-73.9857").with_label("Empire State Building")
        ]);
    }

    #[tokio::test]
    async fn test_empty_result() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!([]));
        });

        let candidates = provider_for(&server).search("nowhere").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_is_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(429);
        });

        let result = provider_for(&server).search("q").await;
        assert!(matches!(result, Err(ProviderError::Status(429, _))));
    }
}
