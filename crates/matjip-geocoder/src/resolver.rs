//! The ordered fallback chain

use crate::config::GeocoderConfig;
use crate::error::{GeocodeError, ProviderError};
use crate::kakao::KakaoProvider;
use crate::nominatim::NominatimProvider;
use crate::provider::GeocodeProvider;
use matjip_domain::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Request to geocode an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeQuery {
    /// Free-text address
    #[serde(default)]
    pub address: String,
}

/// Resolves addresses by trying each provider in priority order
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct GeocodeResolver {
    providers: Vec<Box<dyn GeocodeProvider>>,
}

impl GeocodeResolver {
    /// Create a resolver from providers in priority order
    pub fn new(providers: Vec<Box<dyn GeocodeProvider>>) -> Self {
        Self { providers }
    }

    /// Build the Kakao → Nominatim chain from config
    ///
    /// Kakao is left out when no API key is configured; Nominatim is left out
    /// when disabled.
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, ProviderError> {
        let mut providers: Vec<Box<dyn GeocodeProvider>> = Vec::new();

        if config.kakao.api_key.trim().is_empty() {
            warn!("No Kakao API key configured, primary geocoder disabled");
        } else {
            providers.push(Box::new(KakaoProvider::new(
                &config.kakao,
                config.request_timeout_secs,
            )?));
        }

        if config.nominatim.enabled {
            providers.push(Box::new(NominatimProvider::new(
                &config.nominatim,
                config.request_timeout_secs,
            )?));
        }

        if providers.is_empty() {
            return Err(ProviderError::Config(
                "no geocoding provider configured".to_string(),
            ));
        }

        Ok(Self::new(providers))
    }

    /// Names of the providers, in the order they are tried
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve a geocode query
    pub async fn resolve_query(&self, query: &GeocodeQuery) -> Result<Coordinate, GeocodeError> {
        self.resolve(&query.address).await
    }

    /// Resolve an address to a coordinate
    ///
    /// Providers are queried one at a time. The first candidate of the first
    /// provider that returns any candidates is used if it parses to a valid
    /// coordinate; otherwise the chain moves on. Provider errors are logged
    /// and treated as an empty result.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when the address is empty, before any provider call
    /// - `NotFound` when no provider produced a usable coordinate
    pub async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::InvalidInput);
        }

        for provider in &self.providers {
            let candidates = match provider.search(query).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(provider = provider.name(), "Geocoding provider failed: {}", e);
                    continue;
                }
            };

            let Some(first) = candidates.first() else {
                debug!(provider = provider.name(), "No candidates for '{}'", query);
                continue;
            };

            match Coordinate::parse(&first.latitude, &first.longitude) {
                Ok(coordinate) => {
                    info!(
                        provider = provider.name(),
                        "Resolved '{}' to {}{}",
                        query,
                        coordinate,
                        first
                            .label
                            .as_deref()
                            .map(|l| format!(" ({})", l))
                            .unwrap_or_default()
                    );
                    return Ok(coordinate);
                }
                Err(e) => {
                    warn!(provider = provider.name(), "Unusable candidate: {}", e);
                }
            }
        }

        info!("No provider could resolve '{}'", query);
        Err(GeocodeError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeocodeCandidate, MockGeocodeProvider};

    fn chain(primary: &MockGeocodeProvider, secondary: &MockGeocodeProvider) -> GeocodeResolver {
        GeocodeResolver::new(vec![Box::new(primary.clone()), Box::new(secondary.clone())])
    }

    #[tokio::test]
    async fn test_empty_address_is_invalid_input() {
        let primary = MockGeocodeProvider::empty("kakao");
        let secondary = MockGeocodeProvider::empty("nominatim");
        let resolver = chain(&primary, &secondary);

        assert_eq!(resolver.resolve("").await, Err(GeocodeError::InvalidInput));
        assert_eq!(resolver.resolve("   ").await, Err(GeocodeError::InvalidInput));
        assert_eq!(primary.call_count(), 0);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_primary_candidate_falls_through() {
        let primary = MockGeocodeProvider::returning("kakao", vec![GeocodeCandidate::new("", "")]);
        let secondary =
            MockGeocodeProvider::returning("nominatim", vec![GeocodeCandidate::new("1.5", "2.5")]);
        let resolver = chain(&primary, &secondary);

        let coordinate = resolver.resolve("addr").await.unwrap();
        assert_eq!(coordinate, Coordinate { lat: 1.5, lng: 2.5 });
        assert_eq!(secondary.call_count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_candidate_is_not_returned() {
        let primary = MockGeocodeProvider::returning("kakao", vec![GeocodeCandidate::new("127.0", "37.5")]);
        let secondary = MockGeocodeProvider::empty("nominatim");
        let resolver = chain(&primary, &secondary);

        assert_eq!(resolver.resolve("swapped").await, Err(GeocodeError::NotFound));
    }

    #[tokio::test]
    async fn test_query_is_trimmed() {
        let primary = MockGeocodeProvider::returning("kakao", vec![GeocodeCandidate::new("37.5", "127.0")]);
        let secondary = MockGeocodeProvider::empty("nominatim");
        let resolver = chain(&primary, &secondary);

        resolver.resolve("  서울 중구  ").await.unwrap();
        assert_eq!(primary.queries(), vec!["서울 중구"]);
    }

    #[tokio::test]
    async fn test_resolve_query_delegates() {
        let primary = MockGeocodeProvider::returning("kakao", vec![GeocodeCandidate::new("37.5", "127.0")]);
        let resolver = GeocodeResolver::new(vec![Box::new(primary)]);

        let query = GeocodeQuery { address: "서울".to_string() };
        assert!(resolver.resolve_query(&query).await.is_ok());
    }

    #[test]
    fn test_from_config_without_kakao_key() {
        let resolver = GeocodeResolver::from_config(&GeocoderConfig::default()).unwrap();
        assert_eq!(resolver.provider_names(), vec!["nominatim"]);
    }

    #[test]
    fn test_from_config_full_chain_order() {
        let mut config = GeocoderConfig::default();
        config.kakao.api_key = "key".to_string();

        let resolver = GeocodeResolver::from_config(&config).unwrap();
        assert_eq!(resolver.provider_names(), vec!["kakao", "nominatim"]);
    }

    #[test]
    fn test_from_config_with_nothing_enabled() {
        let mut config = GeocoderConfig::default();
        config.nominatim.enabled = false;

        assert!(matches!(
            GeocodeResolver::from_config(&config),
            Err(ProviderError::Config(_))
        ));
    }
}
