//! Configuration for the geocoding chain

use serde::{Deserialize, Serialize};

/// Which Kakao Local search endpoint to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KakaoSearchKind {
    /// `/v2/local/search/address.json`: street and lot-number addresses
    #[default]
    Address,
    /// `/v2/local/search/keyword.json`: place names and landmarks
    Keyword,
}

impl KakaoSearchKind {
    /// API path for this search kind
    pub fn path(&self) -> &'static str {
        match self {
            KakaoSearchKind::Address => "/v2/local/search/address.json",
            KakaoSearchKind::Keyword => "/v2/local/search/keyword.json",
        }
    }
}

/// Primary provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KakaoConfig {
    /// REST API key, sent as `Authorization: KakaoAK <key>`
    ///
    /// When empty the primary provider is left out of the chain.
    pub api_key: String,

    /// API base URL
    pub endpoint: String,

    /// Search endpoint
    pub search: KakaoSearchKind,
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: crate::kakao::DEFAULT_ENDPOINT.to_string(),
            search: KakaoSearchKind::Address,
        }
    }
}

/// Secondary provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    /// Include Nominatim in the chain
    pub enabled: bool,

    /// API base URL
    pub endpoint: String,

    /// `User-Agent` identifying this application, required by the usage policy
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: crate::nominatim::DEFAULT_ENDPOINT.to_string(),
            user_agent: crate::nominatim::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Geocoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Transport timeout for each provider request (seconds)
    pub request_timeout_secs: u64,

    /// Primary provider
    pub kakao: KakaoConfig,

    /// Secondary provider
    pub nominatim: NominatimConfig,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            kakao: KakaoConfig::default(),
            nominatim: NominatimConfig::default(),
        }
    }
}

impl GeocoderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.nominatim.enabled && self.nominatim.user_agent.trim().is_empty() {
            return Err("nominatim.user_agent is required when nominatim is enabled".to_string());
        }
        if self.kakao.api_key.trim().is_empty() && !self.nominatim.enabled {
            return Err("no geocoding provider configured".to_string());
        }
        Ok(())
    }
}
