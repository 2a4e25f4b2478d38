//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, database path, the
//! completion backend, the geocoding chain and extractor limits. Secrets can
//! be supplied through the environment instead of the file.

use matjip_domain::PLACEHOLDER_USER_ID;
use matjip_extractor::ExtractorConfig;
use matjip_geocoder::GeocoderConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the Anthropic API key
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Environment variable holding the Kakao REST API key
pub const ENV_KAKAO_API_KEY: &str = "KAKAO_REST_API_KEY";

/// Environment variable holding the SQLite database path
pub const ENV_DATABASE: &str = "MATJIP_DATABASE";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A section failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Completion backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Anthropic messages API
    #[default]
    Anthropic,
    /// Local Ollama server
    Ollama,
}

/// Completion service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which backend to call
    pub backend: LlmBackend,

    /// Model identifier
    pub model: String,

    /// API key (Anthropic only)
    pub api_key: String,

    /// Override the backend's default endpoint
    pub endpoint: Option<String>,

    /// Transport timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Anthropic,
            model: matjip_llm::anthropic::DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            endpoint: None,
            request_timeout_secs: matjip_llm::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 3000)
    pub bind_port: u16,

    /// SQLite database path
    pub database_path: String,

    /// Owner recorded on every saved place until authentication exists
    pub default_user_id: String,

    /// Completion service
    pub llm: LlmConfig,

    /// Geocoding chain
    pub geocoder: GeocoderConfig,

    /// Caption extractor limits
    pub extractor: ExtractorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 3000,
            database_path: "matjip.db".to_string(),
            default_user_id: PLACEHOLDER_USER_ID.to_string(),
            llm: LlmConfig::default(),
            geocoder: GeocoderConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Overlay secrets and paths from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(ENV_ANTHROPIC_API_KEY) {
            self.llm.api_key = key;
        }
        if let Some(key) = lookup(ENV_KAKAO_API_KEY) {
            self.geocoder.kakao.api_key = key;
        }
        if let Some(path) = lookup(ENV_DATABASE) {
            self.database_path = path;
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Invalid("database_path is empty".to_string()));
        }
        if self.default_user_id.trim().is_empty() {
            return Err(ConfigError::Invalid("default_user_id is empty".to_string()));
        }
        if self.llm.backend == LlmBackend::Anthropic && self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "llm.api_key is required for the anthropic backend (or set {})",
                ENV_ANTHROPIC_API_KEY
            )));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "llm.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.geocoder
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("geocoder: {}", e)))?;
        self.extractor
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("extractor: {}", e)))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matjip_domain::Category;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.default_user_id, PLACEHOLDER_USER_ID);
        assert_eq!(config.llm.backend, LlmBackend::Anthropic);
        assert_eq!(config.extractor.max_tokens, 1024);
    }

    #[test]
    fn test_default_requires_anthropic_key() {
        let mut config = ServerConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.llm.api_key = "sk-test".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let mut config = ServerConfig::default();
        config.llm.backend = LlmBackend::Ollama;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 8080
            database_path = "/var/lib/matjip/places.db"

            [llm]
            backend = "ollama"
            model = "llama3.2"
            endpoint = "http://gpu-box:11434"

            [geocoder.kakao]
            api_key = "kakao-key"
            search = "keyword"

            [extractor]
            max_caption_length = 2000
            default_category = "korean"
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_path, "/var/lib/matjip/places.db");
        assert_eq!(config.llm.backend, LlmBackend::Ollama);
        assert_eq!(config.llm.endpoint.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.llm.request_timeout_secs, 30);
        assert_eq!(config.geocoder.kakao.api_key, "kakao-key");
        assert!(config.geocoder.nominatim.enabled);
        assert_eq!(config.extractor.max_caption_length, 2000);
        assert_eq!(config.extractor.max_tokens, 1024);
        assert_eq!(config.extractor.default_category, Category::Korean);
    }

    #[test]
    fn test_nested_sections_keep_defaults() {
        let toml = r#"
            [geocoder]
            request_timeout_secs = 5

            [geocoder.nominatim]
            enabled = false
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.geocoder.request_timeout_secs, 5);
        assert!(!config.geocoder.nominatim.enabled);
        assert_eq!(config.geocoder.kakao.endpoint, matjip_geocoder::kakao::DEFAULT_ENDPOINT);
        assert_eq!(config.extractor, ExtractorConfig::default());
    }

    #[test]
    fn test_unknown_default_category_rejected() {
        let toml = r#"
            [extractor]
            default_category = "steakhouse"
        "#;
        assert!(matches!(
            ServerConfig::from_toml(toml),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ServerConfig::from_toml("bind_port = \"not a number\""),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_ANTHROPIC_API_KEY, "sk-env"),
            (ENV_KAKAO_API_KEY, "kakao-env"),
            (ENV_DATABASE, " "),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key, "sk-env");
        assert_eq!(config.geocoder.kakao.api_key, "kakao-env");
        assert_eq!(config.database_path, "matjip.db");
    }
}
