//! Matjip Server
//!
//! HTTP surface for caption extraction, geocoding and place storage.
//! Wires the extractor, the geocoding chain and the SQLite store into an
//! axum router.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::{LlmBackend, ServerConfig};
use handlers::{create_router, AppState};
use matjip_domain::traits::LlmProvider;
use matjip_extractor::CaptionExtractor;
use matjip_geocoder::GeocodeResolver;
use matjip_llm::{AnthropicProvider, DynLlmProvider, LlmError, OllamaProvider};
use matjip_store::SqliteStore;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Completion provider could not be built
    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),

    /// Geocoding chain could not be built
    #[error("Geocoder error: {0}")]
    Geocoder(#[from] matjip_geocoder::ProviderError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] matjip_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the completion provider selected in config
pub fn build_llm_provider(config: &config::LlmConfig) -> Result<DynLlmProvider, LlmError> {
    let provider: DynLlmProvider = match config.backend {
        LlmBackend::Anthropic => Box::new(AnthropicProvider::with_endpoint(
            config
                .endpoint
                .as_deref()
                .unwrap_or(matjip_llm::anthropic::DEFAULT_ENDPOINT),
            config.api_key.as_str(),
            config.model.as_str(),
            config.request_timeout_secs,
        )?),
        LlmBackend::Ollama => Box::new(OllamaProvider::with_timeout(
            config
                .endpoint
                .as_deref()
                .unwrap_or(matjip_llm::ollama::DEFAULT_ENDPOINT),
            config.model.as_str(),
            config.request_timeout_secs,
        )?),
    };
    Ok(provider)
}

/// Build application state from configuration
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    config.validate()?;

    let llm = build_llm_provider(&config.llm)?;
    info!("LLM backend: {:?} ({})", config.llm.backend, llm.model_name());
    let extractor = CaptionExtractor::new(llm, config.extractor.clone());

    let resolver = GeocodeResolver::from_config(&config.geocoder)?;
    info!("Geocoding chain: {}", resolver.provider_names().join(" -> "));

    let store = SqliteStore::new(&config.database_path)?;
    info!("Database: {}", config.database_path);

    Ok(AppState {
        extractor: Arc::new(extractor),
        resolver: Arc::new(resolver),
        store: Arc::new(Mutex::new(store)),
        default_user_id: Arc::from(config.default_user_id.as_str()),
    })
}

/// Start the HTTP server
///
/// Builds the application state from config and serves until the process
/// is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Matjip server");

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
