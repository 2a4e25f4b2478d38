//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the core and infrastructure.
//! Implementations live in other crates.

use crate::{NewPlace, Place, PlaceId};
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;

/// Trait for language-model completion services
///
/// Implemented by the infrastructure layer (matjip-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for completion calls
    type Error: Display + Send;

    /// Send a single user-role prompt and return the full text output
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error>;

    /// Name of the model behind this provider, for logging
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: LlmProvider + ?Sized> LlmProvider for Box<T> {
    type Error = T::Error;

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error> {
        (**self).generate(prompt, max_tokens).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: LlmProvider + ?Sized> LlmProvider for Arc<T> {
    type Error = T::Error;

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error> {
        (**self).generate(prompt, max_tokens).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Trait for storing and retrieving places
///
/// Implemented by the infrastructure layer (matjip-store)
pub trait PlaceStore {
    /// Error type for store operations
    type Error;

    /// Insert a new place, returning it with its assigned id and timestamp
    fn insert(&mut self, place: NewPlace) -> Result<Place, Self::Error>;

    /// Get a place by ID
    fn get(&self, id: PlaceId) -> Result<Option<Place>, Self::Error>;

    /// List every place, newest first
    fn list(&self) -> Result<Vec<Place>, Self::Error>;

    /// Delete a place by ID
    fn delete(&mut self, id: PlaceId) -> Result<(), Self::Error>;
}
