//! Deterministic provider for tests

use crate::error::ProviderError;
use crate::provider::{GeocodeCandidate, GeocodeProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Mock geocoding provider
///
/// Returns the same canned result for every query without touching the
/// network. Clones share the call counter and query log, so a test can hand
/// one clone to the resolver and assert on the other.
#[derive(Debug, Clone)]
pub struct MockGeocodeProvider {
    name: String,
    candidates: Vec<GeocodeCandidate>,
    fail: bool,
    call_count: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockGeocodeProvider {
    /// A provider that answers every query with `candidates`
    pub fn returning(name: impl Into<String>, candidates: Vec<GeocodeCandidate>) -> Self {
        Self {
            name: name.into(),
            candidates,
            fail: false,
            call_count: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that never finds anything
    pub fn empty(name: impl Into<String>) -> Self {
        Self::returning(name, Vec::new())
    }

    /// A provider whose every call fails, as an outage would
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            fail: true,
            ..Self::empty(name)
        }
    }

    /// Number of searches issued against this provider
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every query received, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GeocodeProvider for MockGeocodeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());

        if self.fail {
            return Err(ProviderError::Transport(format!(
                "{}: connection refused",
                self.name
            )));
        }
        Ok(self.candidates.clone())
    }
}
