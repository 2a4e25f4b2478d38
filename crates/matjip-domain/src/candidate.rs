//! Place candidate - the structured output of caption extraction

use crate::Category;
use serde::{Deserialize, Serialize};

/// A restaurant pulled out of a caption
///
/// Transient: produced fresh per request and never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Restaurant name as written in the caption
    pub name: String,

    /// Free-text address as written in the caption
    pub address: String,

    /// Category, always a member of the fixed enumeration
    pub category: Category,
}

impl PlaceCandidate {
    /// Create a new candidate
    pub fn new(name: impl Into<String>, address: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            category,
        }
    }

    /// Whether the candidate carries an address worth geocoding
    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }
}
