//! Place module - the persisted restaurant record

use crate::{Category, Coordinate, PlaceCandidate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner of every record until authentication exists
pub const PLACEHOLDER_USER_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Unique identifier for a place based on UUIDv7
///
/// UUIDv7 sorts chronologically, so ids double as a tie-breaker when two
/// places share a creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PlaceId(u128);

impl PlaceId {
    /// Generate a new UUIDv7-based PlaceId
    ///
    /// # Examples
    ///
    /// ```
    /// use matjip_domain::PlaceId;
    ///
    /// let id = PlaceId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a PlaceId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a PlaceId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use matjip_domain::PlaceId;
    ///
    /// let id = PlaceId::new();
    /// let parsed = PlaceId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid place id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for PlaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PlaceId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_string(&s)
    }
}

/// A stored restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier, assigned by the store
    pub id: PlaceId,

    /// Restaurant name
    pub name: String,

    /// Free-text address
    pub address: String,

    /// Category, if one was supplied
    pub category: Option<Category>,

    /// Who shared the caption (account handle, friend, ...)
    pub shared_from: Option<String>,

    /// User note
    pub memo: Option<String>,

    /// Link to the source post
    pub instagram_url: Option<String>,

    /// Latitude, when geocoding succeeded
    pub latitude: Option<f64>,

    /// Longitude, when geocoding succeeded
    pub longitude: Option<f64>,

    /// Owner of the record
    pub user_id: String,

    /// Creation time (Unix milliseconds), assigned by the store
    pub created_at: u64,
}

impl Place {
    /// The stored coordinate, if both components are present
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).ok(),
            _ => None,
        }
    }
}

/// A place that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    /// Restaurant name
    pub name: String,
    /// Free-text address
    pub address: String,
    /// Optional category
    pub category: Option<Category>,
    /// Optional source account
    pub shared_from: Option<String>,
    /// Optional note
    pub memo: Option<String>,
    /// Optional link to the source post
    pub instagram_url: Option<String>,
    /// Optional geocoded position
    pub coordinate: Option<Coordinate>,
    /// Owner of the record
    pub user_id: String,
}

impl NewPlace {
    /// Create a new place owned by the placeholder identity
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            category: None,
            shared_from: None,
            memo: None,
            instagram_url: None,
            coordinate: None,
            user_id: PLACEHOLDER_USER_ID.to_string(),
        }
    }

    /// Build from an extracted candidate and an optional geocoding result
    pub fn from_candidate(candidate: PlaceCandidate, coordinate: Option<Coordinate>) -> Self {
        Self {
            category: Some(candidate.category),
            coordinate,
            ..Self::new(candidate.name, candidate.address)
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the coordinate
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Set the owner
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        if self.address.trim().is_empty() {
            return Err("address is empty".to_string());
        }
        if self.user_id.is_empty() {
            return Err("user_id is empty".to_string());
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Round-trip through string representation preserves ID
        #[test]
        fn test_place_id_string_roundtrip(value: u128) {
            let id = PlaceId::from_value(value);
            match PlaceId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
