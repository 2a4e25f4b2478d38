//! Coordinate module - validated latitude/longitude pairs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate
///
/// Construction validates both components, so a `Coordinate` in hand is
/// always finite with `lat` in [-90, 90] and `lng` in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    ///
    /// # Examples
    ///
    /// ```
    /// use matjip_domain::Coordinate;
    ///
    /// let seoul = Coordinate::new(37.5665, 126.9780).unwrap();
    /// assert_eq!(seoul.lat, 37.5665);
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude {} out of range [-90, 90]", lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("longitude {} out of range [-180, 180]", lng));
        }
        Ok(Self { lat, lng })
    }

    /// Parse a coordinate from the string fields geocoding providers return
    ///
    /// # Examples
    ///
    /// ```
    /// use matjip_domain::Coordinate;
    ///
    /// let c = Coordinate::parse("37.5", "127.0").unwrap();
    /// assert_eq!((c.lat, c.lng), (37.5, 127.0));
    /// assert!(Coordinate::parse("", "127.0").is_err());
    /// ```
    pub fn parse(lat: &str, lng: &str) -> Result<Self, String> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("Invalid latitude '{}': {}", lat, e))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("Invalid longitude '{}': {}", lng, e))?;
        Self::new(lat, lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}
