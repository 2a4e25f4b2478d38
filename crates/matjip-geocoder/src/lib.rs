//! Matjip Geocoder
//!
//! Resolves a free-text address into a [`Coordinate`](matjip_domain::Coordinate)
//! through an ordered chain of geocoding providers.
//!
//! # Architecture
//!
//! ```text
//! address → KakaoProvider (primary, Korea) ──empty/error──► NominatimProvider (secondary, global)
//!                 │                                               │
//!                 └──────── first usable candidate ◄──────────────┘
//! ```
//!
//! Providers are queried strictly in order and never concurrently. The first
//! provider that yields a parseable coordinate wins; provider failures are
//! logged and treated as "no candidate" so that a single outage never fails
//! the whole resolution. Only the final "not found" outcome is reported.
//!
//! # Example Usage
//!
//! ```
//! use matjip_geocoder::{GeocodeCandidate, GeocodeResolver, MockGeocodeProvider};
//!
//! # tokio_test::block_on(async {
//! let primary = MockGeocodeProvider::empty("kakao");
//! let secondary = MockGeocodeProvider::returning("nominatim", vec![GeocodeCandidate::new("40.7", "-74.0")]);
//!
//! let resolver = GeocodeResolver::new(vec![Box::new(primary), Box::new(secondary)]);
//! let coordinate = resolver.resolve("350 5th Ave, New York").await.unwrap();
//! assert_eq!((coordinate.lat, coordinate.lng), (40.7, -74.0));
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
mod error;
pub mod kakao;
mod mock;
pub mod nominatim;
mod provider;
mod resolver;

pub use config::{GeocoderConfig, KakaoConfig, KakaoSearchKind, NominatimConfig};
pub use error::{GeocodeError, ProviderError};
pub use kakao::KakaoProvider;
pub use mock::MockGeocodeProvider;
pub use nominatim::NominatimProvider;
pub use provider::{GeocodeCandidate, GeocodeProvider};
pub use resolver::{GeocodeQuery, GeocodeResolver};
