//! Matjip Domain Layer
//!
//! Value types and collaborator interfaces shared by every other crate.
//! Infrastructure (HTTP clients, SQLite, axum) lives elsewhere; this crate
//! only knows what a place looks like and which capabilities the core needs.
//!
//! ## Key Concepts
//!
//! - **PlaceCandidate**: what the caption extractor pulls out of free text
//! - **Category**: the fixed set of restaurant categories a candidate may carry
//! - **Coordinate**: a validated latitude/longitude pair
//! - **Place**: the persisted record combining extracted and geocoded data

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod category;
pub mod coordinate;
pub mod place;
pub mod traits;

// Re-exports for convenience
pub use candidate::PlaceCandidate;
pub use category::Category;
pub use coordinate::Coordinate;
pub use place::{NewPlace, Place, PlaceId, PLACEHOLDER_USER_ID};
