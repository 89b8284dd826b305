//! Order-to-restaurant assignment for the food cart backend.
//!
//! - [`geocoder`]: address-to-coordinate lookup behind the [`geocoder::Geocoder`] trait
//! - [`store`]: location store and entity persistence seams, plus an in-memory backend
//! - [`resolution`]: per-run coordinate resolution with address-keyed caching and batched writes
//! - [`menu`]: product availability index
//! - [`assignment`]: restaurant suitability and distance ranking per order
//! - [`dashboard`]: the manager views assembled from the pieces above

pub mod assignment;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geo;
pub mod geocoder;
pub mod intake;
pub mod menu;
pub mod models;
pub mod resolution;
pub mod store;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use error::{FoodcartError, FoodcartResult};
pub use geo::Coordinates;
