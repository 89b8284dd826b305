//! Error types shared across the crate.
//!
//! Geocoding failures never leave the geocoder as errors (they degrade to an
//! unresolved address), so [`GeocodeError`](crate::geocoder::GeocodeError) lives
//! next to the client instead of here.

use thiserror::Error;

use crate::models::{LocationId, OrderId, ProductId, RestaurantId};

/// Failures reported by a [`LocationStore`](crate::store::LocationStore) or
/// [`OrderStore`](crate::store::OrderStore) backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("a location for address {0:?} already exists")]
    DuplicateAddress(String),

    #[error("location {0} not found")]
    LocationNotFound(LocationId),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("restaurant {0} not found")]
    RestaurantNotFound(RestaurantId),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),
}

/// Top-level error for configuration, snapshot I/O and store access.
#[derive(Debug, Error)]
pub enum FoodcartError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FoodcartResult<T> = Result<T, FoodcartError>;
