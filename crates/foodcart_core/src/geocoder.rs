//! Address geocoding behind a swappable trait.
//!
//! Implementations:
//!
//! - **`YandexGeocoder`** (feature `yandex`): blocking HTTP client for the Yandex geocoder API.
//! - **`StaticGeocoder`**: lookup table loaded from memory or a JSON file, for offline runs.
//! - **`NullGeocoder`**: resolves nothing; used when no API key is configured.
//!
//! Every implementation fails soft: an address that cannot be resolved for any
//! reason yields `None`, which callers treat as a normal outcome.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FoodcartError, FoodcartResult};
use crate::geo::Coordinates;
use crate::models::normalize_address;

#[cfg(feature = "yandex")]
mod client;
mod error;
mod parser;
mod response;

#[cfg(feature = "yandex")]
pub use client::YandexGeocoder;
pub use error::GeocodeError;
pub use parser::{parse_geocoder_body, parse_position};

/// Public Yandex geocoder endpoint.
pub const DEFAULT_YANDEX_ENDPOINT: &str = "https://geocode-maps.yandex.ru/1.x";

/// Address-to-coordinate lookup.
///
/// One call issues at most one outbound request and never retries. `None`
/// means the address is unresolved; it is not an error.
pub trait Geocoder {
    fn resolve(&self, address: &str) -> Option<Coordinates>;
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        (**self).resolve(address)
    }
}

/// Geocoder that never resolves anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGeocoder;

impl Geocoder for NullGeocoder {
    fn resolve(&self, _address: &str) -> Option<Coordinates> {
        None
    }
}

/// Table-backed geocoder keyed by normalized address.
#[derive(Debug, Default, Clone)]
pub struct StaticGeocoder {
    table: HashMap<String, Coordinates>,
}

impl StaticGeocoder {
    pub fn from_table<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinates)>,
        S: AsRef<str>,
    {
        let table = entries
            .into_iter()
            .map(|(address, coordinates)| (normalize_address(address.as_ref()), coordinates))
            .collect();
        Self { table }
    }

    /// Load a JSON object of `{"address": {"lat": .., "lon": ..}}` entries.
    pub fn from_file(path: impl AsRef<Path>) -> FoodcartResult<Self> {
        let data = fs::read_to_string(path)?;
        let raw: HashMap<String, Coordinates> = serde_json::from_str(&data)?;
        Ok(Self::from_table(raw))
    }

    pub fn insert(&mut self, address: &str, coordinates: Coordinates) {
        self.table.insert(normalize_address(address), coordinates);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Geocoder for StaticGeocoder {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        self.table.get(&normalize_address(address)).copied()
    }
}

/// Which geocoder backend to build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeocoderKind {
    #[default]
    Null,
    Static {
        path: String,
    },
    Yandex {
        api_key: String,
        #[serde(default = "default_endpoint")]
        endpoint: String,
        /// Request timeout; the HTTP client's default applies when unset.
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

fn default_endpoint() -> String {
    DEFAULT_YANDEX_ENDPOINT.to_string()
}

/// Construct a boxed [`Geocoder`] from a [`GeocoderKind`] descriptor.
pub fn build_geocoder(kind: &GeocoderKind) -> FoodcartResult<Box<dyn Geocoder>> {
    match kind {
        GeocoderKind::Null => Ok(Box::new(NullGeocoder)),
        GeocoderKind::Static { path } => Ok(Box::new(StaticGeocoder::from_file(path)?)),
        #[cfg(feature = "yandex")]
        GeocoderKind::Yandex {
            api_key,
            endpoint,
            timeout_secs,
        } => {
            let timeout = timeout_secs.map(std::time::Duration::from_secs);
            let geocoder = YandexGeocoder::new(api_key, endpoint, timeout)
                .map_err(|err| FoodcartError::Config(err.to_string()))?;
            Ok(Box::new(geocoder))
        }
        #[cfg(not(feature = "yandex"))]
        GeocoderKind::Yandex { .. } => Err(FoodcartError::Config(
            "the Yandex geocoder needs the `yandex` feature".to_string(),
        )),
    }
}
