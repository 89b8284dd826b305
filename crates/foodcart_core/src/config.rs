//! Runtime configuration.
//!
//! Built from environment variables, or from a JSON file of the same shape:
//!
//! ```json
//! { "geocoder": { "kind": "yandex", "api_key": "…", "timeout_secs": 5 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FoodcartError, FoodcartResult};
use crate::geocoder::{GeocoderKind, DEFAULT_YANDEX_ENDPOINT};

pub const ENV_API_KEY: &str = "YANDEX_GEOCODER_API_KEY";
pub const ENV_ENDPOINT: &str = "GEOCODER_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "GEOCODER_TIMEOUT_SECS";
pub const ENV_STATIC_TABLE: &str = "GEOCODER_STATIC_TABLE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub geocoder: GeocoderKind,
}

impl AppConfig {
    pub fn from_env() -> FoodcartResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    ///
    /// A static table takes precedence over an API key. With neither, the
    /// null geocoder is used and every new address stays unresolved.
    pub fn from_lookup<F>(lookup: F) -> FoodcartResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = non_empty(ENV_STATIC_TABLE) {
            return Ok(Self {
                geocoder: GeocoderKind::Static { path },
            });
        }

        let Some(api_key) = non_empty(ENV_API_KEY) else {
            warn!("{ENV_API_KEY} is not set; new addresses will not be geocoded");
            return Ok(Self::default());
        };

        let timeout_secs = non_empty(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|err| {
                    FoodcartError::Config(format!("{ENV_TIMEOUT_SECS}={raw:?}: {err}"))
                })
            })
            .transpose()?;

        Ok(Self {
            geocoder: GeocoderKind::Yandex {
                api_key,
                endpoint: non_empty(ENV_ENDPOINT)
                    .unwrap_or_else(|| DEFAULT_YANDEX_ENDPOINT.to_string()),
                timeout_secs,
            },
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> FoodcartResult<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
