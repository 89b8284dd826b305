use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::geo::Coordinates;

use super::error::GeocodeError;
use super::parser::parse_geocoder_body;
use super::Geocoder;

/// Thin blocking HTTP client for the Yandex geocoder.
#[derive(Debug, Clone)]
pub struct YandexGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl YandexGeocoder {
    /// Create a client for `endpoint` (e.g. `https://geocode-maps.yandex.ru/1.x`).
    ///
    /// Without a `timeout` the HTTP client's own default applies.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GeocodeError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(GeocodeError::Http)?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// One lookup with the failure reason kept.
    pub fn fetch(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("geocode", address),
                ("format", "json"),
            ])
            .send()
            .map_err(GeocodeError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response.text().map_err(GeocodeError::Http)?;
        parse_geocoder_body(&body)
    }
}

impl Geocoder for YandexGeocoder {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        match self.fetch(address) {
            Ok(coordinates) => {
                debug!(address, %coordinates, "geocoded address");
                Some(coordinates)
            }
            Err(err) => {
                let cause = std::error::Error::source(&err).map(ToString::to_string);
                warn!(address, error = %err, cause = ?cause, "geocoding failed; address left unresolved");
                None
            }
        }
    }
}
