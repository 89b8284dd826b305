use thiserror::Error;

/// Why a single geocoding attempt failed. Only visible inside the client and
/// in its logs; callers just see an unresolved address.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[cfg(feature = "yandex")]
    #[error("geocoder request failed")]
    Http(#[source] reqwest::Error),

    #[error("geocoder answered with HTTP status {0}")]
    Status(u16),

    #[error("geocoder response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("geocoder found nothing for the address")]
    NoResult,

    #[error("malformed position {0:?}")]
    MalformedPosition(String),
}
