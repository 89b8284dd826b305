use crate::geo::Coordinates;

use super::error::GeocodeError;
use super::response::GeocoderResponse;

/// Decode a geocoder response body and take the first result's position.
pub fn parse_geocoder_body(body: &str) -> Result<Coordinates, GeocodeError> {
    let parsed: GeocoderResponse = serde_json::from_str(body)?;
    parse_geocoder_response(parsed)
}

pub(super) fn parse_geocoder_response(resp: GeocoderResponse) -> Result<Coordinates, GeocodeError> {
    let first = resp
        .response
        .collection
        .feature_members
        .into_iter()
        .next()
        .ok_or(GeocodeError::NoResult)?;
    parse_position(&first.geo_object.point.pos)
}

/// Parse a `"<longitude> <latitude>"` pair.
pub fn parse_position(pos: &str) -> Result<Coordinates, GeocodeError> {
    let malformed = || GeocodeError::MalformedPosition(pos.to_string());

    let mut parts = pos.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let lon: f64 = lon.parse().map_err(|_| malformed())?;
    let lat: f64 = lat.parse().map_err(|_| malformed())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(malformed());
    }
    Ok(Coordinates::new(lat, lon))
}
