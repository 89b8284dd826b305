//! Just enough of the geocoder JSON to reach the first point.
//!
//! `response.GeoObjectCollection.featureMember[0].GeoObject.Point.pos`

use serde::Deserialize;

#[derive(Deserialize)]
pub(super) struct GeocoderResponse {
    pub(super) response: GeocoderBody,
}

#[derive(Deserialize)]
pub(super) struct GeocoderBody {
    #[serde(rename = "GeoObjectCollection")]
    pub(super) collection: GeoObjectCollection,
}

#[derive(Deserialize)]
pub(super) struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    pub(super) feature_members: Vec<FeatureMember>,
}

#[derive(Deserialize)]
pub(super) struct FeatureMember {
    #[serde(rename = "GeoObject")]
    pub(super) geo_object: GeoObject,
}

#[derive(Deserialize)]
pub(super) struct GeoObject {
    #[serde(rename = "Point")]
    pub(super) point: Point,
}

#[derive(Deserialize)]
pub(super) struct Point {
    pub(super) pos: String,
}
