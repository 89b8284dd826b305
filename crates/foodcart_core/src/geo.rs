//! Coordinates and straight-line distances.
//!
//! Distances are geodesic on the WGS-84 ellipsoid (Vincenty's inverse
//! formula). Near-antipodal pairs where the iteration fails to converge fall
//! back to the spherical haversine distance.

use serde::{Deserialize, Serialize};

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

/// Mean Earth radius used by the haversine fallback.
const EARTH_RADIUS_KM: f64 = 6371.0;

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds coordinates only when both components are present.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Geodesic distance between two points in kilometres.
///
/// The points are put in a canonical order first so that
/// `distance_km(a, b) == distance_km(b, a)` holds bit for bit.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let (from, to) = if a.lat < b.lat || (a.lat == b.lat && a.lon <= b.lon) {
        (a, b)
    } else {
        (b, a)
    };
    vincenty_km(from, to).unwrap_or_else(|| haversine_km(from, to))
}

/// Round a distance to two decimal places.
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Distance rounded the way it is shown to managers.
pub fn rounded_distance_km(a: Coordinates, b: Coordinates) -> f64 {
    round_km(distance_km(a, b))
}

/// Spherical great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon = ((lon2 - lon1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Vincenty inverse solution; `None` when the iteration does not converge.
fn vincenty_km(a: Coordinates, b: Coordinates) -> Option<f64> {
    let l = (b.lon - a.lon).to_radians();
    let u1 = ((1.0 - WGS84_F) * a.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * b.lat.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial lines have cos²α = 0.
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            let meters = WGS84_B * big_a * (sigma - delta_sigma);
            return Some(meters / 1000.0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude_at_equator() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 110.574).abs() < 0.01, "got {d}");
    }

    #[test]
    fn one_degree_of_longitude_along_equator() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((d - 111.319).abs() < 0.01, "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        let moscow = Coordinates::new(55.75, 37.61);
        assert_eq!(distance_km(moscow, moscow), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(55.7558, 37.6173);
        let b = Coordinates::new(59.9343, 30.3351);
        assert_eq!(distance_km(a, b), distance_km(b, a));
        assert!((distance_km(a, b) - 634.5).abs() < 5.0);
    }

    #[test]
    fn antipodal_points_fall_back_to_haversine() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.5, 179.7);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        assert!(d > 19_000.0 && d < 20_100.0, "got {d}");
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round_km(1.23456), 1.23);
        assert_eq!(round_km(2.0), 2.0);
        assert_eq!(round_km(0.004), 0.0);
    }

    #[test]
    fn from_parts_requires_both() {
        assert_eq!(Coordinates::from_parts(Some(1.0), None), None);
        assert_eq!(Coordinates::from_parts(None, Some(1.0)), None);
        assert_eq!(
            Coordinates::from_parts(Some(1.0), Some(2.0)),
            Some(Coordinates::new(1.0, 2.0))
        );
    }
}
