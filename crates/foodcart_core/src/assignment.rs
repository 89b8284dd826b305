//! Restaurant suitability and proximity ranking for a single order.
//!
//! A restaurant is a candidate for an order when its current menu covers
//! every distinct product in the order and both sides have coordinates.
//! Candidates are ordered by straight-line distance; restaurants at equal
//! distance keep the order they were given in.

use std::collections::HashMap;

use serde::Serialize;

use crate::geo::{rounded_distance_km, Coordinates};
use crate::menu::AvailabilityIndex;
use crate::models::{Order, Restaurant, RestaurantId};

/// A restaurant able to cook the whole order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub restaurant: RestaurantId,
    /// Rounded to two decimals.
    pub distance_km: f64,
}

/// The restaurant an order is already assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssignedRestaurant {
    pub restaurant: RestaurantId,
    /// `None` when the order or the restaurant has no coordinates.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRanking {
    pub candidates: Vec<Candidate>,
    pub assigned: Option<AssignedRestaurant>,
    /// Set when the order itself has no coordinates; candidates are then empty.
    pub geocode_error: bool,
}

/// Rank `restaurants` for `order`.
///
/// Never fails: an unresolved order is flagged through `geocode_error`, and an
/// order nobody can cook gets an empty candidate list. The assigned restaurant
/// is reported whether or not it is suitable.
pub fn rank(
    order: &Order,
    restaurants: &[Restaurant],
    index: &AvailabilityIndex,
    order_coords: Option<Coordinates>,
    restaurant_coords: &HashMap<RestaurantId, Coordinates>,
) -> OrderRanking {
    let mut candidates = Vec::new();

    if let Some(origin) = order_coords {
        let products = order.product_ids();
        candidates.extend(restaurants.iter().filter_map(|restaurant| {
            let point = restaurant_coords.get(&restaurant.id)?;
            index.covers(restaurant.id, &products).then(|| Candidate {
                restaurant: restaurant.id,
                distance_km: rounded_distance_km(origin, *point),
            })
        }));
        candidates.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    }

    let assigned = order.restaurant.map(|restaurant| AssignedRestaurant {
        restaurant,
        distance_km: order_coords
            .zip(restaurant_coords.get(&restaurant).copied())
            .map(|(origin, point)| rounded_distance_km(origin, point)),
    });

    OrderRanking {
        candidates,
        assigned,
        geocode_error: order_coords.is_none(),
    }
}
