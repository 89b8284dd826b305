//! Manager views: the pending-orders board and the product availability matrix.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::assignment::rank;
use crate::geocoder::Geocoder;
use crate::menu::{availability_table, AvailabilityIndex, ProductAvailabilityRow};
use crate::models::{
    Order, OrderId, OrderStatus, PaymentMethod, Restaurant, RestaurantId,
};
use crate::resolution::CoordinateResolver;
use crate::store::{AttachLocations, LocationStore, OrderStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    pub id: RestaurantId,
    pub name: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedRestaurantInfo {
    pub id: RestaurantId,
    pub name: String,
    pub distance_km: Option<f64>,
}

/// One row of the orders board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderInfo {
    pub id: OrderId,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    /// In kopecks.
    pub total_price: u64,
    pub customer: String,
    pub phonenumber: String,
    pub address: String,
    pub comment: String,
    pub candidates: Vec<RankedRestaurant>,
    pub assigned: Option<AssignedRestaurantInfo>,
    pub geocode_error: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDashboard {
    pub orders: Vec<OrderInfo>,
    pub geocoder_calls: usize,
}

/// Raw orders first, newest first within each group.
fn board_order(orders: &mut [Order]) {
    orders.sort_by_key(|order| (order.status != OrderStatus::Raw, Reverse(order.id)));
}

fn restaurants_by_name(mut restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
    restaurants.sort_by(|a, b| a.name.cmp(&b.name));
    restaurants
}

/// Resolve coordinates for every restaurant and pending order, persist what
/// was learned, and rank restaurants for each order.
///
/// Restaurants are resolved before orders and both share one resolver, so an
/// order delivered to a restaurant's own address costs no extra lookup.
pub fn build_order_dashboard<S>(store: &mut S, geocoder: &dyn Geocoder) -> OrderDashboard
where
    S: OrderStore + LocationStore + AttachLocations<OrderId> + AttachLocations<RestaurantId>,
{
    let mut orders = store.pending_orders();
    board_order(&mut orders);
    let restaurants = restaurants_by_name(store.restaurants());
    let index = AvailabilityIndex::build(&store.available_menu_items());

    let mut resolver = CoordinateResolver::new(geocoder);
    let restaurant_points = resolver.resolve_collection(store, &restaurants);
    let order_points = resolver.resolve_collection(store, &orders);

    let names: HashMap<RestaurantId, &str> = restaurants
        .iter()
        .map(|restaurant| (restaurant.id, restaurant.name.as_str()))
        .collect();
    let name_of = |id: RestaurantId| {
        names
            .get(&id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("Restaurant #{id}"))
    };

    let infos: Vec<OrderInfo> = orders
        .iter()
        .map(|order| {
            let ranking = rank(
                order,
                &restaurants,
                &index,
                order_points.get(&order.id),
                &restaurant_points.coordinates,
            );
            OrderInfo {
                id: order.id,
                status: order.status,
                payment_method: order.payment_method,
                total_price: order.total_price(),
                customer: order.customer_name(),
                phonenumber: order.phonenumber.clone(),
                address: order.address.clone(),
                comment: order.comment.clone(),
                candidates: ranking
                    .candidates
                    .iter()
                    .map(|candidate| RankedRestaurant {
                        id: candidate.restaurant,
                        name: name_of(candidate.restaurant),
                        distance_km: candidate.distance_km,
                    })
                    .collect(),
                assigned: ranking.assigned.map(|assigned| AssignedRestaurantInfo {
                    id: assigned.restaurant,
                    name: name_of(assigned.restaurant),
                    distance_km: assigned.distance_km,
                }),
                geocode_error: ranking.geocode_error,
            }
        })
        .collect();

    info!(
        orders = infos.len(),
        restaurants = restaurants.len(),
        geocoder_calls = resolver.geocoder_calls(),
        "orders dashboard built"
    );

    OrderDashboard {
        orders: infos,
        geocoder_calls: resolver.geocoder_calls(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductAvailability {
    /// Column order of every row's flags.
    pub restaurants: Vec<Restaurant>,
    pub rows: Vec<ProductAvailabilityRow>,
}

pub fn build_product_availability<S: OrderStore + ?Sized>(store: &S) -> ProductAvailability {
    let restaurants = restaurants_by_name(store.restaurants());
    let rows = availability_table(&store.products(), &restaurants, &store.menu_items());
    ProductAvailability { restaurants, rows }
}
