#![allow(dead_code)]

use foodcart_core::geo::Coordinates;
use foodcart_core::geocoder::StaticGeocoder;
use foodcart_core::models::{Location, LocationId, Order};
use foodcart_core::store::InMemoryStore;
use foodcart_core::test_helpers::{
    counting_geocoder, menu_item, offset_north, order, product, restaurant, CountingGeocoder,
    MOSCOW_CENTER,
};

pub const ORDER_ADDRESS: &str = "Moscow, Tverskaya 1";
pub const ARBAT_ADDRESS: &str = "Moscow, Arbat 10";
pub const PETROVKA_ADDRESS: &str = "Moscow, Petrovka 20";
pub const UNKNOWN_ADDRESS: &str = "Moscow, Nowhere lane 99";

pub const BURGER: u64 = 1;
pub const FRIES: u64 = 2;
pub const COLA: u64 = 3;

pub const ARBAT: u64 = 1;
pub const PETROVKA: u64 = 2;
pub const SOKOL: u64 = 3;

/// Arbat sits 2 km from the order address, Petrovka 5 km.
pub fn arbat_point() -> Coordinates {
    offset_north(MOSCOW_CENTER, 2.0)
}

pub fn petrovka_point() -> Coordinates {
    offset_north(MOSCOW_CENTER, 5.0)
}

/// Geocoder that knows the order address and two of the three restaurants.
pub fn seeded_geocoder() -> CountingGeocoder<StaticGeocoder> {
    counting_geocoder([
        (ORDER_ADDRESS, MOSCOW_CENTER),
        (ARBAT_ADDRESS, arbat_point()),
        (PETROVKA_ADDRESS, petrovka_point()),
    ])
}

/// Catalog of three products and three restaurants.
///
/// Arbat and Petrovka cook burgers and fries; only Petrovka has cola.
/// Sokol cooks everything but its address cannot be geocoded.
pub fn seeded_store() -> InMemoryStore {
    let mut store = InMemoryStore::new();
    store.insert_product(product(BURGER, "Cheeseburger", 25_000));
    store.insert_product(product(FRIES, "Fries", 12_000));
    store.insert_product(product(COLA, "Cola", 9_000));

    store.insert_restaurant(restaurant(ARBAT, "Star Burger Arbat", ARBAT_ADDRESS));
    store.insert_restaurant(restaurant(PETROVKA, "Star Burger Petrovka", PETROVKA_ADDRESS));
    store.insert_restaurant(restaurant(SOKOL, "Star Burger Sokol", UNKNOWN_ADDRESS));

    for (restaurant, product, available) in [
        (ARBAT, BURGER, true),
        (ARBAT, FRIES, true),
        (ARBAT, COLA, false),
        (PETROVKA, BURGER, true),
        (PETROVKA, FRIES, true),
        (PETROVKA, COLA, true),
        (SOKOL, BURGER, true),
        (SOKOL, FRIES, true),
        (SOKOL, COLA, true),
    ] {
        store.insert_menu_item(menu_item(restaurant, product, available));
    }
    store
}

/// Seeded store with one raw order at [`ORDER_ADDRESS`].
pub fn store_with_order(id: u64, products: &[u64]) -> InMemoryStore {
    let mut store = seeded_store();
    store.insert_order(order(id, ORDER_ADDRESS, products));
    store
}

pub fn resolved_location(id: u64, address: &str, point: Coordinates) -> Location {
    Location {
        id: LocationId(id),
        address: address.to_string(),
        lat: Some(point.lat),
        lon: Some(point.lon),
    }
}

pub fn insert_orders(store: &mut InMemoryStore, orders: &[Order]) {
    for order in orders {
        store.insert_order(order.clone());
    }
}
