//! Fixtures and fake geocoders shared by unit tests, integration tests and benches.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};

use crate::geo::Coordinates;
use crate::geocoder::{Geocoder, StaticGeocoder};
use crate::models::{
    normalize_address, MenuItem, Order, OrderId, OrderItem, OrderStatus, PaymentMethod, Product,
    ProductId, Restaurant, RestaurantId,
};

/// Red Square, used as the default delivery point in tests.
pub const MOSCOW_CENTER: Coordinates = Coordinates {
    lat: 55.75,
    lon: 37.61,
};

const WGS84_A_M: f64 = 6_378_137.0;
const WGS84_E2: f64 = 0.006_694_379_990_14;

/// Point `km` kilometres due north of `origin` along the meridian.
///
/// Accurate to well under a metre for the short hops used in tests, so the
/// rounded geodesic distance back to `origin` equals `km` to two decimals.
pub fn offset_north(origin: Coordinates, km: f64) -> Coordinates {
    let sin_lat = origin.lat.to_radians().sin();
    let meridian_radius_m =
        WGS84_A_M * (1.0 - WGS84_E2) / (1.0 - WGS84_E2 * sin_lat * sin_lat).powf(1.5);
    let dlat = (km * 1000.0 / meridian_radius_m).to_degrees();
    Coordinates::new(origin.lat + dlat, origin.lon)
}

/// Wraps a geocoder and records every address it was asked about.
#[derive(Debug, Default)]
pub struct CountingGeocoder<G> {
    inner: G,
    calls: RefCell<Vec<String>>,
}

impl<G: Geocoder> CountingGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls_for(&self, address: &str) -> usize {
        let address = normalize_address(address);
        self.calls
            .borrow()
            .iter()
            .filter(|called| **called == address)
            .count()
    }
}

impl<G: Geocoder> Geocoder for CountingGeocoder<G> {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        self.calls.borrow_mut().push(normalize_address(address));
        self.inner.resolve(address)
    }
}

/// Counting geocoder over a fixed address table.
pub fn counting_geocoder<'a, I>(entries: I) -> CountingGeocoder<StaticGeocoder>
where
    I: IntoIterator<Item = (&'a str, Coordinates)>,
{
    CountingGeocoder::new(StaticGeocoder::from_table(entries))
}

pub fn product(id: u64, name: &str, price: u64) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        category: None,
        price,
        special_status: false,
        description: String::new(),
    }
}

pub fn restaurant(id: u64, name: &str, address: &str) -> Restaurant {
    Restaurant {
        id: RestaurantId(id),
        name: name.to_string(),
        address: address.to_string(),
        contact_phone: String::new(),
        location: None,
    }
}

pub fn menu_item(restaurant: u64, product: u64, availability: bool) -> MenuItem {
    MenuItem {
        restaurant: RestaurantId(restaurant),
        product: ProductId(product),
        availability,
    }
}

/// Raw order with one unit of each listed product at 100.00 each.
pub fn order(id: u64, address: &str, products: &[u64]) -> Order {
    Order {
        id: OrderId(id),
        firstname: "Ivan".to_string(),
        lastname: "Petrov".to_string(),
        phonenumber: "+79991234567".to_string(),
        address: address.to_string(),
        status: OrderStatus::Raw,
        payment_method: PaymentMethod::Cash,
        comment: String::new(),
        restaurant: None,
        location: None,
        items: products
            .iter()
            .map(|product| OrderItem {
                product: ProductId(*product),
                quantity: 1,
                price: 10_000,
            })
            .collect(),
        registered_at: Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
        called_at: None,
        delivered_at: None,
    }
}
