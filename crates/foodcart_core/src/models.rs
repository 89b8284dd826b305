//! Domain records: products, restaurants, menus, orders and shared locations.
//!
//! Prices are kept in minor currency units (kopecks) so totals are exact.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

macro_rules! typed_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

typed_id! {
    /// Primary key of a [`Location`] row.
    LocationId
}
typed_id! {
    /// Primary key of an [`Order`].
    OrderId
}
typed_id! {
    /// Primary key of a [`Restaurant`].
    RestaurantId
}
typed_id! {
    /// Primary key of a [`Product`].
    ProductId
}

/// Canonical form of a free-text address: trimmed, inner whitespace collapsed.
///
/// Used both as the unique key of [`Location`] rows and as the per-run cache key.
pub fn normalize_address(address: &str) -> String {
    address.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Geocoded coordinates shared by every order and restaurant with the same address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Location {
    /// Both coordinates, or `None` while the location is unresolved.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lon)
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates().is_some()
    }

    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.lat = Some(coordinates.lat);
        self.lon = Some(coordinates.lon);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Unit price in kopecks.
    pub price: u64,
    #[serde(default)]
    pub special_status: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub location: Option<LocationId>,
}

/// One product on one restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub restaurant: RestaurantId,
    pub product: ProductId,
    #[serde(default = "default_availability")]
    pub availability: bool,
}

fn default_availability() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Raw,
    InProgress,
    InDelivery,
    Completed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Raw => write!(f, "Raw"),
            OrderStatus::InProgress => write!(f, "In progress"),
            OrderStatus::InDelivery => write!(f, "In delivery"),
            OrderStatus::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Online,
    #[default]
    Unspecified,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Online => write!(f, "Online"),
            PaymentMethod::Unspecified => write!(f, "Not paid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductId,
    pub quantity: u32,
    /// Unit price at the moment the order was registered, in kopecks.
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub restaurant: Option<RestaurantId>,
    #[serde(default)]
    pub location: Option<LocationId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub called_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of unit price times quantity over all items, in kopecks.
    pub fn total_price(&self) -> u64 {
        self.items
            .iter()
            .map(|item| item.price * u64::from(item.quantity))
            .sum()
    }

    /// Distinct products referenced by the order, in first-seen order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut seen = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.contains(&item.product) {
                seen.push(item.product);
            }
        }
        seen
    }

    /// Hand the order to a restaurant. A raw order moves to `InProgress`.
    pub fn assign_restaurant(&mut self, restaurant: RestaurantId) {
        self.restaurant = Some(restaurant);
        if self.status == OrderStatus::Raw {
            self.status = OrderStatus::InProgress;
        }
    }

    pub fn customer_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Format kopecks as a price string, e.g. `1250` → `"12.50"`.
pub fn format_price(kopecks: u64) -> String {
    format!("{}.{:02}", kopecks / 100, kopecks % 100)
}
