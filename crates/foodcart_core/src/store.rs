//! Persistence seams for locations, orders and restaurants.
//!
//! The engine only talks to the traits in this module. [`InMemoryStore`]
//! implements all of them and can be loaded from / saved to a JSON snapshot.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FoodcartResult, StoreError};
use crate::geo::Coordinates;
use crate::models::{
    normalize_address, Location, LocationId, MenuItem, Order, OrderId, OrderItem, OrderStatus,
    PaymentMethod, Product, ProductId, Restaurant, RestaurantId,
};

/// Location rows keyed by unique normalized address.
pub trait LocationStore {
    fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError>;

    fn find_location(&self, address: &str) -> Result<Option<Location>, StoreError>;

    /// Insert a new row. Fails with [`StoreError::DuplicateAddress`] when the
    /// normalized address is already taken.
    fn create_location(
        &mut self,
        address: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<Location, StoreError>;

    /// Write the coordinates of every given row in one round-trip.
    fn bulk_update_locations(&mut self, locations: &[Location]) -> Result<usize, StoreError>;
}

/// Batched write of the location foreign key of one entity kind.
pub trait AttachLocations<Id> {
    fn bulk_attach_locations(&mut self, updates: &[(Id, LocationId)]) -> Result<usize, StoreError>;
}

/// Orders, restaurants and the catalog as seen by the manager views.
pub trait OrderStore {
    /// Every order that is not completed.
    fn pending_orders(&self) -> Vec<Order>;

    fn order(&self, id: OrderId) -> Option<Order>;

    fn restaurants(&self) -> Vec<Restaurant>;

    fn products(&self) -> Vec<Product>;

    fn product(&self, id: ProductId) -> Option<Product>;

    fn menu_items(&self) -> Vec<MenuItem>;

    fn available_menu_items(&self) -> Vec<MenuItem> {
        self.menu_items()
            .into_iter()
            .filter(|item| item.availability)
            .collect()
    }

    fn create_order(&mut self, order: NewOrder) -> Result<Order, StoreError>;

    fn assign_restaurant(
        &mut self,
        order: OrderId,
        restaurant: RestaurantId,
    ) -> Result<Order, StoreError>;
}

/// A validated order that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub comment: String,
    pub items: Vec<OrderItem>,
    pub registered_at: DateTime<Utc>,
}

/// Look up the row for `address`, creating it when missing.
///
/// A concurrent writer may insert the same address between the lookup and the
/// insert; the resulting duplicate-key failure is absorbed by reading again.
pub fn find_or_create_location<S>(
    store: &mut S,
    address: &str,
    coordinates: Option<Coordinates>,
) -> Result<Location, StoreError>
where
    S: LocationStore + ?Sized,
{
    let address = normalize_address(address);
    if let Some(found) = store.find_location(&address)? {
        return Ok(found);
    }
    match store.create_location(&address, coordinates) {
        Ok(created) => Ok(created),
        Err(StoreError::DuplicateAddress(_)) => store
            .find_location(&address)?
            .ok_or(StoreError::DuplicateAddress(address)),
        Err(err) => Err(err),
    }
}

/// Write round-trips issued against an [`InMemoryStore`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub location_creates: usize,
    pub location_bulk_updates: usize,
    pub order_bulk_updates: usize,
    pub restaurant_bulk_updates: usize,
}

/// Serializable image of an [`InMemoryStore`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    locations: BTreeMap<LocationId, Location>,
    address_index: HashMap<String, LocationId>,
    products: BTreeMap<ProductId, Product>,
    restaurants: BTreeMap<RestaurantId, Restaurant>,
    menu: Vec<MenuItem>,
    orders: BTreeMap<OrderId, Order>,
    next_location_id: u64,
    next_order_id: u64,
    stats: StoreStats,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for location in snapshot.locations {
            store.insert_location(location)?;
        }
        for product in snapshot.products {
            store.insert_product(product);
        }
        for restaurant in snapshot.restaurants {
            store.insert_restaurant(restaurant);
        }
        for item in snapshot.menu {
            store.insert_menu_item(item);
        }
        for order in snapshot.orders {
            store.insert_order(order);
        }
        Ok(store)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            locations: self.locations.values().cloned().collect(),
            products: self.products.values().cloned().collect(),
            restaurants: self.restaurants.values().cloned().collect(),
            menu: self.menu.clone(),
            orders: self.orders.values().cloned().collect(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> FoodcartResult<Self> {
        let data = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&data)?;
        Ok(Self::from_snapshot(snapshot)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> FoodcartResult<()> {
        let data = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Insert a location row as-is, keeping its id.
    pub fn insert_location(&mut self, mut location: Location) -> Result<(), StoreError> {
        location.address = normalize_address(&location.address);
        if self.address_index.contains_key(&location.address) {
            return Err(StoreError::DuplicateAddress(location.address));
        }
        self.next_location_id = self.next_location_id.max(location.id.0);
        self.address_index.insert(location.address.clone(), location.id);
        self.locations.insert(location.id, location);
        Ok(())
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn insert_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    /// Insert or replace the menu entry for the item's (restaurant, product) pair.
    pub fn insert_menu_item(&mut self, item: MenuItem) {
        match self
            .menu
            .iter_mut()
            .find(|existing| existing.restaurant == item.restaurant && existing.product == item.product)
        {
            Some(existing) => existing.availability = item.availability,
            None => self.menu.push(item),
        }
    }

    pub fn insert_order(&mut self, order: Order) {
        self.next_order_id = self.next_order_id.max(order.id.0);
        self.orders.insert(order.id, order);
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    pub fn restaurant(&self, id: RestaurantId) -> Option<Restaurant> {
        self.restaurants.get(&id).cloned()
    }

    pub fn locations(&self) -> Vec<Location> {
        self.locations.values().cloned().collect()
    }
}

impl LocationStore for InMemoryStore {
    fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        Ok(self.locations.get(&id).cloned())
    }

    fn find_location(&self, address: &str) -> Result<Option<Location>, StoreError> {
        let address = normalize_address(address);
        Ok(self
            .address_index
            .get(&address)
            .and_then(|id| self.locations.get(id))
            .cloned())
    }

    fn create_location(
        &mut self,
        address: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<Location, StoreError> {
        let address = normalize_address(address);
        if self.address_index.contains_key(&address) {
            return Err(StoreError::DuplicateAddress(address));
        }
        self.stats.location_creates += 1;
        self.next_location_id += 1;
        let location = Location {
            id: LocationId(self.next_location_id),
            address,
            lat: coordinates.map(|c| c.lat),
            lon: coordinates.map(|c| c.lon),
        };
        self.address_index
            .insert(location.address.clone(), location.id);
        self.locations.insert(location.id, location.clone());
        Ok(location)
    }

    fn bulk_update_locations(&mut self, locations: &[Location]) -> Result<usize, StoreError> {
        self.stats.location_bulk_updates += 1;
        for update in locations {
            let row = self
                .locations
                .get_mut(&update.id)
                .ok_or(StoreError::LocationNotFound(update.id))?;
            row.lat = update.lat;
            row.lon = update.lon;
        }
        Ok(locations.len())
    }
}

impl AttachLocations<OrderId> for InMemoryStore {
    fn bulk_attach_locations(
        &mut self,
        updates: &[(OrderId, LocationId)],
    ) -> Result<usize, StoreError> {
        self.stats.order_bulk_updates += 1;
        for (order_id, location_id) in updates {
            let order = self
                .orders
                .get_mut(order_id)
                .ok_or(StoreError::OrderNotFound(*order_id))?;
            order.location = Some(*location_id);
        }
        Ok(updates.len())
    }
}

impl AttachLocations<RestaurantId> for InMemoryStore {
    fn bulk_attach_locations(
        &mut self,
        updates: &[(RestaurantId, LocationId)],
    ) -> Result<usize, StoreError> {
        self.stats.restaurant_bulk_updates += 1;
        for (restaurant_id, location_id) in updates {
            let restaurant = self
                .restaurants
                .get_mut(restaurant_id)
                .ok_or(StoreError::RestaurantNotFound(*restaurant_id))?;
            restaurant.location = Some(*location_id);
        }
        Ok(updates.len())
    }
}

impl OrderStore for InMemoryStore {
    fn pending_orders(&self) -> Vec<Order> {
        self.orders
            .values()
            .filter(|order| order.status != OrderStatus::Completed)
            .cloned()
            .collect()
    }

    fn order(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).cloned()
    }

    fn restaurants(&self) -> Vec<Restaurant> {
        self.restaurants.values().cloned().collect()
    }

    fn products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id).cloned()
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        self.menu.clone()
    }

    fn create_order(&mut self, order: NewOrder) -> Result<Order, StoreError> {
        if let Some(missing) = order
            .items
            .iter()
            .find(|item| !self.products.contains_key(&item.product))
        {
            return Err(StoreError::ProductNotFound(missing.product));
        }
        self.next_order_id += 1;
        let created = Order {
            id: OrderId(self.next_order_id),
            firstname: order.firstname,
            lastname: order.lastname,
            phonenumber: order.phonenumber,
            address: order.address,
            status: OrderStatus::Raw,
            payment_method: order.payment_method,
            comment: order.comment,
            restaurant: None,
            location: None,
            items: order.items,
            registered_at: order.registered_at,
            called_at: None,
            delivered_at: None,
        };
        self.orders.insert(created.id, created.clone());
        Ok(created)
    }

    fn assign_restaurant(
        &mut self,
        order: OrderId,
        restaurant: RestaurantId,
    ) -> Result<Order, StoreError> {
        if !self.restaurants.contains_key(&restaurant) {
            return Err(StoreError::RestaurantNotFound(restaurant));
        }
        let stored = self
            .orders
            .get_mut(&order)
            .ok_or(StoreError::OrderNotFound(order))?;
        stored.assign_restaurant(restaurant);
        Ok(stored.clone())
    }
}
