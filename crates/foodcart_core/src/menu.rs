//! Which restaurants currently sell which products.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{MenuItem, Product, ProductId, Restaurant, RestaurantId};

/// Product → restaurants with that product marked available.
///
/// Built from scratch for every assignment pass; it is never patched in place.
#[derive(Debug, Default, Clone)]
pub struct AvailabilityIndex {
    available_in: HashMap<ProductId, HashSet<RestaurantId>>,
}

impl AvailabilityIndex {
    pub fn build<'a, I>(menu_items: I) -> Self
    where
        I: IntoIterator<Item = &'a MenuItem>,
    {
        let mut available_in: HashMap<ProductId, HashSet<RestaurantId>> = HashMap::new();
        for item in menu_items.into_iter().filter(|item| item.availability) {
            available_in
                .entry(item.product)
                .or_default()
                .insert(item.restaurant);
        }
        Self { available_in }
    }

    pub fn restaurants_offering(&self, product: ProductId) -> Option<&HashSet<RestaurantId>> {
        self.available_in.get(&product)
    }

    pub fn is_available(&self, product: ProductId, restaurant: RestaurantId) -> bool {
        self.available_in
            .get(&product)
            .is_some_and(|restaurants| restaurants.contains(&restaurant))
    }

    /// True when `restaurant` sells every product in `products`.
    /// An empty product list is covered by every restaurant.
    pub fn covers(&self, restaurant: RestaurantId, products: &[ProductId]) -> bool {
        products
            .iter()
            .all(|product| self.is_available(*product, restaurant))
    }
}

/// One product row of the availability matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAvailabilityRow {
    pub product: Product,
    /// One flag per restaurant, in the order the restaurants were given.
    pub availability: Vec<bool>,
}

/// Availability of every product at every restaurant.
///
/// Unlike [`AvailabilityIndex`] this keeps explicit `false` entries and
/// restaurants that have no menu entry for a product.
pub fn availability_table(
    products: &[Product],
    restaurants: &[Restaurant],
    menu_items: &[MenuItem],
) -> Vec<ProductAvailabilityRow> {
    let flags: HashMap<(ProductId, RestaurantId), bool> = menu_items
        .iter()
        .map(|item| ((item.product, item.restaurant), item.availability))
        .collect();

    products
        .iter()
        .map(|product| ProductAvailabilityRow {
            product: product.clone(),
            availability: restaurants
                .iter()
                .map(|restaurant| {
                    flags
                        .get(&(product.id, restaurant.id))
                        .copied()
                        .unwrap_or(false)
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(restaurant: u64, product: u64, availability: bool) -> MenuItem {
        MenuItem {
            restaurant: RestaurantId(restaurant),
            product: ProductId(product),
            availability,
        }
    }

    #[test]
    fn only_available_items_are_indexed() {
        let menu = vec![item(1, 10, true), item(2, 10, false), item(2, 11, true)];
        let index = AvailabilityIndex::build(&menu);

        assert!(index.is_available(ProductId(10), RestaurantId(1)));
        assert!(!index.is_available(ProductId(10), RestaurantId(2)));
        assert!(index.is_available(ProductId(11), RestaurantId(2)));
        assert!(index.restaurants_offering(ProductId(12)).is_none());
    }

    #[test]
    fn covers_requires_every_product() {
        let menu = vec![item(1, 10, true), item(1, 11, true), item(2, 10, true)];
        let index = AvailabilityIndex::build(&menu);
        let wanted = [ProductId(10), ProductId(11)];

        assert!(index.covers(RestaurantId(1), &wanted));
        assert!(!index.covers(RestaurantId(2), &wanted));
        assert!(index.covers(RestaurantId(3), &[]));
    }

    #[test]
    fn availability_table_fills_missing_entries_with_false() {
        let products = vec![Product {
            id: ProductId(10),
            name: "Cheeseburger".to_string(),
            category: Some("Burgers".to_string()),
            price: 19_900,
            special_status: false,
            description: String::new(),
        }];
        let restaurants = vec![
            Restaurant {
                id: RestaurantId(2),
                name: "Arbat".to_string(),
                address: String::new(),
                contact_phone: String::new(),
                location: None,
            },
            Restaurant {
                id: RestaurantId(1),
                name: "Tverskaya".to_string(),
                address: String::new(),
                contact_phone: String::new(),
                location: None,
            },
        ];
        let menu = vec![item(1, 10, true)];

        let table = availability_table(&products, &restaurants, &menu);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].availability, vec![false, true]);
    }
}
