mod support;

use std::collections::HashMap;

use foodcart_core::assignment::{rank, Candidate};
use foodcart_core::geo::{distance_km, rounded_distance_km, Coordinates};
use foodcart_core::menu::AvailabilityIndex;
use foodcart_core::models::{Order, OrderItem, ProductId, Restaurant, RestaurantId};
use foodcart_core::store::{InMemoryStore, OrderStore};
use foodcart_core::test_helpers::{menu_item, offset_north, order, restaurant, MOSCOW_CENTER};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use support::fixtures::{
    arbat_point, petrovka_point, seeded_store, ARBAT, BURGER, COLA, FRIES, ORDER_ADDRESS,
    PETROVKA, SOKOL,
};

fn index_of(store: &InMemoryStore) -> AvailabilityIndex {
    AvailabilityIndex::build(&store.available_menu_items())
}

fn seeded_points() -> HashMap<RestaurantId, Coordinates> {
    HashMap::from([
        (RestaurantId(ARBAT), arbat_point()),
        (RestaurantId(PETROVKA), petrovka_point()),
    ])
}

#[test]
fn nearest_suitable_restaurant_comes_first() {
    let store = seeded_store();
    let order = order(1, ORDER_ADDRESS, &[BURGER, FRIES]);

    let ranking = rank(
        &order,
        &store.restaurants(),
        &index_of(&store),
        Some(MOSCOW_CENTER),
        &seeded_points(),
    );

    assert!(!ranking.geocode_error);
    assert_eq!(
        ranking.candidates,
        vec![
            Candidate {
                restaurant: RestaurantId(ARBAT),
                distance_km: 2.00,
            },
            Candidate {
                restaurant: RestaurantId(PETROVKA),
                distance_km: 5.00,
            },
        ]
    );
}

#[test]
fn restaurant_missing_a_product_is_not_a_candidate() {
    let store = seeded_store();
    let order = order(1, ORDER_ADDRESS, &[BURGER, COLA]);

    let ranking = rank(
        &order,
        &store.restaurants(),
        &index_of(&store),
        Some(MOSCOW_CENTER),
        &seeded_points(),
    );

    let ids: Vec<_> = ranking.candidates.iter().map(|c| c.restaurant).collect();
    assert_eq!(ids, vec![RestaurantId(PETROVKA)]);
}

#[test]
fn unresolved_order_is_flagged_with_no_candidates() {
    let store = seeded_store();
    let order = order(1, ORDER_ADDRESS, &[BURGER]);

    let ranking = rank(&order, &store.restaurants(), &index_of(&store), None, &seeded_points());

    assert!(ranking.geocode_error);
    assert!(ranking.candidates.is_empty());
    assert_eq!(ranking.assigned, None);
}

#[test]
fn assigned_restaurant_without_coordinates_has_no_distance() {
    let store = seeded_store();
    let mut order = order(1, ORDER_ADDRESS, &[BURGER]);
    order.assign_restaurant(RestaurantId(SOKOL));

    let ranking = rank(
        &order,
        &store.restaurants(),
        &index_of(&store),
        Some(MOSCOW_CENTER),
        &seeded_points(),
    );

    let assigned = ranking.assigned.expect("assigned restaurant reported");
    assert_eq!(assigned.restaurant, RestaurantId(SOKOL));
    assert_eq!(assigned.distance_km, None);
    assert!(ranking
        .candidates
        .iter()
        .all(|candidate| candidate.restaurant != RestaurantId(SOKOL)));
}

#[test]
fn assigned_restaurant_is_reported_even_when_unsuitable() {
    let store = seeded_store();
    let mut order = order(1, ORDER_ADDRESS, &[COLA]);
    order.assign_restaurant(RestaurantId(ARBAT));

    let ranking = rank(
        &order,
        &store.restaurants(),
        &index_of(&store),
        Some(MOSCOW_CENTER),
        &seeded_points(),
    );

    let assigned = ranking.assigned.expect("assigned restaurant reported");
    assert_eq!(assigned.restaurant, RestaurantId(ARBAT));
    assert_eq!(assigned.distance_km, Some(2.00));
}

#[test]
fn equal_distances_keep_input_order() {
    let point = offset_north(MOSCOW_CENTER, 3.0);
    let restaurants: Vec<Restaurant> = (1..=4)
        .map(|id| restaurant(id, &format!("Twin #{id}"), "Moscow, Twin st"))
        .collect();
    let menu: Vec<_> = (1..=4).map(|id| menu_item(id, BURGER, true)).collect();
    let points: HashMap<_, _> = (1..=4).map(|id| (RestaurantId(id), point)).collect();

    let ranking = rank(
        &order(1, ORDER_ADDRESS, &[BURGER]),
        &restaurants,
        &AvailabilityIndex::build(&menu),
        Some(MOSCOW_CENTER),
        &points,
    );

    let ids: Vec<_> = ranking.candidates.iter().map(|c| c.restaurant.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn random_menus_only_yield_covering_restaurants_in_ascending_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let restaurants: Vec<Restaurant> = (1..=40)
        .map(|id| restaurant(id, &format!("Kitchen #{id}"), "somewhere"))
        .collect();
    let mut menu = Vec::new();
    for restaurant in 1..=40 {
        for product in 1..=6 {
            menu.push(menu_item(restaurant, product, rng.gen_bool(0.7)));
        }
    }
    let mut points = HashMap::new();
    for restaurant in &restaurants {
        if rng.gen_bool(0.9) {
            let point = Coordinates::new(
                MOSCOW_CENTER.lat + rng.gen_range(-0.3..0.3),
                MOSCOW_CENTER.lon + rng.gen_range(-0.5..0.5),
            );
            points.insert(restaurant.id, point);
        }
    }
    let index = AvailabilityIndex::build(&menu);

    for order_id in 1..=25 {
        let products: Vec<u64> = (1..=6).filter(|_| rng.gen_bool(0.4)).collect();
        let mut order: Order = order(order_id, ORDER_ADDRESS, &products);
        // A repeated line must not change the outcome.
        order.items.extend(products.first().map(|product| OrderItem {
            product: ProductId(*product),
            quantity: 3,
            price: 100,
        }));

        let ranking = rank(&order, &restaurants, &index, Some(MOSCOW_CENTER), &points);

        for candidate in &ranking.candidates {
            let point = points
                .get(&candidate.restaurant)
                .expect("candidate has coordinates");
            assert!(index.covers(candidate.restaurant, &order.product_ids()));
            assert_eq!(candidate.distance_km, rounded_distance_km(MOSCOW_CENTER, *point));
            assert_eq!(candidate.distance_km, (candidate.distance_km * 100.0).round() / 100.0);
            assert!(candidate.distance_km >= 0.0);
        }
        assert!(ranking
            .candidates
            .windows(2)
            .all(|pair| pair[0].distance_km <= pair[1].distance_km));
    }
}

#[test]
fn distances_are_symmetric() {
    let a = arbat_point();
    let b = Coordinates::new(59.93, 30.31);
    assert_eq!(distance_km(a, b), distance_km(b, a));
    assert_eq!(rounded_distance_km(a, b), rounded_distance_km(b, a));
}
