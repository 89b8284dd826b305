mod support;

use foodcart_core::dashboard::{build_order_dashboard, build_product_availability, OrderInfo};
use foodcart_core::models::{OrderId, OrderStatus, RestaurantId};
use foodcart_core::store::{InMemoryStore, OrderStore};
use foodcart_core::test_helpers::order;
use support::fixtures::{
    seeded_geocoder, seeded_store, ARBAT, ARBAT_ADDRESS, BURGER, COLA, FRIES, ORDER_ADDRESS,
    SOKOL, UNKNOWN_ADDRESS,
};

/// Three raw orders, one in progress at Sokol and one completed.
fn board_store() -> InMemoryStore {
    let mut store = seeded_store();
    store.insert_order(order(1, ORDER_ADDRESS, &[BURGER, FRIES]));
    store.insert_order(order(2, UNKNOWN_ADDRESS, &[BURGER]));
    let mut in_progress = order(3, ORDER_ADDRESS, &[BURGER]);
    in_progress.assign_restaurant(RestaurantId(SOKOL));
    store.insert_order(in_progress);
    let mut completed = order(4, ORDER_ADDRESS, &[BURGER]);
    completed.status = OrderStatus::Completed;
    store.insert_order(completed);
    store.insert_order(order(5, ARBAT_ADDRESS, &[BURGER]));
    store
}

fn info(infos: &[OrderInfo], id: u64) -> &OrderInfo {
    infos
        .iter()
        .find(|info| info.id == OrderId(id))
        .expect("order on the board")
}

#[test]
fn board_lists_raw_orders_first_newest_first() {
    let mut store = board_store();
    let geocoder = seeded_geocoder();

    let board = build_order_dashboard(&mut store, &geocoder);

    let ids: Vec<_> = board.orders.iter().map(|info| info.id.0).collect();
    assert_eq!(ids, vec![5, 2, 1, 3]);
}

#[test]
fn board_ranks_candidates_with_names_and_distances() {
    let mut store = board_store();
    let geocoder = seeded_geocoder();

    let board = build_order_dashboard(&mut store, &geocoder);

    let first = info(&board.orders, 1);
    assert!(!first.geocode_error);
    let ranked: Vec<_> = first
        .candidates
        .iter()
        .map(|candidate| (candidate.name.as_str(), candidate.distance_km))
        .collect();
    assert_eq!(
        ranked,
        vec![("Star Burger Arbat", 2.00), ("Star Burger Petrovka", 5.00)]
    );
    assert_eq!(first.total_price, 20_000);
    assert_eq!(first.customer, "Ivan Petrov");

    let at_arbat = info(&board.orders, 5);
    assert_eq!(at_arbat.candidates[0].id, RestaurantId(ARBAT));
    assert_eq!(at_arbat.candidates[0].distance_km, 0.0);
}

#[test]
fn board_flags_unresolved_orders_and_unlocated_assignments() {
    let mut store = board_store();
    let geocoder = seeded_geocoder();

    let board = build_order_dashboard(&mut store, &geocoder);

    let unresolved = info(&board.orders, 2);
    assert!(unresolved.geocode_error);
    assert!(unresolved.candidates.is_empty());

    let assigned = info(&board.orders, 3)
        .assigned
        .as_ref()
        .expect("assigned restaurant");
    assert_eq!(assigned.name, "Star Burger Sokol");
    assert_eq!(assigned.distance_km, None);
}

#[test]
fn addresses_shared_by_restaurants_and_orders_are_geocoded_once() {
    let mut store = board_store();
    let geocoder = seeded_geocoder();

    let board = build_order_dashboard(&mut store, &geocoder);

    assert_eq!(geocoder.calls_for(ARBAT_ADDRESS), 1);
    assert_eq!(geocoder.calls_for(UNKNOWN_ADDRESS), 1);
    assert_eq!(geocoder.calls_for(ORDER_ADDRESS), 1);
    assert_eq!(geocoder.calls(), 4);
    assert_eq!(board.geocoder_calls, 4);

    let stats = store.stats();
    assert_eq!(stats.location_creates, 3);
    assert_eq!(stats.restaurant_bulk_updates, 1);
    assert_eq!(stats.order_bulk_updates, 1);
}

#[test]
fn learned_locations_are_reused_by_the_next_pass() {
    let mut store = board_store();
    build_order_dashboard(&mut store, &seeded_geocoder());

    let geocoder = seeded_geocoder();
    let board = build_order_dashboard(&mut store, &geocoder);

    // Only the address that never resolved is looked up again.
    assert_eq!(geocoder.calls(), 1);
    assert_eq!(geocoder.calls_for(UNKNOWN_ADDRESS), 1);
    assert_eq!(info(&board.orders, 1).candidates.len(), 2);
    assert!(store
        .pending_orders()
        .iter()
        .filter(|order| order.address != UNKNOWN_ADDRESS)
        .all(|order| order.location.is_some()));
}

#[test]
fn product_availability_covers_every_restaurant_column() {
    let store = seeded_store();

    let availability = build_product_availability(&store);

    let columns: Vec<_> = availability
        .restaurants
        .iter()
        .map(|restaurant| restaurant.name.as_str())
        .collect();
    assert_eq!(
        columns,
        vec!["Star Burger Arbat", "Star Burger Petrovka", "Star Burger Sokol"]
    );
    let cola = availability
        .rows
        .iter()
        .find(|row| row.product.id.0 == COLA)
        .expect("cola row");
    assert_eq!(cola.availability, vec![false, true, true]);
}
