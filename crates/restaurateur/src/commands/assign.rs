use foodcart_core::models::{OrderId, RestaurantId};
use foodcart_core::store::OrderStore;
use tracing::info;

use super::{load_store, save_store, CommandLine};

pub fn run(cli: &CommandLine, order: u64, restaurant: u64) -> anyhow::Result<()> {
    let mut store = load_store(&cli.data)?;
    let order = store.assign_restaurant(OrderId(order), RestaurantId(restaurant))?;
    save_store(&store, &cli.data)?;
    info!(order = %order.id, restaurant, status = %order.status, "restaurant assigned");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        println!("Order #{} is now {}", order.id, order.status);
    }
    Ok(())
}
