use anyhow::Context;
use foodcart_core::dashboard::build_order_dashboard;
use foodcart_core::geocoder::build_geocoder;
use tracing::info;

use super::{load_config, load_store, save_store, CommandLine};
use crate::render;

/// Build the orders board and keep whatever locations were learned on the way.
pub fn run(cli: &CommandLine) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let mut store = load_store(&cli.data)?;
    let geocoder = build_geocoder(&config.geocoder).context("failed to set up the geocoder")?;

    let dashboard = build_order_dashboard(&mut store, geocoder.as_ref());
    save_store(&store, &cli.data)?;
    info!(stats = ?store.stats(), "snapshot updated");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", render::orders_table(&dashboard.orders));
    }
    Ok(())
}
