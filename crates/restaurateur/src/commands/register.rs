use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context};
use chrono::Utc;
use foodcart_core::intake::{register_order, IntakeError};
use foodcart_core::models::format_price;
use tracing::info;

use super::{load_store, save_store, CommandLine};

fn read_payload(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read payload from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read payload {}", path.display()))
}

pub fn run(cli: &CommandLine, payload: &Path) -> anyhow::Result<()> {
    let raw = read_payload(payload)?;
    let payload: serde_json::Value = serde_json::from_str(&raw).context("payload is not JSON")?;
    let mut store = load_store(&cli.data)?;

    let order = match register_order(&mut store, &payload, Utc::now()) {
        Ok(order) => order,
        Err(IntakeError::Invalid(errors)) => {
            println!("{}", serde_json::to_string_pretty(&errors)?);
            bail!("order rejected: {errors}");
        }
        Err(err) => return Err(err.into()),
    };
    save_store(&store, &cli.data)?;
    info!(order = %order.id, "order registered");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        println!(
            "Order #{} registered for {} ({} RUB)",
            order.id,
            order.customer_name(),
            format_price(order.total_price())
        );
    }
    Ok(())
}
