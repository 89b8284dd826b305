use foodcart_core::dashboard::build_product_availability;

use super::{load_store, CommandLine};
use crate::render;

pub fn run(cli: &CommandLine) -> anyhow::Result<()> {
    let store = load_store(&cli.data)?;
    let availability = build_product_availability(&store);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&availability)?);
    } else {
        print!("{}", render::availability_table(&availability));
    }
    Ok(())
}
