pub mod assign;
pub mod orders;
pub mod products;
pub mod register;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use foodcart_core::config::AppConfig;
use foodcart_core::store::InMemoryStore;

#[derive(Parser)]
#[command(name = "restaurateur")]
#[command(about = "Manager tools for the food cart: pending orders, menus and assignments.")]
pub struct CommandLine {
    /// JSON snapshot holding locations, catalog, menus and orders
    #[arg(long, global = true, env = "RESTAURATEUR_DATA", default_value = "foodcart.json")]
    pub data: PathBuf,
    /// JSON config file; geocoder settings are read from the environment otherwise
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pending orders with the restaurants able to cook them, nearest first
    #[command(alias = "o")]
    Orders,
    /// Product availability across restaurants
    #[command(alias = "p")]
    Products,
    /// Register a customer order from a JSON payload
    #[command(alias = "r")]
    Register {
        /// Payload file, or `-` for stdin
        payload: PathBuf,
    },
    /// Hand an order to a restaurant
    #[command(alias = "a")]
    Assign {
        #[arg(long)]
        order: u64,
        #[arg(long)]
        restaurant: u64,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

pub fn load_store(path: &Path) -> anyhow::Result<InMemoryStore> {
    InMemoryStore::load(path).with_context(|| format!("failed to load snapshot {}", path.display()))
}

pub fn save_store(store: &InMemoryStore, path: &Path) -> anyhow::Result<()> {
    store
        .save(path)
        .with_context(|| format!("failed to save snapshot {}", path.display()))
}

/// Config from `--config` when given, from the environment otherwise.
pub fn load_config(cli: &CommandLine) -> anyhow::Result<AppConfig> {
    match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display())),
        None => AppConfig::from_env().context("invalid geocoder environment"),
    }
}
