//! Libris - Library Catalog Manager
//!
//! Interactive CLI over a flat-file library catalog.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris::{cli, config::AppConfig, library::Library, store::JsonStore};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libris={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Libris v{}", env!("CARGO_PKG_VERSION"));

    let store = JsonStore::new(&config.store.books_path, &config.store.users_path);
    let mut library = Library::open(store).context("Failed to open catalog store")?;

    cli::run(&mut library)
}
