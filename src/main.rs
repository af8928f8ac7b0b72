use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quizbank::bridge::store_bridge;
use quizbank::commands::{self, Cli};
use quizbank::database::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let db_path = std::env::var("QUIZBANK_DB").unwrap_or_else(|_| "database.db".into());
    info!(%db_path, "opening store");
    let store = Arc::new(Store::open(&db_path).await?);
    let bridge = Arc::new(store_bridge(store));

    commands::run(cli, bridge).await
}
