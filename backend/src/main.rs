use anyhow::{Context, Result};
use complaint_portal::{api, config::Config, db::repo::Store};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting complaint portal...");
    let config = Config::load()?;

    info!("Connecting to {}", config.database_url);
    let store = Store::connect(
        &config.database_url,
        config.database_max_connections,
        config.database_connect_timeout,
    )
    .await
    .context("Failed to connect to database")?;

    api::server::start_server(&config, store).await
}
