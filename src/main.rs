use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parts_finder::config::Config;
use parts_finder::renderer::chromium::ChromiumLauncher;
use parts_finder::search::Orchestrator;
use parts_finder::server::{self, AppState};
use parts_finder::utils::http::create_client;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // Initialize logging
    let filter = EnvFilter::from_default_env().add_directive("parts_finder=info".parse()?);
    if config.logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Parts Finder v{}", env!("CARGO_PKG_VERSION"));

    let client = create_client(&config.fetch)?;
    let launcher = Arc::new(ChromiumLauncher::new(&config.render));
    let orchestrator = Orchestrator::from_config(&config, client, launcher)?;

    info!("Search cascade: {}", orchestrator.strategy_ids().join(" -> "));

    server::serve(Arc::new(AppState::new(config, orchestrator))).await
}
