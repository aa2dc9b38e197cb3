//! TipPool - group betting pool for Stryktipset

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tippool::config::AppConfig;
use tippool::draws::{DrawFeed, SvenskaSpelClient};
use tippool::server::{self, AppState};
use tippool::store::RoomStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!(config = %config.digest(), "Starting TipPool");

    let client = SvenskaSpelClient::new(
        config.draws.base_url.as_str(),
        Duration::from_secs(config.draws.request_timeout_secs),
    )?;
    let feed = Arc::new(DrawFeed::new(
        Arc::new(client),
        Duration::from_secs(config.draws.refresh_secs),
    ));
    tokio::spawn(Arc::clone(&feed).run());

    let state = AppState {
        store: Arc::new(RoomStore::new()),
        draws: feed,
    };
    server::start_server(state, config.server.port).await
}
