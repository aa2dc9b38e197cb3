//! HTTP server
//!
//! Serves the room/ticket API and proxies Stryktipset draw data for the
//! frontend.

mod api;
mod types;

pub use api::create_router;
pub use types::*;

use std::sync::Arc;

use crate::draws::DrawFeed;
use crate::store::RoomStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RoomStore>,
    pub draws: Arc<DrawFeed>,
}

/// Start the API server.
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("🎟️ TipPool API starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
