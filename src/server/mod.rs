//! HTTP API server for the embedding store.

pub mod routes;

use crate::metrics::MetricsCollector;
use crate::store::VectorStore;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared application state for the HTTP server.
///
/// The store itself is lock-free; this is where inserts get exclusive access
/// and searches share it.
pub struct AppState {
    pub store: RwLock<VectorStore>,
    pub metrics: RwLock<MetricsCollector>,
}

impl AppState {
    pub fn new(store: VectorStore) -> Self {
        Self {
            store: RwLock::new(store),
            metrics: RwLock::new(MetricsCollector::new()),
        }
    }
}

/// Start the HTTP server around an empty store of the given dimension.
pub async fn start(addr: &str, dimension: usize) -> anyhow::Result<()> {
    let store = VectorStore::new(dimension)?;
    let state = Arc::new(AppState::new(store));

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, dimension, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
