pub mod health;
pub mod query;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::db::manager::ConnectionManager;
use crate::gateway::QueryGateway;

#[derive(Debug, Clone)]
pub struct AppState {
    pub manager: Arc<ConnectionManager>,
    pub gateway: Arc<QueryGateway>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        let gateway = Arc::new(QueryGateway::new(Arc::clone(&manager)));
        Self {
            manager,
            gateway,
            started_at: Instant::now(),
        }
    }
}

/// The full application router: the two API routes, then the prebuilt
/// static tree with unmatched paths falling back to the single entry
/// document (SPA routing).
pub fn create_router(state: AppState, static_root: &Path) -> Router {
    let assets = ServeDir::new(static_root).not_found_service(
        ServeFile::new(static_root.join("index.html")),
    );

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/query", post(query::query_handler))
        .with_state(state)
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}
