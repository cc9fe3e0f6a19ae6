use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;

use tender_model::{DatabaseHealth, HealthResponse};

use crate::db::manager::ConnectionState;
use crate::routes::AppState;

/// `GET /api/health`.
///
/// Always 200 so orchestrators don't restart the container on a database
/// outage; degraded state is reported in the body. When the manager claims
/// `Connected` the handler issues the probe, which on failure flips the
/// manager and starts a background reconnect.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Json<HealthResponse> {
    let mut health = HealthResponse {
        status: "healthy".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: Utc::now(),
        database: match state.manager.state() {
            ConnectionState::Connected => DatabaseHealth::Connected,
            _ => DatabaseHealth::Disconnected,
        },
        database_error: None,
    };

    if health.database == DatabaseHealth::Connected {
        if let Err(err) = Arc::clone(&state.manager).probe().await {
            health.database = DatabaseHealth::Error;
            health.database_error = Some(err.to_string());
        }
    }

    Json(health)
}
