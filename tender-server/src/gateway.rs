//! Query gateway: the stateless executor behind `POST /api/query`.

use std::sync::Arc;

use serde_json::Value;
use tender_model::QueryResult;
use thiserror::Error;
use tracing::error;

use crate::db::manager::{ConnectionManager, ConnectionState};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Database not connected")]
    ServiceUnavailable,

    #[error("Query text is required")]
    BadRequest,

    #[error("{0}")]
    QueryFailed(String),
}

/// Executes parameterized SQL text against the session owned by the
/// injected [`ConnectionManager`].
///
/// Every call may trigger a background reconnection attempt; callers must
/// not assume the next call sees a recovered connection. The client retry
/// wrapper exists to absorb exactly that window.
#[derive(Debug, Clone)]
pub struct QueryGateway {
    manager: Arc<ConnectionManager>,
}

impl QueryGateway {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    pub async fn execute(
        &self,
        text: &str,
        params: &[Value],
    ) -> Result<QueryResult, GatewayError> {
        if self.manager.state() != ConnectionState::Connected {
            return Err(GatewayError::ServiceUnavailable);
        }

        if text.is_empty() {
            return Err(GatewayError::BadRequest);
        }

        match self.manager.execute(text, params).await {
            Ok(result) => Ok(result),
            Err(err) => {
                error!(error = %err, "query error");
                if err.is_reset() {
                    self.manager.mark_disconnected();
                    Arc::clone(&self.manager).spawn_reconnect();
                }
                Err(GatewayError::QueryFailed(err.to_string()))
            }
        }
    }
}
