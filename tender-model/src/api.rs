//! Wire types for the query-gateway HTTP contract.
//!
//! Field names are pinned to the JSON the dashboard front end already
//! speaks (`rowCount`, not `row_count`), so every type here renames to
//! camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: Option<String>,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            text: Some(text.into()),
            params,
        }
    }
}

/// Result of one gateway query.
///
/// `row_count` is the number of returned rows for row-returning statements
/// and the affected-row count for plain DML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub rows: Vec<Map<String, Value>>,
    pub row_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDescription>>,
}

/// Column metadata attached to a query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub name: String,
    pub type_name: String,
}

/// Database reachability as reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseHealth {
    Connected,
    Disconnected,
    Error,
}

/// Body of `GET /api/health`. Always served with status 200; degraded
/// database state is reported in the body, never as a failure status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the server process started.
    pub uptime: f64,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseHealth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
}

/// Error body shared by every non-2xx gateway response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}
