#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tender_dashboard::api::QueryApi;
use tender_dashboard::error::ClientError;
use tender_model::QueryResult;

/// Fake gateway answering through a handler over the SQL text; every call
/// is recorded for later inspection.
pub struct ScriptedApi {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    handler: Box<
        dyn Fn(&str, &[Value]) -> Result<QueryResult, ClientError>
            + Send
            + Sync,
    >,
}

impl ScriptedApi {
    pub fn new(
        handler: impl Fn(&str, &[Value]) -> Result<QueryResult, ClientError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().expect("calls poisoned").clone()
    }
}

#[async_trait]
impl QueryApi for ScriptedApi {
    async fn query(
        &self,
        text: &str,
        params: Vec<Value>,
    ) -> Result<QueryResult, ClientError> {
        self.calls
            .lock()
            .expect("calls poisoned")
            .push((text.to_string(), params.clone()));
        (self.handler)(text, &params)
    }
}

/// Fake gateway serving a fixed queue of responses; once the queue runs
/// dry every call succeeds with an empty result.
pub struct QueueApi {
    responses: Mutex<VecDeque<Result<QueryResult, ClientError>>>,
    pub calls: Mutex<u32>,
}

impl QueueApi {
    pub fn new(
        responses: impl IntoIterator<Item = Result<QueryResult, ClientError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().expect("calls poisoned")
    }
}

#[async_trait]
impl QueryApi for QueueApi {
    async fn query(
        &self,
        _text: &str,
        _params: Vec<Value>,
    ) -> Result<QueryResult, ClientError> {
        *self.calls.lock().expect("calls poisoned") += 1;
        self.responses
            .lock()
            .expect("responses poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(empty_result()))
    }
}

pub fn empty_result() -> QueryResult {
    QueryResult {
        rows: Vec::new(),
        row_count: 0,
        fields: None,
    }
}

pub fn dml_result(row_count: u64) -> QueryResult {
    QueryResult {
        rows: Vec::new(),
        row_count,
        fields: None,
    }
}

pub fn count_result(count: i64) -> QueryResult {
    let mut row = Map::new();
    row.insert("count".to_string(), json!(count));
    QueryResult {
        rows: vec![row],
        row_count: 1,
        fields: None,
    }
}

pub fn rows_result(rows: Vec<Map<String, Value>>) -> QueryResult {
    let row_count = rows.len() as u64;
    QueryResult {
        rows,
        row_count,
        fields: None,
    }
}

/// A bare `timelines` row: all milestones unset, nothing completed.
pub fn timeline_row(
    id: &str,
    name: &str,
    updated_at: &str,
) -> Map<String, Value> {
    json!({
        "company_id": id,
        "company_name": name,
        "nda_received_date": null,
        "nda_received_completed": false,
        "nda_signed_date": null,
        "nda_signed_completed": false,
        "rfi_sent_date": null,
        "rfi_sent_completed": false,
        "rfi_due_date": null,
        "rfi_due_completed": false,
        "offer_received_date": null,
        "offer_received_completed": false,
        "updated_at": updated_at,
    })
    .as_object()
    .cloned()
    .expect("timeline row is an object")
}

pub fn service_unavailable() -> ClientError {
    ClientError::Api {
        status: 503,
        message: "Database not connected".to_string(),
    }
}

pub fn bad_request() -> ClientError {
    ClientError::Api {
        status: 400,
        message: "Query text is required".to_string(),
    }
}
