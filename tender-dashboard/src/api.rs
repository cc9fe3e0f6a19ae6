//! HTTP client for the query-gateway contract.

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde_json::Value;
use tender_model::{ErrorBody, QueryRequest, QueryResult};

use crate::error::ClientError;

/// The one operation the data layer performs against the gateway.
///
/// The store talks to this trait object so tests can substitute a double,
/// and so the retry wrapper composes over the raw client transparently.
#[async_trait]
pub trait QueryApi: Send + Sync {
    async fn query(
        &self,
        text: &str,
        params: Vec<Value>,
    ) -> Result<QueryResult, ClientError>;
}

/// Raw client for `POST /api/query`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into();
        info!("[ApiClient] creating API client with base URL: {base_url}");

        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_url(&self) -> String {
        format!("{}/api/query", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl QueryApi for ApiClient {
    async fn query(
        &self,
        text: &str,
        params: Vec<Value>,
    ) -> Result<QueryResult, ClientError> {
        let request = QueryRequest::new(text, params);
        let response = self
            .client
            .post(self.query_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Pull the gateway's message out of the error body when there
            // is one; fall back to the bare status otherwise.
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => {
                    format!("Query failed with status {}", status.as_u16())
                }
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<QueryResult>().await?)
    }
}
