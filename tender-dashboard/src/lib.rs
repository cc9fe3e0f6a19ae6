//! Client-side data layer for the Tender-Track dashboard shell.
//!
//! The UI talks to [`store::TimelineStore`], which composes the retry
//! wrapper over the raw [`api::ApiClient`] and owns the in-memory cache of
//! timelines and derived notifications.

pub mod api;
pub mod error;
pub mod mapping;
pub mod retry;
pub mod store;
pub mod vendors;

pub use api::{ApiClient, QueryApi};
pub use error::ClientError;
pub use retry::{RetryPolicy, Retrying};
pub use store::{ScopeSelection, TimelineStore};

use std::sync::Arc;

/// Wire the default stack: retrying client over the gateway at `base_url`.
pub fn build_store(base_url: impl Into<String>) -> TimelineStore {
    let client = Retrying::new(ApiClient::new(base_url));
    TimelineStore::new(Arc::new(client))
}
