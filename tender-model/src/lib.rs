//! Core data model definitions shared across Tender-Track crates.
#![allow(missing_docs)]

pub use ::chrono;

#[cfg(feature = "serde")]
pub mod api;
pub mod milestone;
pub mod notification;
pub mod notify;
pub mod sort;
pub mod timeline;

// Intentionally curated re-exports for downstream consumers.
#[cfg(feature = "serde")]
pub use api::{
    DatabaseHealth, ErrorBody, FieldDescription, HealthResponse,
    QueryRequest, QueryResult,
};
pub use milestone::{Milestone, MilestoneKind};
pub use notification::{Notification, NotificationKind, Severity};
pub use notify::{UPCOMING_WINDOW_DAYS, derive_notifications};
pub use sort::sort_timelines;
pub use timeline::CompanyTimeline;
