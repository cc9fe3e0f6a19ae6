//! In-memory timeline store: the dashboard's read-mostly cache over the
//! `timelines` table.
//!
//! The database stays the single source of truth. Writes go through the
//! store and trigger a full refetch; there is no optimistic local patch.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use log::{error, info};
use serde_json::{Value, json};
use tender_model::{
    CompanyTimeline, Milestone, Notification, QueryResult,
    derive_notifications, sort_timelines,
};

use crate::api::QueryApi;
use crate::error::ClientError;
use crate::mapping::timeline_from_row;
use crate::vendors::{SEED_DUE_WINDOW_DAYS, SEED_VENDORS};

const SELECT_TIMELINES: &str =
    "SELECT * FROM timelines ORDER BY updated_at DESC";

const COUNT_TIMELINES: &str = "SELECT COUNT(*) FROM timelines";

// Conditional insert against the company_id primary key: racing
// first-fetches collapse to a no-op instead of duplicating rows.
const SEED_VENDOR: &str = "\
INSERT INTO timelines (
    company_id, company_name,
    nda_received_completed, nda_signed_completed,
    rfi_sent_completed, rfi_due_completed,
    offer_received_completed,
    rfi_due_date
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8::timestamptz)
ON CONFLICT (company_id) DO NOTHING";

const UPDATE_TIMELINE: &str = "\
UPDATE timelines
   SET nda_received_date = $1::timestamptz,
       nda_received_completed = $2,
       nda_signed_date = $3::timestamptz,
       nda_signed_completed = $4,
       rfi_sent_date = $5::timestamptz,
       rfi_sent_completed = $6,
       rfi_due_date = $7::timestamptz,
       rfi_due_completed = $8,
       offer_received_date = $9::timestamptz,
       offer_received_completed = $10,
       updated_at = NOW()
 WHERE company_id = $11";

const INSERT_VENDOR: &str = "\
INSERT INTO timelines (
    company_id, company_name,
    nda_received_completed, nda_signed_completed,
    rfi_sent_completed, rfi_due_completed,
    offer_received_completed
) VALUES ($1, $2, $3, $4, $5, $6, $7)";

/// Engagement scope flags gating vendor creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeSelection {
    pub media: bool,
    pub ai: bool,
}

impl ScopeSelection {
    pub fn any(self) -> bool {
        self.media || self.ai
    }
}

pub struct TimelineStore {
    api: Arc<dyn QueryApi>,
    timelines: Vec<CompanyTimeline>,
    notifications: Vec<Notification>,
    loading: bool,
    error: Option<String>,
    seeded: bool,
}

impl fmt::Debug for TimelineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineStore")
            .field("timelines", &self.timelines.len())
            .field("notifications", &self.notifications.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl TimelineStore {
    pub fn new(api: Arc<dyn QueryApi>) -> Self {
        Self {
            api,
            timelines: Vec::new(),
            notifications: Vec::new(),
            loading: false,
            error: None,
            seeded: false,
        }
    }

    pub fn timelines(&self) -> &[CompanyTimeline] {
        &self.timelines
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Load all timelines, derive notifications, and publish both lists in
    /// one step, so readers never observe one updated without the other.
    ///
    /// The first fetch of a store's lifetime seeds the known vendor list
    /// if and only if the table is empty. On failure the error is recorded
    /// and the cached lists are cleared.
    pub async fn fetch(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;

        let result = self.load().await;
        self.loading = false;

        match result {
            Ok((timelines, notifications)) => {
                self.timelines = timelines;
                self.notifications = notifications;
                Ok(())
            }
            Err(err) => {
                error!("failed to fetch timelines: {err}");
                self.error = Some(err.to_string());
                self.timelines.clear();
                self.notifications.clear();
                Err(err)
            }
        }
    }

    async fn load(
        &mut self,
    ) -> Result<(Vec<CompanyTimeline>, Vec<Notification>), ClientError>
    {
        if !self.seeded {
            self.seed_if_empty().await?;
            self.seeded = true;
        }

        let result = self.api.query(SELECT_TIMELINES, Vec::new()).await?;
        let mut timelines = result
            .rows
            .iter()
            .map(timeline_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        sort_timelines(&mut timelines);
        let notifications = derive_notifications(&timelines, Utc::now());
        Ok((timelines, notifications))
    }

    async fn seed_if_empty(&self) -> Result<(), ClientError> {
        let count = self.api.query(COUNT_TIMELINES, Vec::new()).await?;
        if scalar_count(&count)? > 0 {
            return Ok(());
        }

        info!("timelines table is empty, seeding known vendors");
        let default_due = (Utc::now()
            + Duration::days(SEED_DUE_WINDOW_DAYS))
        .to_rfc3339();

        for vendor in SEED_VENDORS {
            self.api
                .query(
                    SEED_VENDOR,
                    vec![
                        json!(vendor.company_id),
                        json!(vendor.company_name),
                        json!(false),
                        json!(false),
                        json!(false),
                        json!(false),
                        json!(false),
                        json!(default_due),
                    ],
                )
                .await?;
        }

        Ok(())
    }

    /// Push one timeline's milestones to the table, then refetch
    /// everything. `updated_at` is bumped server-side.
    ///
    /// On failure the store's prior state is left untouched.
    pub async fn update(
        &mut self,
        timeline: &CompanyTimeline,
    ) -> Result<(), ClientError> {
        let params = vec![
            date_param(&timeline.nda_received),
            json!(timeline.nda_received.is_completed),
            date_param(&timeline.nda_signed),
            json!(timeline.nda_signed.is_completed),
            date_param(&timeline.rfi_sent),
            json!(timeline.rfi_sent.is_completed),
            date_param(&timeline.rfi_due),
            json!(timeline.rfi_due.is_completed),
            date_param(&timeline.offer_received),
            json!(timeline.offer_received.is_completed),
            json!(timeline.company_id),
        ];

        if let Err(err) = self.api.query(UPDATE_TIMELINE, params).await {
            error!(
                "failed to update timeline {}: {err}",
                timeline.company_id
            );
            return Err(err);
        }

        self.fetch().await
    }

    /// Create a vendor with all milestones unset, then refetch.
    ///
    /// Validation order is fixed: name, email, scope; the error names the
    /// first failing rule. Contact email and scope gate creation but are
    /// not persisted. Returns the generated `company_id`, a
    /// timestamp-derived string (collisions accepted, creation is
    /// operator-driven).
    pub async fn create(
        &mut self,
        company_name: &str,
        contact_email: &str,
        scope: ScopeSelection,
    ) -> Result<String, ClientError> {
        if company_name.trim().is_empty() {
            return Err(ClientError::validation("Company name is required"));
        }
        if contact_email.trim().is_empty() {
            return Err(ClientError::validation(
                "Contact email is required",
            ));
        }
        if !scope.any() {
            return Err(ClientError::validation(
                "At least one scope must be selected",
            ));
        }

        let company_id = Utc::now().timestamp_millis().to_string();

        self.api
            .query(
                INSERT_VENDOR,
                vec![
                    json!(company_id),
                    json!(company_name),
                    json!(false),
                    json!(false),
                    json!(false),
                    json!(false),
                    json!(false),
                ],
            )
            .await?;

        self.fetch().await?;
        Ok(company_id)
    }
}

fn date_param(milestone: &Milestone) -> Value {
    milestone
        .date
        .map(|date| json!(date.to_rfc3339()))
        .unwrap_or(Value::Null)
}

/// `SELECT COUNT(*)` comes back as a JSON number from this gateway, but as
/// a string from node-postgres-style backends; accept both.
fn scalar_count(result: &QueryResult) -> Result<i64, ClientError> {
    let row = result.rows.first().ok_or_else(|| {
        ClientError::decode("count query returned no rows")
    })?;
    let value = row.get("count").ok_or_else(|| {
        ClientError::decode("count query returned no count column")
    })?;

    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            ClientError::decode(format!("count is not an integer: {n}"))
        }),
        Value::String(s) => s.parse().map_err(|_| {
            ClientError::decode(format!("count is not an integer: {s:?}"))
        }),
        other => Err(ClientError::decode(format!(
            "count has unexpected type: {other}"
        ))),
    }
}
