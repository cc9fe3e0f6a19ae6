//! Idempotent bootstrap of the `timelines` table.
//!
//! Not migration machinery: one `CREATE TABLE IF NOT EXISTS` run after the
//! session comes up. The `company_id` primary key doubles as the uniqueness
//! guard the dashboard's conditional seed inserts rely on.

use tracing::info;

use crate::db::manager::ConnectionManager;
use crate::db::session::SessionResult;

const CREATE_TIMELINES: &str = "\
CREATE TABLE IF NOT EXISTS timelines (
    company_id TEXT PRIMARY KEY,
    company_name TEXT NOT NULL,
    nda_received_date TIMESTAMPTZ,
    nda_received_completed BOOLEAN NOT NULL DEFAULT FALSE,
    nda_signed_date TIMESTAMPTZ,
    nda_signed_completed BOOLEAN NOT NULL DEFAULT FALSE,
    rfi_sent_date TIMESTAMPTZ,
    rfi_sent_completed BOOLEAN NOT NULL DEFAULT FALSE,
    rfi_due_date TIMESTAMPTZ,
    rfi_due_completed BOOLEAN NOT NULL DEFAULT FALSE,
    offer_received_date TIMESTAMPTZ,
    offer_received_completed BOOLEAN NOT NULL DEFAULT FALSE,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

pub async fn ensure_schema(manager: &ConnectionManager) -> SessionResult<()> {
    manager.execute(CREATE_TIMELINES, &[]).await?;
    info!("timelines table ready");
    Ok(())
}
