//! Raw gateway rows into [`CompanyTimeline`] values.
//!
//! The gateway serves `timelines` rows as JSON records with snake_case
//! column names and RFC 3339 timestamps.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tender_model::{CompanyTimeline, Milestone};

use crate::error::ClientError;

pub fn timeline_from_row(
    row: &Map<String, Value>,
) -> Result<CompanyTimeline, ClientError> {
    Ok(CompanyTimeline {
        company_id: required_string(row, "company_id")?,
        company_name: required_string(row, "company_name")?,
        nda_received: milestone(row, "nda_received")?,
        nda_signed: milestone(row, "nda_signed")?,
        rfi_sent: milestone(row, "rfi_sent")?,
        rfi_due: milestone(row, "rfi_due")?,
        offer_received: milestone(row, "offer_received")?,
        updated_at: required_timestamp(row, "updated_at")?,
    })
}

fn milestone(
    row: &Map<String, Value>,
    prefix: &str,
) -> Result<Milestone, ClientError> {
    let date = match row.get(&format!("{prefix}_date")) {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_timestamp(value, prefix)?),
    };

    let is_completed = row
        .get(&format!("{prefix}_completed"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(Milestone { date, is_completed })
}

fn required_string(
    row: &Map<String, Value>,
    key: &str,
) -> Result<String, ClientError> {
    row.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ClientError::decode(format!("row is missing column {key:?}"))
        })
}

fn required_timestamp(
    row: &Map<String, Value>,
    key: &str,
) -> Result<DateTime<Utc>, ClientError> {
    let value = row.get(key).ok_or_else(|| {
        ClientError::decode(format!("row is missing column {key:?}"))
    })?;
    parse_timestamp(value, key)
}

fn parse_timestamp(
    value: &Value,
    field: &str,
) -> Result<DateTime<Utc>, ClientError> {
    let text = value.as_str().ok_or_else(|| {
        ClientError::decode(format!("{field}: expected a timestamp string"))
    })?;

    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|err| {
            ClientError::decode(format!("{field}: {err}: {text:?}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> Map<String, Value> {
        json!({
            "company_id": "northlight-media",
            "company_name": "Northlight Media",
            "nda_received_date": "2026-07-01T09:00:00+00:00",
            "nda_received_completed": true,
            "nda_signed_date": null,
            "nda_signed_completed": false,
            "rfi_sent_date": null,
            "rfi_sent_completed": false,
            "rfi_due_date": "2026-08-15T00:00:00+00:00",
            "rfi_due_completed": false,
            "offer_received_date": null,
            "offer_received_completed": false,
            "updated_at": "2026-07-02T10:30:00+00:00",
        })
        .as_object()
        .cloned()
        .expect("sample row is an object")
    }

    #[test]
    fn maps_a_full_row() {
        let timeline =
            timeline_from_row(&sample_row()).expect("row should map");

        assert_eq!(timeline.company_id, "northlight-media");
        assert!(timeline.nda_received.is_completed);
        assert!(timeline.nda_received.date.is_some());
        assert!(timeline.nda_signed.date.is_none());
        assert!(!timeline.rfi_due.is_completed);
        assert_eq!(
            timeline.updated_at.to_rfc3339(),
            "2026-07-02T10:30:00+00:00"
        );
    }

    #[test]
    fn missing_identity_column_is_a_decode_error() {
        let mut row = sample_row();
        row.remove("company_id");

        let err = timeline_from_row(&row).expect_err("should fail");
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().contains("company_id"));
    }

    #[test]
    fn malformed_timestamp_is_a_decode_error() {
        let mut row = sample_row();
        row.insert("updated_at".into(), json!("not-a-date"));

        let err = timeline_from_row(&row).expect_err("should fail");
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
