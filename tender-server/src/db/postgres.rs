//! Postgres-backed [`DbSession`] over a single `PgConnection`.
//!
//! The manager owns exactly one logical session, so this deliberately wraps
//! one connection rather than a pool; the connection serializes its own
//! command queue.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures_util::TryStreamExt;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection, PgRow};
use sqlx::query::Query;
use sqlx::types::BigDecimal;
use sqlx::{Column, ConnectOptions, Either, Postgres, Row, TypeInfo};
use tender_model::{FieldDescription, QueryResult};

use crate::config::DatabaseConfig;
use crate::db::session::{
    DbSession, SessionError, SessionFactory, SessionResult,
};

/// Transport-level timeout applied to both session establishment and each
/// query; there is no per-request cancellation above this.
pub const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Postgres code for `admin_shutdown`, the server-administrative kill of a
/// live backend.
const PG_ADMIN_SHUTDOWN: &str = "57P01";

pub struct PgSessionFactory {
    options: PgConnectOptions,
}

impl fmt::Debug for PgSessionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgSessionFactory").finish_non_exhaustive()
    }
}

impl PgSessionFactory {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password);

        Self { options }
    }
}

#[async_trait]
impl SessionFactory for PgSessionFactory {
    async fn open(&self) -> SessionResult<Box<dyn DbSession>> {
        let conn =
            tokio::time::timeout(TRANSPORT_TIMEOUT, self.options.connect())
                .await
                .map_err(|_| {
                    SessionError::Connect(format!(
                        "connection attempt timed out after {}s",
                        TRANSPORT_TIMEOUT.as_secs()
                    ))
                })?
                .map_err(SessionError::connect)?;

        Ok(Box::new(PgSession { conn: Some(conn) }))
    }
}

pub struct PgSession {
    /// `None` once closed; `close` consumes the connection.
    conn: Option<PgConnection>,
}

impl fmt::Debug for PgSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgSession")
            .field("open", &self.conn.is_some())
            .finish()
    }
}

#[async_trait]
impl DbSession for PgSession {
    async fn execute(
        &mut self,
        text: &str,
        params: &[Value],
    ) -> SessionResult<QueryResult> {
        let conn = self.conn.as_mut().ok_or(SessionError::NoSession)?;

        let mut query = sqlx::query(text);
        for param in params {
            query = bind_param(query, param);
        }

        let drain = async {
            let mut rows: Vec<Map<String, Value>> = Vec::new();
            let mut fields: Option<Vec<FieldDescription>> = None;
            let mut rows_affected = 0u64;

            let mut stream = query.fetch_many(conn);
            while let Some(step) = stream.try_next().await.map_err(classify)?
            {
                match step {
                    Either::Left(done) => {
                        rows_affected += done.rows_affected();
                    }
                    Either::Right(row) => {
                        if fields.is_none() {
                            fields = Some(describe_fields(&row));
                        }
                        rows.push(row_to_json(&row)?);
                    }
                }
            }

            // node-postgres semantics: the row count for row-returning
            // statements, the affected-row count for plain DML.
            let row_count = if rows.is_empty() {
                rows_affected
            } else {
                rows.len() as u64
            };

            Ok(QueryResult {
                rows,
                row_count,
                fields,
            })
        };

        tokio::time::timeout(TRANSPORT_TIMEOUT, drain)
            .await
            .map_err(|_| SessionError::Query {
                message: format!(
                    "query timed out after {}s",
                    TRANSPORT_TIMEOUT.as_secs()
                ),
                reset: false,
            })?
    }

    async fn probe(&mut self) -> SessionResult<()> {
        let conn = self.conn.as_mut().ok_or(SessionError::NoSession)?;
        sqlx::query("SELECT 1")
            .execute(conn)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn close(&mut self) -> SessionResult<()> {
        match self.conn.take() {
            Some(conn) => {
                sqlx::Connection::close(conn).await.map_err(|err| {
                    SessionError::Query {
                        message: err.to_string(),
                        reset: false,
                    }
                })
            }
            None => Ok(()),
        }
    }
}

/// Classify an execution error, marking reset-class failures: io-level
/// resets and the Postgres `57P01` administrative shutdown.
fn classify(err: sqlx::Error) -> SessionError {
    let reset = match &err {
        sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some(PG_ADMIN_SHUTDOWN)
        }
        _ => false,
    };

    SessionError::Query {
        message: err.to_string(),
        reset,
    }
}

/// Bind one JSON scalar positionally. Strings carrying dates rely on
/// explicit `::timestamptz` casts in the SQL text; arrays and objects go
/// over as `jsonb`.
fn bind_param<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => query.bind(s.as_str()),
        other => query.bind(other.clone()),
    }
}

fn describe_fields(row: &PgRow) -> Vec<FieldDescription> {
    row.columns()
        .iter()
        .map(|column| FieldDescription {
            name: column.name().to_string(),
            type_name: column.type_info().name().to_string(),
        })
        .collect()
}

fn row_to_json(row: &PgRow) -> SessionResult<Map<String, Value>> {
    let mut record = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        record.insert(column.name().to_string(), decode_column(row, index)?);
    }
    Ok(record)
}

fn decode_column(row: &PgRow, index: usize) -> SessionResult<Value> {
    let type_name = row.columns()[index].type_info().name();

    let value = match type_name {
        "BOOL" => json(row.try_get::<Option<bool>, _>(index)?, Value::from),
        "INT2" => json(row.try_get::<Option<i16>, _>(index)?, Value::from),
        "INT4" => json(row.try_get::<Option<i32>, _>(index)?, Value::from),
        "INT8" => json(row.try_get::<Option<i64>, _>(index)?, Value::from),
        "FLOAT4" => json(row.try_get::<Option<f32>, _>(index)?, Value::from),
        "FLOAT8" => json(row.try_get::<Option<f64>, _>(index)?, Value::from),
        // NUMERIC is decoded to a string, as node-postgres serves it.
        "NUMERIC" => {
            json(row.try_get::<Option<BigDecimal>, _>(index)?, |d| {
                Value::String(d.to_string())
            })
        }
        "TIMESTAMPTZ" => {
            json(row.try_get::<Option<DateTime<Utc>>, _>(index)?, |t| {
                Value::String(t.to_rfc3339())
            })
        }
        "TIMESTAMP" => {
            json(row.try_get::<Option<NaiveDateTime>, _>(index)?, |t| {
                Value::String(t.to_string())
            })
        }
        "DATE" => json(row.try_get::<Option<NaiveDate>, _>(index)?, |d| {
            Value::String(d.to_string())
        }),
        "TIME" => json(row.try_get::<Option<NaiveTime>, _>(index)?, |t| {
            Value::String(t.to_string())
        }),
        "JSON" | "JSONB" => {
            json(row.try_get::<Option<Value>, _>(index)?, |v| v)
        }
        _ => json(row.try_get::<Option<String>, _>(index)?, Value::String),
    };

    Ok(value)
}

fn json<T>(value: Option<T>, into: impl FnOnce(T) -> Value) -> Value {
    value.map(into).unwrap_or(Value::Null)
}

impl From<sqlx::Error> for SessionError {
    fn from(err: sqlx::Error) -> Self {
        classify(err)
    }
}
