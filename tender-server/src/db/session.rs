use async_trait::async_trait;
use serde_json::Value;
use tender_model::QueryResult;
use thiserror::Error;

/// Errors surfaced by a database session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Transport or auth failure while establishing the session.
    #[error("connection error: {0}")]
    Connect(String),

    /// Execution-time failure on an established session.
    ///
    /// `reset` marks errors where the connection itself was severed rather
    /// than the query being semantically wrong; see
    /// [`PgSession`](crate::db::postgres::PgSession) for the classification.
    #[error("{message}")]
    Query { message: String, reset: bool },

    /// The manager holds no session at all.
    #[error("no database session")]
    NoSession,
}

impl SessionError {
    pub fn connect(err: impl std::fmt::Display) -> Self {
        SessionError::Connect(err.to_string())
    }

    /// Whether this error means the connection was severed.
    pub fn is_reset(&self) -> bool {
        matches!(self, SessionError::Query { reset: true, .. })
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// One logical database session.
///
/// The connection manager owns at most one of these at a time; the gateway
/// reaches it only through the manager.
#[async_trait]
pub trait DbSession: Send {
    /// Execute parameterized SQL text, binding `params` positionally.
    async fn execute(
        &mut self,
        text: &str,
        params: &[Value],
    ) -> SessionResult<QueryResult>;

    /// Lightweight liveness check against the session.
    async fn probe(&mut self) -> SessionResult<()>;

    /// Release the session. Called once; the session is dropped afterwards.
    async fn close(&mut self) -> SessionResult<()>;
}

/// Opens sessions for the connection manager.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> SessionResult<Box<dyn DbSession>>;
}
