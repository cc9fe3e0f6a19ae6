//! Tender-Track server: a resilient single-session query gateway.
//!
//! The [`db::ConnectionManager`] owns exactly one logical Postgres session
//! and keeps it alive across transient failures; the [`gateway::QueryGateway`]
//! executes parameterized SQL against it behind a fixed HTTP contract.

pub mod config;
pub mod db;
pub mod errors;
pub mod gateway;
pub mod routes;

pub use config::Config;
pub use db::{ConnectionManager, ConnectionState};
pub use gateway::{GatewayError, QueryGateway};
pub use routes::{AppState, create_router};
