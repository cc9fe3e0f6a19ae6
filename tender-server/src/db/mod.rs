pub mod manager;
pub mod postgres;
pub mod schema;
pub mod session;

pub use manager::{ConnectionManager, ConnectionState};
pub use postgres::{PgSession, PgSessionFactory};
pub use session::{DbSession, SessionError, SessionFactory, SessionResult};
