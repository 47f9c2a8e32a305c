//! Database collaborators for the Raxel backend.
//!
//! - [`DatabaseConnection`] -- the connect/disconnect contract the server
//!   depends on before it serves traffic.
//! - [`PostgresConnection`] -- the PostgreSQL engine backed by a `sqlx` pool.
//! - [`Transaction`] -- a labelled transaction that logs each step.

mod connection;
mod error;
mod postgres;
mod transaction;

pub use connection::DatabaseConnection;
pub use error::ConnectionError;
pub use postgres::PostgresConnection;
pub use transaction::Transaction;

pub type DbPool = sqlx::PgPool;
