//! studentctl-db: PostgreSQL storage gateway
//!
//! # Design Principles
//!
//! - One scoped connection per operation, released on every exit path
//! - One parameterized statement per operation, no transactions
//! - Rely on the primary key for uniqueness, no check-then-insert
//! - Failures come back as typed [`StoreError`](studentctl_core::StoreError) kinds

pub mod config;
pub mod connection;
mod error;
pub mod repo;
pub mod schema;

pub use config::{load_dotenv, ConfigError, DbConfig};
pub use connection::{ConnectionMode, Connector, ScopedConnection};
pub use repo::StudentRepo;
pub use schema::ensure_schema;
