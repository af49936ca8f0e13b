//! Scoped connection acquisition
//!
//! Per-call mode opens a dedicated `PgConnection` for each operation and
//! closes it afterwards. Pooled mode checks a connection out of a lazily
//! connected `PgPool`. Either way the caller holds a [`ScopedConnection`]
//! whose drop releases the connection, so early returns cannot leak it.

use std::ops::{Deref, DerefMut};

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool, Postgres};
use tracing::debug;

use crate::config::{ConfigError, DbConfig};

/// How each operation obtains its connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// Open and close a dedicated connection per operation
    #[default]
    PerCall,
    /// Check out of a shared pool
    Pooled { max_connections: u32 },
}

/// Hands out one scoped connection per operation.
pub struct Connector {
    options: PgConnectOptions,
    pool: Option<PgPool>,
}

impl Connector {
    /// Create a connector. Pooled mode must be called inside a tokio runtime.
    ///
    /// No connection is made until the first [`acquire`](Self::acquire).
    pub fn new(options: PgConnectOptions, mode: ConnectionMode) -> Self {
        let pool = match mode {
            ConnectionMode::PerCall => None,
            ConnectionMode::Pooled { max_connections } => Some(
                PgPoolOptions::new()
                    .max_connections(max_connections)
                    .connect_lazy_with(options.clone()),
            ),
        };

        Self { options, pool }
    }

    pub fn from_config(config: &DbConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.connect_options()?, config.mode))
    }

    pub fn mode(&self) -> ConnectionMode {
        match &self.pool {
            Some(pool) => ConnectionMode::Pooled {
                max_connections: pool.options().get_max_connections(),
            },
            None => ConnectionMode::PerCall,
        }
    }

    /// Obtain a connection for exactly one operation
    pub async fn acquire(&self) -> Result<ScopedConnection, sqlx::Error> {
        match &self.pool {
            Some(pool) => pool.acquire().await.map(ScopedConnection::Pooled),
            None => PgConnection::connect_with(&self.options)
                .await
                .map(ScopedConnection::Dedicated),
        }
    }
}

/// A connection held for the duration of one operation
pub enum ScopedConnection {
    Dedicated(PgConnection),
    Pooled(PoolConnection<Postgres>),
}

impl ScopedConnection {
    /// Release the connection.
    ///
    /// Dedicated connections get a graceful close; pooled ones go back to
    /// the pool. Dropping without calling this still releases the socket.
    pub async fn release(self) {
        match self {
            Self::Dedicated(conn) => {
                if let Err(e) = conn.close().await {
                    debug!("connection close failed: {}", e);
                }
            }
            Self::Pooled(conn) => drop(conn),
        }
    }
}

impl Deref for ScopedConnection {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        match self {
            Self::Dedicated(conn) => conn,
            Self::Pooled(conn) => &**conn,
        }
    }
}

impl DerefMut for ScopedConnection {
    fn deref_mut(&mut self) -> &mut PgConnection {
        match self {
            Self::Dedicated(conn) => conn,
            Self::Pooled(conn) => &mut **conn,
        }
    }
}
