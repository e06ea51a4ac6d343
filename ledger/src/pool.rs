use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;

use crate::error::LedgerError;

pub const MIN_CONNECTIONS: u32 = 1;
pub const MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// A connection lent by the pool. Dropping it hands it back.
pub type Lease = PoolConnection<Postgres>;

/// Store coordinates, read from `DB_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "kubecoin".to_string(),
            user: "postgres".to_string(),
            password: "password".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to the local
    /// development defaults for each missing key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("DB_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid DB_PORT {:?}, using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port,
            name: lookup("DB_NAME").unwrap_or(defaults.name),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on waiting for a free connection, including the
    /// connection attempt made at startup
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolSettings {
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(MIN_CONNECTIONS)
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Whether the pool came up. A store that was unreachable at startup
/// leaves the pool `Unavailable` for the life of the process.
#[derive(Debug, Clone)]
pub enum PoolState {
    Ready(PgPool),
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub ready: bool,
    pub size: u32,
    pub idle: usize,
    pub max: u32,
}

#[derive(Debug, Clone)]
pub struct ConnectionPool {
    state: PoolState,
}

impl ConnectionPool {
    /// Connects to the configured store. Never fails: a connection error is
    /// logged and recorded as `PoolState::Unavailable`, so every later
    /// `acquire` fails fast instead of the process crashing.
    pub async fn connect(config: &DatabaseConfig, settings: PoolSettings) -> Self {
        tracing::info!("Connecting to database {}:{}/{}", config.host, config.port, config.name);
        Self::connect_with(config.connect_options(), settings).await
    }

    pub async fn connect_with(options: PgConnectOptions, settings: PoolSettings) -> Self {
        match settings.pool_options().connect_with(options).await {
            Ok(pool) => {
                tracing::info!(
                    "Database connection pool created ({}..{} connections)",
                    MIN_CONNECTIONS,
                    MAX_CONNECTIONS
                );
                Self {
                    state: PoolState::Ready(pool),
                }
            }
            Err(e) => {
                tracing::error!("Failed to create database connection pool: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: PoolState::Unavailable(reason.into()),
        }
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, PoolState::Ready(_))
    }

    /// Borrows one connection, waiting at most the configured acquire
    /// timeout
    pub async fn acquire(&self) -> Result<Lease, LedgerError> {
        let pool = self.ready_pool()?;
        pool.acquire().await.map_err(map_pool_error)
    }

    /// Borrows one connection and opens a transaction on it. Dropping the
    /// transaction without committing rolls it back and returns the
    /// connection.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, LedgerError> {
        let pool = self.ready_pool()?;
        pool.begin().await.map_err(map_pool_error)
    }

    /// Hands a lease back early. `None` is a no-op.
    pub fn release(&self, lease: Option<Lease>) {
        drop(lease);
    }

    pub fn status(&self) -> PoolStatus {
        match &self.state {
            PoolState::Ready(pool) => PoolStatus {
                ready: true,
                size: pool.size(),
                idle: pool.num_idle(),
                max: MAX_CONNECTIONS,
            },
            PoolState::Unavailable(_) => PoolStatus {
                ready: false,
                size: 0,
                idle: 0,
                max: MAX_CONNECTIONS,
            },
        }
    }

    fn ready_pool(&self) -> Result<&PgPool, LedgerError> {
        match &self.state {
            PoolState::Ready(pool) => Ok(pool),
            PoolState::Unavailable(reason) => Err(LedgerError::PoolUnavailable(reason.clone())),
        }
    }
}

fn map_pool_error(e: sqlx::Error) -> LedgerError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            LedgerError::PoolUnavailable(e.to_string())
        }
        other => LedgerError::Store(other),
    }
}
