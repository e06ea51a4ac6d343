use ledger::DatabaseConfig;
use ledger::mining::DEFAULT_ITERATIONS;
use ledger::pool::DEFAULT_ACQUIRE_TIMEOUT;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Where wallet rows live
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub mine_iterations: u64,
    pub pool_acquire_timeout: Duration,
    pub pod_id: Option<String>,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_backend = parse(&lookup, "STORE_BACKEND", StoreBackend::Postgres)?;
        let mine_iterations = parse(&lookup, "MINE_ITERATIONS", DEFAULT_ITERATIONS)?;
        let timeout_ms = parse(
            &lookup,
            "POOL_ACQUIRE_TIMEOUT_MS",
            DEFAULT_ACQUIRE_TIMEOUT.as_millis() as u64,
        )?;

        Ok(AppConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            store_backend,
            mine_iterations,
            pool_acquire_timeout: Duration::from_millis(timeout_ms),
            pod_id: lookup("POD_ID").filter(|id| !id.is_empty()),
            database: DatabaseConfig::from_lookup(&lookup),
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
