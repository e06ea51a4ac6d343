use ledger::{
    ConnectionPool, LivenessRegister, MemoryStore, PgWalletStore, PoolSettings, WalletLedger,
    WalletStore,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod pod;
mod routes;
#[cfg(test)]
mod testing;

use config::{AppConfig, StoreBackend};
use pod::resolve_pod_id;

// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: WalletLedger,
    /// Owned by this process only; each replica has its own
    pub liveness: Arc<LivenessRegister>,
    pub pod_id: Arc<str>,
}

impl AppState {
    pub fn new(ledger: WalletLedger, pod_id: impl Into<Arc<str>>) -> Self {
        Self {
            ledger,
            liveness: Arc::new(LivenessRegister::new()),
            pod_id: pod_id.into(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let pod_id = resolve_pod_id(config.pod_id.as_deref());
    tracing::info!("KubeCoin backend starting on pod {}", pod_id);

    let store = build_store(&config).await;
    let ledger = WalletLedger::with_mine_iterations(store, config.mine_iterations);
    tracing::info!("Mining work unit: {} hashes", ledger.mine_iterations());

    let app = routes::router(AppState::new(ledger, pod_id));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// A store that cannot be reached still yields a running server; its
// requests fail with 503 until the pod is restarted.
async fn build_store(config: &AppConfig) -> Arc<dyn WalletStore> {
    match config.store_backend {
        StoreBackend::Postgres => {
            tracing::info!("Database: {}/{}", config.database.host, config.database.name);
            let settings = PoolSettings {
                acquire_timeout: config.pool_acquire_timeout,
            };
            let pool = ConnectionPool::connect(&config.database, settings).await;
            let store = PgWalletStore::new(pool);
            if store.pool().is_ready() {
                if let Err(e) = store.ensure_schema().await {
                    tracing::error!("Failed to ensure wallets table: {}", e);
                }
            }
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, wallets are lost on restart");
            Arc::new(MemoryStore::with_capacity(
                ledger::pool::MAX_CONNECTIONS as usize,
                config.pool_acquire_timeout,
            ))
        }
    }
}
