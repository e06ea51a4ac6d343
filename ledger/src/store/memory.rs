use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

use super::WalletStore;
use crate::error::LedgerError;
use crate::mutation::Mutation;
use crate::pool::{DEFAULT_ACQUIRE_TIMEOUT, MAX_CONNECTIONS};
use crate::types::Wallet;

/// One of the store's connection slots, returned on drop
pub type Slot<'a> = SemaphorePermit<'a>;

/// In-process wallet store.
///
/// The map lock is held across each read-check-write, which gives the same
/// per-operation atomicity as a row lock. A fixed set of connection slots
/// stands in for the database pool so exhaustion behaves the same way.
#[derive(Clone)]
pub struct MemoryStore {
    wallets: Arc<Mutex<HashMap<String, Wallet>>>,
    slots: Arc<Semaphore>,
    capacity: usize,
    acquire_timeout: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CONNECTIONS as usize, DEFAULT_ACQUIRE_TIMEOUT)
    }

    pub fn with_capacity(capacity: usize, acquire_timeout: Duration) -> Self {
        Self {
            wallets: Arc::new(Mutex::new(HashMap::new())),
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            acquire_timeout,
        }
    }

    /// Borrows a connection slot, giving up after the acquire timeout
    pub async fn acquire(&self) -> Result<Slot<'_>, LedgerError> {
        match tokio::time::timeout(self.acquire_timeout, self.slots.acquire()).await {
            Ok(Ok(slot)) => Ok(slot),
            Ok(Err(_)) => Err(LedgerError::PoolUnavailable("store is closed".to_string())),
            Err(_) => Err(LedgerError::PoolUnavailable(format!(
                "no connection slot freed up within {:?}",
                self.acquire_timeout
            ))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn idle_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Reads a wallet without provisioning it
    pub fn get(&self, wallet_id: &str) -> Option<Wallet> {
        self.wallets.lock().get(wallet_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.wallets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn fetch_or_provision(&self, wallet_id: &str) -> Result<Wallet, LedgerError> {
        let _slot = self.acquire().await?;
        let mut wallets = self.wallets.lock();

        let wallet = wallets.entry(wallet_id.to_string()).or_insert_with(|| {
            tracing::debug!("Provisioning wallet {}", wallet_id);
            Wallet::new(wallet_id)
        });
        Ok(wallet.clone())
    }

    async fn apply(&self, wallet_id: &str, mutation: &Mutation) -> Result<Wallet, LedgerError> {
        let _slot = self.acquire().await?;
        let mut wallets = self.wallets.lock();

        let current = wallets
            .get_mut(wallet_id)
            .ok_or_else(|| LedgerError::NotFound(wallet_id.to_string()))?;
        let next = mutation.apply(current)?;
        *current = next.clone();
        Ok(next)
    }
}
