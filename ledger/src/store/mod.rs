use async_trait::async_trait;

use crate::error::LedgerError;
use crate::mutation::Mutation;
use crate::types::Wallet;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgWalletStore;

/// Transactional access to wallet rows.
///
/// Every method is one atomic unit against the store: it borrows a
/// connection, does its work, and returns the connection on every exit
/// path. Operations on the same wallet are serialized on the row.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Returns the wallet, inserting it with default holdings if it has
    /// never been seen. Concurrent first fetches of one id create one row.
    async fn fetch_or_provision(&self, wallet_id: &str) -> Result<Wallet, LedgerError>;

    /// Reads the row under lock, runs `mutation` against it and writes the
    /// result, all in one transaction. Unknown ids are `NotFound`.
    async fn apply(&self, wallet_id: &str, mutation: &Mutation) -> Result<Wallet, LedgerError>;
}
