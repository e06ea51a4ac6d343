pub mod error;
pub mod health;
pub mod mining;
pub mod mutation;
pub mod pool;
pub mod store;
pub mod types;
pub mod wallet_ledger;

pub use error::{LedgerError, ValidationError};
pub use health::LivenessRegister;
pub use pool::{ConnectionPool, DatabaseConfig, PoolSettings, PoolState};
pub use rust_decimal::Decimal;
pub use store::{MemoryStore, PgWalletStore, WalletStore};
pub use types::{MineReceipt, TradeReceipt, TradeSide, Wallet};
pub use wallet_ledger::WalletLedger;
