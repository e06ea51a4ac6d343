use rust_decimal::Decimal;
use std::sync::Arc;

use crate::error::{LedgerError, ValidationError};
use crate::mining::{self, DEFAULT_ITERATIONS};
use crate::mutation::{Mutation, Trade};
use crate::store::WalletStore;
use crate::types::{MINING_REWARD, MineReceipt, TradeReceipt, TradeSide, Wallet};

/// The wallet operations. Each one is a single store transaction.
#[derive(Clone)]
pub struct WalletLedger {
    store: Arc<dyn WalletStore>,
    mine_iterations: u64,
}

impl WalletLedger {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self::with_mine_iterations(store, DEFAULT_ITERATIONS)
    }

    pub fn with_mine_iterations(store: Arc<dyn WalletStore>, mine_iterations: u64) -> Self {
        Self {
            store,
            mine_iterations,
        }
    }

    pub fn mine_iterations(&self) -> u64 {
        self.mine_iterations
    }

    /// Current holdings, provisioning the wallet with defaults on first use
    pub async fn fetch_or_provision(&self, wallet_id: &str) -> Result<Wallet, LedgerError> {
        validate_wallet_id(wallet_id)?;
        self.store.fetch_or_provision(wallet_id).await
    }

    pub async fn buy(
        &self,
        wallet_id: &str,
        amount: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt, LedgerError> {
        self.trade(wallet_id, TradeSide::Buy, amount, price).await
    }

    pub async fn sell(
        &self,
        wallet_id: &str,
        amount: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt, LedgerError> {
        self.trade(wallet_id, TradeSide::Sell, amount, price).await
    }

    async fn trade(
        &self,
        wallet_id: &str,
        side: TradeSide,
        amount: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt, LedgerError> {
        validate_wallet_id(wallet_id)?;
        let trade = Trade::new(side, amount, price)?;

        let wallet = self.store.apply(wallet_id, &Mutation::Trade(trade)).await?;
        tracing::info!(
            "Wallet {} {:?} {} coins @ {} (total {})",
            wallet_id,
            side,
            trade.amount,
            trade.price,
            trade.total
        );

        Ok(TradeReceipt {
            side,
            amount: trade.amount,
            price: trade.price,
            total: trade.total,
            wallet,
        })
    }

    /// Performs the fixed CPU work unit, then credits the mining reward.
    ///
    /// The work runs on the blocking pool before any connection is
    /// borrowed, so no row lock is held while hashing.
    pub async fn mine(&self, wallet_id: &str) -> Result<MineReceipt, LedgerError> {
        validate_wallet_id(wallet_id)?;

        let iterations = self.mine_iterations;
        let digest = tokio::task::spawn_blocking(move || mining::proof_of_work(iterations))
            .await
            .map_err(|e| LedgerError::Mining(e.to_string()))?;

        let wallet = self
            .store
            .apply(
                wallet_id,
                &Mutation::Mine {
                    reward: MINING_REWARD,
                },
            )
            .await?;
        tracing::info!("Wallet {} mined {} coin(s)", wallet_id, MINING_REWARD);

        Ok(MineReceipt {
            reward: MINING_REWARD,
            digest,
            wallet,
        })
    }

    /// Restores the default holdings of an existing wallet
    pub async fn reset(&self, wallet_id: &str) -> Result<Wallet, LedgerError> {
        validate_wallet_id(wallet_id)?;
        let wallet = self.store.apply(wallet_id, &Mutation::Reset).await?;
        tracing::info!("Wallet {} reset to defaults", wallet_id);
        Ok(wallet)
    }
}

fn validate_wallet_id(wallet_id: &str) -> Result<(), ValidationError> {
    if wallet_id.is_empty() {
        return Err(ValidationError::MissingWalletId);
    }
    Ok(())
}
