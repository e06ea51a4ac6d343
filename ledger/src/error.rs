use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::round_for_display;

/// Input rejected before any store access
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Invalid price")]
    InvalidPrice,
    #[error("Missing wallet id")]
    MissingWalletId,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User not found")]
    NotFound(String),

    #[error(
        "Insufficient balance. Need ${:.2}, have ${:.2}",
        shown(.needed),
        shown(.available)
    )]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error(
        "Insufficient coins. Have {:.2}, tried to sell {:.2}",
        shown(.available),
        shown(.requested)
    )]
    InsufficientCoins {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Database pool is not available: {0}")]
    PoolUnavailable(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Mining task failed: {0}")]
    Mining(String),
}

fn shown(value: &Decimal) -> Decimal {
    round_for_display(*value)
}

impl LedgerError {
    /// Business-rule rejections: the caller can fix the request and retry
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_)
                | LedgerError::NotFound(_)
                | LedgerError::InsufficientFunds { .. }
                | LedgerError::InsufficientCoins { .. }
        )
    }

    /// Failures of the pool, the store or the worker threads
    pub fn is_infrastructure(&self) -> bool {
        !self.is_rejection()
    }
}
