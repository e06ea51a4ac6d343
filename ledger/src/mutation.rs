use rust_decimal::Decimal;

use crate::error::{LedgerError, ValidationError};
use crate::types::{
    DEFAULT_BALANCE, DEFAULT_COINS, HOLDING_LIMIT, TradeSide, Wallet, fits_input_scale,
};

/// A validated trade request.
///
/// Both quantities are strictly positive, carry at most `INPUT_SCALE`
/// places and stay below `HOLDING_LIMIT`, as does their product. Under
/// those bounds every sum and product the ledger forms is exact and fits
/// the stored column without rounding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Trade {
    pub side: TradeSide,
    pub amount: Decimal,
    pub price: Decimal,
    pub total: Decimal,
}

impl Trade {
    pub fn new(side: TradeSide, amount: Decimal, price: Decimal) -> Result<Self, ValidationError> {
        if !within_bounds(amount) {
            return Err(ValidationError::InvalidAmount);
        }
        if !within_bounds(price) {
            return Err(ValidationError::InvalidPrice);
        }
        let total = amount
            .checked_mul(price)
            .filter(|total| *total < HOLDING_LIMIT)
            .ok_or(ValidationError::InvalidAmount)?;

        Ok(Trade {
            side,
            amount,
            price,
            total,
        })
    }
}

/// The write half of a ledger operation.
///
/// `apply` is the in-transaction precondition check plus the computed
/// post-state. Stores call it with the row they read under lock and persist
/// whatever it returns; an `Err` aborts the transaction untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mutation {
    Trade(Trade),
    Mine { reward: Decimal },
    Reset,
}

impl Mutation {
    pub fn apply(&self, wallet: &Wallet) -> Result<Wallet, LedgerError> {
        let (balance, coins) = match *self {
            Mutation::Trade(trade) => match trade.side {
                TradeSide::Buy => {
                    if wallet.balance < trade.total {
                        return Err(LedgerError::InsufficientFunds {
                            needed: trade.total,
                            available: wallet.balance,
                        });
                    }
                    (
                        wallet.balance - trade.total,
                        checked_add(wallet.coins, trade.amount)?,
                    )
                }
                TradeSide::Sell => {
                    if wallet.coins < trade.amount {
                        return Err(LedgerError::InsufficientCoins {
                            available: wallet.coins,
                            requested: trade.amount,
                        });
                    }
                    (
                        checked_add(wallet.balance, trade.total)?,
                        wallet.coins - trade.amount,
                    )
                }
            },
            Mutation::Mine { reward } => (wallet.balance, checked_add(wallet.coins, reward)?),
            Mutation::Reset => (DEFAULT_BALANCE, DEFAULT_COINS),
        };

        Ok(Wallet {
            id: wallet.id.clone(),
            balance,
            coins,
        })
    }
}

fn within_bounds(value: Decimal) -> bool {
    value > Decimal::ZERO && value < HOLDING_LIMIT && fits_input_scale(value)
}

// Credits that would reach the holding limit are rejected, not stored
fn checked_add(current: Decimal, delta: Decimal) -> Result<Decimal, LedgerError> {
    current
        .checked_add(delta)
        .filter(|sum| *sum < HOLDING_LIMIT)
        .ok_or(LedgerError::Validation(ValidationError::InvalidAmount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn wallet(balance: &str, coins: &str) -> Wallet {
        Wallet {
            id: "w".to_string(),
            balance: dec(balance),
            coins: dec(coins),
        }
    }

    #[test]
    fn test_trade_validation() {
        assert_eq!(
            Trade::new(TradeSide::Buy, dec("0"), dec("10")),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            Trade::new(TradeSide::Sell, dec("-1"), dec("10")),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            Trade::new(TradeSide::Buy, dec("1"), dec("0")),
            Err(ValidationError::InvalidPrice)
        );
        // Amount is checked first
        assert_eq!(
            Trade::new(TradeSide::Buy, dec("0"), dec("-3")),
            Err(ValidationError::InvalidAmount)
        );

        let trade = Trade::new(TradeSide::Buy, dec("2.5"), dec("4")).unwrap();
        assert_eq!(trade.total, dec("10"));
    }

    #[test]
    fn test_trade_rejects_finer_than_input_scale() {
        assert_eq!(
            Trade::new(TradeSide::Buy, dec("0.000000005"), dec("1")),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            Trade::new(TradeSide::Sell, dec("1"), dec("9.999999999")),
            Err(ValidationError::InvalidPrice)
        );

        // Finest accepted inputs multiply exactly
        let trade = Trade::new(TradeSide::Buy, dec("0.12345678"), dec("9.99999999")).unwrap();
        assert_eq!(trade.total, dec("1.2345677987654322"));
    }

    #[test]
    fn test_trade_rejects_values_at_holding_limit() {
        assert_eq!(
            Trade::new(TradeSide::Sell, dec("1"), dec("10000000000000")),
            Err(ValidationError::InvalidPrice)
        );
        assert_eq!(
            Trade::new(TradeSide::Buy, dec("1000000000000"), dec("1")),
            Err(ValidationError::InvalidAmount)
        );
        // Product reaching the limit
        assert_eq!(
            Trade::new(TradeSide::Sell, dec("1000000"), dec("1000000")),
            Err(ValidationError::InvalidAmount)
        );
    }

    #[test]
    fn test_sell_past_holding_limit_is_rejected() {
        let trade = Trade::new(TradeSide::Sell, dec("1"), dec("2")).unwrap();
        let err = Mutation::Trade(trade)
            .apply(&wallet("999999999999", "1"))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::InvalidAmount)
        ));

        let next = Mutation::Trade(trade)
            .apply(&wallet("999999999997", "1"))
            .unwrap();
        assert_eq!(next.balance, dec("999999999999"));
    }

    #[test]
    fn test_buy_moves_balance_into_coins() {
        let trade = Trade::new(TradeSide::Buy, dec("3"), dec("9.99")).unwrap();
        let next = Mutation::Trade(trade).apply(&wallet("1000", "0")).unwrap();
        assert_eq!(next.balance, dec("970.03"));
        assert_eq!(next.coins, dec("3"));
    }

    #[test]
    fn test_buy_exact_balance_is_allowed() {
        let trade = Trade::new(TradeSide::Buy, dec("100"), dec("10")).unwrap();
        let next = Mutation::Trade(trade).apply(&wallet("1000", "0")).unwrap();
        assert_eq!(next.balance, Decimal::ZERO);
        assert!(next.is_solvent());
    }

    #[test]
    fn test_buy_insufficient_funds() {
        let trade = Trade::new(TradeSide::Buy, dec("101"), dec("10")).unwrap();
        let err = Mutation::Trade(trade)
            .apply(&wallet("1000", "0"))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds { needed, available }
                if needed == dec("1010") && available == dec("1000")
        ));
    }

    #[test]
    fn test_sell_moves_coins_into_balance() {
        let trade = Trade::new(TradeSide::Sell, dec("1.5"), dec("20")).unwrap();
        let next = Mutation::Trade(trade).apply(&wallet("10", "2")).unwrap();
        assert_eq!(next.balance, dec("40"));
        assert_eq!(next.coins, dec("0.5"));
    }

    #[test]
    fn test_sell_insufficient_coins() {
        let trade = Trade::new(TradeSide::Sell, dec("2.01"), dec("20")).unwrap();
        let err = Mutation::Trade(trade)
            .apply(&wallet("10", "2"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientCoins { .. }));
    }

    #[test]
    fn test_mine_and_reset() {
        let mined = Mutation::Mine {
            reward: Decimal::ONE,
        }
        .apply(&wallet("12.34", "0.5"))
        .unwrap();
        assert_eq!(mined.balance, dec("12.34"));
        assert_eq!(mined.coins, dec("1.5"));

        let reset = Mutation::Reset.apply(&mined).unwrap();
        assert_eq!(reset, Wallet::new("w"));
    }
}
