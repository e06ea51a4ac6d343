use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Fiat balance assigned to a wallet the first time it is observed
pub const DEFAULT_BALANCE: Decimal = Decimal::ONE_THOUSAND;
/// Coin holdings assigned to a wallet the first time it is observed
pub const DEFAULT_COINS: Decimal = Decimal::ZERO;
/// Coins credited for one completed unit of mining work
pub const MINING_REWARD: Decimal = Decimal::ONE;

/// Decimal places used when quantities leave the ledger
pub const DISPLAY_SCALE: u32 = 2;

/// Finest amount or price a trade may name
pub const INPUT_SCALE: u32 = 8;
/// Decimal places a stored holding can carry: an input times a price
pub const HOLDING_SCALE: u32 = 2 * INPUT_SCALE;
/// Exclusive upper bound on any stored holding, trade amount or price (10^12)
pub const HOLDING_LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub id: String,
    /// Fiat units, never negative at rest
    pub balance: Decimal,
    /// Coin units, never negative at rest
    pub coins: Decimal,
}

impl Wallet {
    /// A wallet in its freshly provisioned (or reset) state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: DEFAULT_BALANCE,
            coins: DEFAULT_COINS,
        }
    }

    pub fn is_solvent(&self) -> bool {
        !self.balance.is_sign_negative() && !self.coins.is_sign_negative()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Outcome of a committed buy or sell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub side: TradeSide,
    pub amount: Decimal,
    pub price: Decimal,
    /// Cost of a buy or revenue of a sell
    pub total: Decimal,
    /// Wallet state after the commit
    pub wallet: Wallet,
}

impl TradeReceipt {
    pub fn message(&self) -> String {
        let verb = match self.side {
            TradeSide::Buy => "Purchased",
            TradeSide::Sell => "Sold",
        };
        format!(
            "{} {:.2} coins for ${:.2} @ ${:.2}/coin",
            verb,
            round_for_display(self.amount),
            round_for_display(self.total),
            round_for_display(self.price)
        )
    }
}

/// Outcome of a committed mining reward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineReceipt {
    pub reward: Decimal,
    /// Hex digest produced by the work unit
    pub digest: String,
    pub wallet: Wallet,
}

impl MineReceipt {
    pub fn message(&self) -> String {
        "Mining complete! Earned 1 KubeCoin".to_string()
    }
}

/// True when `value` is representable at the ledger's input precision
pub fn fits_input_scale(value: Decimal) -> bool {
    value.normalize().scale() <= INPUT_SCALE
}

/// Converts a caller-supplied float into an exact decimal.
///
/// Uses the shortest representation of the float, so `0.1` becomes exactly
/// `0.1`. Returns `None` for NaN, infinities and values outside the decimal
/// range.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Rounds half away from zero to the display scale. Stored values keep
/// full precision; only presentation rounds.
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a quantity for presentation in JSON responses
pub fn present(value: Decimal) -> f64 {
    round_for_display(value).to_f64().unwrap_or_default()
}
