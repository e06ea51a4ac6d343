use axum::{
    Json,
    extract::{Path, State},
};
use ledger::types::{decimal_from_f64, present};
use ledger::{Decimal, LedgerError, ValidationError};
use serde::{Deserialize, Serialize};

use super::StatusResponse;
use crate::{AppState, error::ApiError, middleware::ApiJson};

// Buy or sell request
#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub id: Option<String>,
    /// Coins to move; a missing amount is rejected as invalid
    #[serde(default)]
    pub amount: f64,
    /// Price per coin, caller-supplied
    #[serde(default = "default_price")]
    pub price: f64,
}

fn default_price() -> f64 {
    10.0
}

impl TradeRequest {
    fn into_parts(self) -> Result<(String, Decimal, Decimal), ApiError> {
        let id = require_id(self.id)?;
        let amount = decimal_from_f64(self.amount)
            .ok_or(LedgerError::Validation(ValidationError::InvalidAmount))?;
        let price = decimal_from_f64(self.price)
            .ok_or(LedgerError::Validation(ValidationError::InvalidPrice))?;
        Ok((id, amount, price))
    }
}

// Mine or reset request
#[derive(Debug, Deserialize)]
pub struct WalletRequest {
    pub id: Option<String>,
}

// Wallet holdings response
#[derive(Debug, Serialize, Deserialize)]
pub struct WalletDataResponse {
    pub balance: f64,
    pub coins: f64,
    pub pod_id: String,
}

fn require_id(id: Option<String>) -> Result<String, ApiError> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(LedgerError::Validation(ValidationError::MissingWalletId).into()),
    }
}

// Get (or provision) wallet holdings endpoint
pub async fn get_data(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<WalletDataResponse>, ApiError> {
    let wallet = state.ledger.fetch_or_provision(&wallet_id).await?;

    Ok(Json(WalletDataResponse {
        balance: present(wallet.balance),
        coins: present(wallet.coins),
        pod_id: state.pod_id.to_string(),
    }))
}

// Buy coins endpoint
pub async fn buy(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TradeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let (wallet_id, amount, price) = payload.into_parts()?;
    let receipt = state.ledger.buy(&wallet_id, amount, price).await?;
    Ok(Json(StatusResponse::success(receipt.message(), &state.pod_id)))
}

// Sell coins endpoint
pub async fn sell(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TradeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let (wallet_id, amount, price) = payload.into_parts()?;
    let receipt = state.ledger.sell(&wallet_id, amount, price).await?;
    Ok(Json(StatusResponse::success(receipt.message(), &state.pod_id)))
}

// CPU-heavy mining endpoint, used to drive resource limits and autoscaling
pub async fn mine(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WalletRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let wallet_id = require_id(payload.id)?;
    let receipt = state.ledger.mine(&wallet_id).await?;
    Ok(Json(StatusResponse::success(receipt.message(), &state.pod_id)))
}

// Reset wallet to default holdings endpoint
pub async fn reset(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WalletRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let wallet_id = require_id(payload.id)?;
    state.ledger.reset(&wallet_id).await?;
    Ok(Json(StatusResponse::success(
        "Account reset to default",
        &state.pod_id,
    )))
}
