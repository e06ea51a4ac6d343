use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger::LedgerError;

use crate::routes::StatusResponse;

/// A ledger failure on its way out as `{status: "error", message}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let status = match &err {
            LedgerError::Validation(_)
            | LedgerError::InsufficientFunds { .. }
            | LedgerError::InsufficientCoins { .. } => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::PoolUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LedgerError::Store(_) | LedgerError::Mining(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if err.is_infrastructure() {
            tracing::error!("Ledger operation failed: {}", err);
        } else {
            tracing::debug!("Ledger operation rejected: {}", err);
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(StatusResponse::error(self.message))).into_response()
    }
}
