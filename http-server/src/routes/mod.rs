use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod health;
pub mod wallets;

use health::{health_check, kill};
use wallets::{buy, get_data, mine, reset, sell};

// Envelope shared by action, error and health responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_id: Option<String>,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>, pod_id: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.into()),
            pod_id: Some(pod_id.to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            pod_id: None,
        }
    }

    pub fn probe(healthy: bool, pod_id: &str) -> Self {
        Self {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            message: None,
            pod_id: Some(pod_id.to_string()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/data/{wallet_id}", get(get_data))
        .route("/api/buy", post(buy))
        .route("/api/sell", post(sell))
        .route("/api/mine", post(mine))
        .route("/api/reset", post(reset))
        .route("/health", get(health_check))
        .route("/kill", post(kill))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// Root endpoint
async fn root() -> &'static str {
    "KubeCoin Ledger API - GET /api/data/{id} for holdings, POST /api/buy, /api/sell, /api/mine, /api/reset to trade, GET /health for liveness"
}
