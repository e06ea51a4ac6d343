use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use ledger::{MemoryStore, WalletLedger};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::AppState;

pub const TEST_POD_ID: &str = "kubecoin-test-pod";

// Small enough to keep /api/mine fast in tests
pub const TEST_MINE_ITERATIONS: u64 = 500;

pub fn memory_state() -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let ledger = WalletLedger::with_mine_iterations(Arc::new(store.clone()), TEST_MINE_ITERATIONS);
    (AppState::new(ledger, TEST_POD_ID), store)
}

/// Sends one request through the router. Non-JSON bodies come back as `Null`.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
