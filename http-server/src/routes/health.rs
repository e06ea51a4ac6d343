use axum::{Json, extract::State, http::StatusCode};

use super::StatusResponse;
use crate::AppState;

// Liveness probe: 200 while healthy, 500 once sabotaged
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    let healthy = state.liveness.probe();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(StatusResponse::probe(healthy, &state.pod_id)))
}

// Sabotage endpoint: fail every later probe until the pod restarts
pub async fn kill(State(state): State<AppState>) -> Json<StatusResponse> {
    state.liveness.sabotage();
    Json(StatusResponse::success(
        "Pod marked as unhealthy. K8s will restart it soon.",
        &state.pod_id,
    ))
}
