//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
}

/// `GET /health`: 200 when the storage root is usable, 503 otherwise.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = match tokio::time::timeout(CHECK_TIMEOUT, state.storage.health_check()).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("unhealthy: {}", e),
        Err(_) => "timeout".to_string(),
    };

    let healthy = storage == "healthy";
    if !healthy {
        tracing::warn!(storage = %storage, "Health check failed");
    }

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        storage,
    };

    (status, Json(body))
}
