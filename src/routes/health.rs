use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub cors_enabled: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy",
        cors_enabled: state.cors.enabled(),
    })
}
