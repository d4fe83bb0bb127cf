use crate::filter::{self, InitParameters};
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::AppState;

/// Effective CORS settings as seen by the filter
#[derive(Debug, Serialize)]
pub struct CorsSettingsResponse {
    pub enabled: bool,
    pub init_parameters: InitParameters,
}

/// Report whether CORS is enabled and which init parameters were passed
pub async fn cors_settings(State(state): State<Arc<AppState>>) -> Json<CorsSettingsResponse> {
    Json(CorsSettingsResponse {
        enabled: state.cors.enabled(),
        init_parameters: filter::init_parameters(&state.cors),
    })
}
