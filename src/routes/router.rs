use crate::error::AppResult;
use crate::filter;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::cors;
use super::health;
use super::AppState;

/// Create application router
///
/// The cross-origin filter is only layered on when the CORS configuration in
/// `state` is enabled.
pub fn create_router(state: Arc<AppState>) -> AppResult<axum::Router> {
    let cors_layer = filter::apply(&state.cors)?;

    let router = axum::Router::new()
        .route("/_health", get(health::health_check))
        .route("/_cors", get(cors::cors_settings))
        .with_state(state);

    let router = match cors_layer {
        Some(layer) => router.layer(layer),
        None => router,
    };

    Ok(router.layer(TraceLayer::new_for_http()))
}
