use crate::config::CorsConfiguration;

/// Application state shared across all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// CORS configuration the router was built with
    pub cors: CorsConfiguration,
}
