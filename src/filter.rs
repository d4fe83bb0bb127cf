//! Maps a [`CorsConfiguration`] onto cross-origin filter init parameters.
//!
//! Only fields that are set become parameters. Anything left unset is simply
//! not passed, which lets [`CrossOriginFilter`] fall back to its own default.

mod cross_origin;

pub use cross_origin::CrossOriginFilter;

use crate::config::CorsConfiguration;
use crate::error::AppResult;
use std::collections::BTreeMap;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

pub const ALLOW_CREDENTIALS_PARAM: &str = "allowCredentials";
pub const ALLOWED_HEADERS_PARAM: &str = "allowedHeaders";
pub const ALLOWED_METHODS_PARAM: &str = "allowedMethods";
pub const ALLOWED_ORIGINS_PARAM: &str = "allowedOrigins";
pub const CHAIN_PREFLIGHT_PARAM: &str = "chainPreflight";
pub const EXPOSED_HEADERS_PARAM: &str = "exposedHeaders";
pub const PREFLIGHT_MAX_AGE_PARAM: &str = "preflightMaxAge";

/// Named string parameters handed to the filter on initialization
pub type InitParameters = BTreeMap<&'static str, String>;

/// Collect the init parameters for every field that is set.
pub fn init_parameters(config: &CorsConfiguration) -> InitParameters {
    let mut params = InitParameters::new();

    if let Some(value) = config.allow_credentials() {
        params.insert(ALLOW_CREDENTIALS_PARAM, value.to_string());
    }
    if let Some(value) = config.allowed_headers() {
        params.insert(ALLOWED_HEADERS_PARAM, value.to_string());
    }
    if let Some(value) = config.allowed_methods() {
        params.insert(ALLOWED_METHODS_PARAM, value.to_string());
    }
    if let Some(value) = config.allowed_origins() {
        params.insert(ALLOWED_ORIGINS_PARAM, value.to_string());
    }
    if let Some(value) = config.chain_preflight() {
        params.insert(CHAIN_PREFLIGHT_PARAM, value.to_string());
    }
    if let Some(value) = config.exposed_headers() {
        params.insert(EXPOSED_HEADERS_PARAM, value.to_string());
    }
    if let Some(value) = config.preflight_max_age() {
        params.insert(PREFLIGHT_MAX_AGE_PARAM, value.to_string());
    }

    params
}

/// Build the CORS layer for this configuration.
///
/// Returns `Ok(None)` when the configuration is not enabled, in which case no
/// filter should be installed. Values the filter cannot accept are reported as
/// [`AppError::InvalidParameter`](crate::error::AppError::InvalidParameter).
pub fn apply(config: &CorsConfiguration) -> AppResult<Option<CorsLayer>> {
    if !config.enabled() {
        info!("CORS filter disabled");
        return Ok(None);
    }

    let params = init_parameters(config);
    debug!(?params, "Initializing cross-origin filter");

    let filter = CrossOriginFilter::init(&params)?;
    info!(
        origins = config.allowed_origins().unwrap_or_default(),
        "CORS filter enabled"
    );

    Ok(Some(filter.layer()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_parameters() {
        assert!(init_parameters(&CorsConfiguration::DEFAULT).is_empty());
    }

    #[test]
    fn test_disabled_passes_empty_origins() {
        let params = init_parameters(&CorsConfiguration::DISABLED);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(ALLOWED_ORIGINS_PARAM).map(String::as_str), Some(""));
    }

    #[test]
    fn test_present_fields_are_stringified() {
        let config = CorsConfiguration::builder()
            .allow_credentials(true)
            .allowed_headers("X-Custom")
            .allowed_methods("GET,POST")
            .allowed_origins("https://a.com")
            .chain_preflight(false)
            .exposed_headers("X-Exposed")
            .preflight_max_age(3600)
            .build();

        let params = init_parameters(&config);
        let expected: InitParameters = [
            (ALLOW_CREDENTIALS_PARAM, "true"),
            (ALLOWED_HEADERS_PARAM, "X-Custom"),
            (ALLOWED_METHODS_PARAM, "GET,POST"),
            (ALLOWED_ORIGINS_PARAM, "https://a.com"),
            (CHAIN_PREFLIGHT_PARAM, "false"),
            (EXPOSED_HEADERS_PARAM, "X-Exposed"),
            (PREFLIGHT_MAX_AGE_PARAM, "3600"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
        assert_eq!(params, expected);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let config = CorsConfiguration::builder()
            .allowed_origins("https://a.com")
            .preflight_max_age(60)
            .build();

        let params = init_parameters(&config);
        assert_eq!(params.len(), 2);
        assert!(!params.contains_key(ALLOW_CREDENTIALS_PARAM));
        assert!(!params.contains_key(CHAIN_PREFLIGHT_PARAM));
        assert_eq!(params[PREFLIGHT_MAX_AGE_PARAM], "60");
    }

    #[test]
    fn test_apply_skips_disabled_configurations() {
        assert!(apply(&CorsConfiguration::DEFAULT).unwrap().is_none());
        assert!(apply(&CorsConfiguration::DISABLED).unwrap().is_none());
    }

    #[test]
    fn test_apply_builds_layer_when_enabled() {
        let config = CorsConfiguration::builder()
            .allowed_origins("https://a.com")
            .build();
        assert!(apply(&config).unwrap().is_some());
    }

    #[test]
    fn test_apply_propagates_filter_rejections() {
        let config = CorsConfiguration::builder()
            .allowed_origins("https://a.com")
            .preflight_max_age(-1)
            .build();
        assert!(apply(&config).is_err());
    }
}
