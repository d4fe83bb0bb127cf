use super::{
    InitParameters, ALLOWED_HEADERS_PARAM, ALLOWED_METHODS_PARAM, ALLOWED_ORIGINS_PARAM,
    ALLOW_CREDENTIALS_PARAM, CHAIN_PREFLIGHT_PARAM, EXPOSED_HEADERS_PARAM,
    PREFLIGHT_MAX_AGE_PARAM,
};
use crate::error::{AppError, AppResult};
use http::{request::Parts, HeaderName, HeaderValue, Method};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};
use tracing::warn;

const DEFAULT_ALLOWED_ORIGINS: &str = "*";
const DEFAULT_ALLOWED_METHODS: &str = "GET,POST,HEAD";
const DEFAULT_ALLOWED_HEADERS: &str = "X-Requested-With,Content-Type,Accept,Origin";
const DEFAULT_EXPOSED_HEADERS: &str = "";
const DEFAULT_PREFLIGHT_MAX_AGE: &str = "1800";
const DEFAULT_ALLOW_CREDENTIALS: &str = "true";
const DEFAULT_CHAIN_PREFLIGHT: &str = "false";

const WILDCARD: &str = "*";

/// Origins accepted by the filter
#[derive(Debug, Clone)]
enum OriginRule {
    Any,
    Matching {
        exact: Vec<String>,
        patterns: Vec<Regex>,
    },
}

impl OriginRule {
    fn matches(&self, origin: &str) -> bool {
        match self {
            OriginRule::Any => true,
            OriginRule::Matching { exact, patterns } => {
                exact.iter().any(|o| o == origin) || patterns.iter().any(|p| p.is_match(origin))
            }
        }
    }
}

#[derive(Debug, Clone)]
enum ListRule<T> {
    Mirror,
    List(Vec<T>),
}

/// Cross-origin filter initialized from named string parameters.
///
/// Parameters that are missing take the filter defaults: any origin, the
/// `GET,POST,HEAD` methods, the common simple headers, a 30 minute preflight
/// cache and credentials allowed. Requests are answered through a
/// [`tower_http::cors::CorsLayer`].
#[derive(Debug, Clone)]
pub struct CrossOriginFilter {
    origins: Arc<OriginRule>,
    methods: ListRule<Method>,
    headers: ListRule<HeaderName>,
    exposed_headers: Vec<HeaderName>,
    allow_credentials: bool,
    chain_preflight: bool,
    preflight_max_age: Duration,
}

impl CrossOriginFilter {
    pub fn init(params: &InitParameters) -> AppResult<Self> {
        let allow_credentials = parse_bool(
            ALLOW_CREDENTIALS_PARAM,
            param_or(params, ALLOW_CREDENTIALS_PARAM, DEFAULT_ALLOW_CREDENTIALS),
        )?;
        let chain_preflight = parse_bool(
            CHAIN_PREFLIGHT_PARAM,
            param_or(params, CHAIN_PREFLIGHT_PARAM, DEFAULT_CHAIN_PREFLIGHT),
        )?;

        let origins = parse_origins(param_or(params, ALLOWED_ORIGINS_PARAM, DEFAULT_ALLOWED_ORIGINS))?;
        let methods = parse_methods(param_or(params, ALLOWED_METHODS_PARAM, DEFAULT_ALLOWED_METHODS))?;
        let headers = match parse_header_names(
            ALLOWED_HEADERS_PARAM,
            param_or(params, ALLOWED_HEADERS_PARAM, DEFAULT_ALLOWED_HEADERS),
        )? {
            None => ListRule::Mirror,
            Some(names) => ListRule::List(names),
        };

        let exposed_raw = param_or(params, EXPOSED_HEADERS_PARAM, DEFAULT_EXPOSED_HEADERS);
        let exposed_headers = match parse_header_names(EXPOSED_HEADERS_PARAM, exposed_raw)? {
            Some(names) => names,
            None if allow_credentials => {
                return Err(AppError::invalid_parameter(
                    EXPOSED_HEADERS_PARAM,
                    exposed_raw,
                    "wildcard cannot be combined with allowCredentials=true",
                ))
            }
            None => vec![HeaderName::from_static("*")],
        };

        let max_age_raw = param_or(params, PREFLIGHT_MAX_AGE_PARAM, DEFAULT_PREFLIGHT_MAX_AGE);
        let max_age: u64 = max_age_raw.trim().parse().map_err(|_| {
            AppError::invalid_parameter(
                PREFLIGHT_MAX_AGE_PARAM,
                max_age_raw,
                "expected a non-negative number of seconds",
            )
        })?;

        if chain_preflight {
            warn!("chainPreflight=true is not supported; preflight requests are answered by the CORS layer");
        }

        Ok(Self {
            origins: Arc::new(origins),
            methods,
            headers,
            exposed_headers,
            allow_credentials,
            chain_preflight,
            preflight_max_age: Duration::from_secs(max_age),
        })
    }

    /// Whether a request carrying this `Origin` is allowed
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.origins.matches(origin)
    }

    pub fn allow_credentials(&self) -> bool {
        self.allow_credentials
    }

    pub fn chain_preflight(&self) -> bool {
        self.chain_preflight
    }

    pub fn preflight_max_age(&self) -> Duration {
        self.preflight_max_age
    }

    /// Build the tower layer enforcing this filter.
    ///
    /// Wildcards are mirrored from the request rather than sent as `*`, so the
    /// layer stays valid when credentials are allowed.
    pub fn layer(&self) -> CorsLayer {
        let allow_origin = match self.origins.as_ref() {
            OriginRule::Any => AllowOrigin::mirror_request(),
            OriginRule::Matching { .. } => {
                let origins = Arc::clone(&self.origins);
                AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
                    origin
                        .to_str()
                        .map(|origin| origins.matches(origin))
                        .unwrap_or(false)
                })
            }
        };

        let allow_methods = match &self.methods {
            ListRule::Mirror => AllowMethods::mirror_request(),
            ListRule::List(methods) => AllowMethods::list(methods.iter().cloned()),
        };

        let allow_headers = match &self.headers {
            ListRule::Mirror => AllowHeaders::mirror_request(),
            ListRule::List(names) => AllowHeaders::list(names.iter().cloned()),
        };

        let mut layer = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(allow_methods)
            .allow_headers(allow_headers)
            .allow_credentials(self.allow_credentials)
            .max_age(self.preflight_max_age);

        if !self.exposed_headers.is_empty() {
            layer = layer.expose_headers(ExposeHeaders::list(self.exposed_headers.iter().cloned()));
        }

        layer
    }
}

fn param_or<'a>(params: &'a InitParameters, name: &str, default: &'a str) -> &'a str {
    params.get(name).map(String::as_str).unwrap_or(default)
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AppError::invalid_parameter(name, value, "expected true or false")),
    }
}

fn parse_origins(value: &str) -> AppResult<OriginRule> {
    let mut exact = Vec::new();
    let mut patterns = Vec::new();

    for origin in split_list(value) {
        if origin == WILDCARD {
            return Ok(OriginRule::Any);
        }
        if origin.contains('*') {
            patterns.push(origin_pattern(origin)?);
        } else {
            exact.push(origin.to_string());
        }
    }

    Ok(OriginRule::Matching { exact, patterns })
}

/// Compile `https://*.example.com` style origins, `*` matching any run of characters.
fn origin_pattern(origin: &str) -> AppResult<Regex> {
    let body = origin
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    Regex::new(&format!("^{}$", body))
        .map_err(|e| AppError::invalid_parameter(ALLOWED_ORIGINS_PARAM, origin, e.to_string()))
}

fn parse_methods(value: &str) -> AppResult<ListRule<Method>> {
    let mut methods = Vec::new();
    for method in split_list(value) {
        if method == WILDCARD {
            return Ok(ListRule::Mirror);
        }
        let parsed = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|e| AppError::invalid_parameter(ALLOWED_METHODS_PARAM, method, e.to_string()))?;
        methods.push(parsed);
    }
    Ok(ListRule::List(methods))
}

/// Parse a header list. `None` means the list was the `*` wildcard.
fn parse_header_names(name: &'static str, value: &str) -> AppResult<Option<Vec<HeaderName>>> {
    let mut names = Vec::new();
    for header in split_list(value) {
        if header == WILDCARD {
            return Ok(None);
        }
        let parsed = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| AppError::invalid_parameter(name, header, e.to_string()))?;
        names.push(parsed);
    }
    Ok(Some(names))
}
