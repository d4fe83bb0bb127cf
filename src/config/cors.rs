use serde::{Deserialize, Serialize};

/// Origins value that marks CORS filtering as turned off.
const DISABLED_ORIGINS: &str = "";

/// CORS configuration used to parameterize the cross-origin filter.
///
/// Every field is optional. A field that is not set is not passed to the
/// filter as an init parameter, so the filter's own default applies.
/// Instances are immutable once built; use [`CorsConfiguration::builder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CorsConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allow_credentials: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_headers: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_methods: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_origins: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain_preflight: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    exposed_headers: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    preflight_max_age: Option<i64>,
}

impl CorsConfiguration {
    /// Configuration with nothing set.
    pub const DEFAULT: CorsConfiguration = CorsConfiguration {
        allow_credentials: None,
        allowed_headers: None,
        allowed_methods: None,
        allowed_origins: None,
        chain_preflight: None,
        exposed_headers: None,
        preflight_max_age: None,
    };

    /// Configuration that never installs the filter.
    pub const DISABLED: CorsConfiguration = CorsConfiguration {
        allow_credentials: None,
        allowed_headers: None,
        allowed_methods: None,
        allowed_origins: Some(String::new()),
        chain_preflight: None,
        exposed_headers: None,
        preflight_max_age: None,
    };

    /// Start building a new configuration
    pub fn builder() -> CorsConfigurationBuilder {
        CorsConfigurationBuilder::default()
    }

    /// If set, used for the `allowCredentials` init parameter.
    pub fn allow_credentials(&self) -> Option<bool> {
        self.allow_credentials
    }

    /// If set, used for the `allowedHeaders` init parameter.
    pub fn allowed_headers(&self) -> Option<&str> {
        self.allowed_headers.as_deref()
    }

    /// If set, used for the `allowedMethods` init parameter.
    pub fn allowed_methods(&self) -> Option<&str> {
        self.allowed_methods.as_deref()
    }

    /// If set, used for the `allowedOrigins` init parameter.
    pub fn allowed_origins(&self) -> Option<&str> {
        self.allowed_origins.as_deref()
    }

    /// If set, used for the `chainPreflight` init parameter.
    pub fn chain_preflight(&self) -> Option<bool> {
        self.chain_preflight
    }

    /// If set, used for the `exposedHeaders` init parameter.
    pub fn exposed_headers(&self) -> Option<&str> {
        self.exposed_headers.as_deref()
    }

    /// If set, used for the `preflightMaxAge` init parameter (seconds).
    pub fn preflight_max_age(&self) -> Option<i64> {
        self.preflight_max_age
    }

    /// Whether the cross-origin filter is installed at all.
    ///
    /// True only when `allowedOrigins` is set to a non-empty string.
    pub fn enabled(&self) -> bool {
        self.allowed_origins
            .as_deref()
            .is_some_and(|origins| origins != DISABLED_ORIGINS)
    }
}

/// Builder for [`CorsConfiguration`]. Later calls to the same setter win.
#[derive(Debug, Clone, Default)]
pub struct CorsConfigurationBuilder {
    inner: CorsConfiguration,
}

impl CorsConfigurationBuilder {
    pub fn allow_credentials(mut self, allow_credentials: bool) -> Self {
        self.inner.allow_credentials = Some(allow_credentials);
        self
    }

    pub fn allowed_headers(mut self, allowed_headers: impl Into<String>) -> Self {
        self.inner.allowed_headers = Some(allowed_headers.into());
        self
    }

    pub fn allowed_methods(mut self, allowed_methods: impl Into<String>) -> Self {
        self.inner.allowed_methods = Some(allowed_methods.into());
        self
    }

    pub fn allowed_origins(mut self, allowed_origins: impl Into<String>) -> Self {
        self.inner.allowed_origins = Some(allowed_origins.into());
        self
    }

    pub fn chain_preflight(mut self, chain_preflight: bool) -> Self {
        self.inner.chain_preflight = Some(chain_preflight);
        self
    }

    pub fn exposed_headers(mut self, exposed_headers: impl Into<String>) -> Self {
        self.inner.exposed_headers = Some(exposed_headers.into());
        self
    }

    pub fn preflight_max_age(mut self, preflight_max_age: i64) -> Self {
        self.inner.preflight_max_age = Some(preflight_max_age);
        self
    }

    pub fn build(self) -> CorsConfiguration {
        self.inner
    }
}

impl From<&CorsConfiguration> for CorsConfigurationBuilder {
    fn from(config: &CorsConfiguration) -> Self {
        Self {
            inner: config.clone(),
        }
    }
}
