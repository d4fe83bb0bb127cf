mod cors;
mod server;

pub use cors::{CorsConfiguration, CorsConfigurationBuilder};
pub use server::ServerConfig;

use crate::error::{AppError, AppResult};
use std::env;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfiguration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// A CORS variable that is not present leaves the matching field unset.
    /// A variable that is present but empty is kept as an empty string, so
    /// `CORS_ALLOWED_ORIGINS=` disables the filter.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?;

        // CORS config
        let mut cors = CorsConfiguration::builder();
        if let Some(value) = parse_optional(&lookup, "CORS_ALLOW_CREDENTIALS")? {
            cors = cors.allow_credentials(value);
        }
        if let Some(value) = lookup("CORS_ALLOWED_HEADERS") {
            cors = cors.allowed_headers(value);
        }
        if let Some(value) = lookup("CORS_ALLOWED_METHODS") {
            cors = cors.allowed_methods(value);
        }
        if let Some(value) = lookup("CORS_ALLOWED_ORIGINS") {
            cors = cors.allowed_origins(value);
        }
        if let Some(value) = parse_optional(&lookup, "CORS_CHAIN_PREFLIGHT")? {
            cors = cors.chain_preflight(value);
        }
        if let Some(value) = lookup("CORS_EXPOSED_HEADERS") {
            cors = cors.exposed_headers(value);
        }
        if let Some(value) = parse_optional(&lookup, "CORS_PREFLIGHT_MAX_AGE")? {
            cors = cors.preflight_max_age(value);
        }

        let config = Config {
            server: ServerConfig { host, port },
            cors: cors.build(),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.server.validate().map_err(AppError::Configuration)?;

        Ok(())
    }
}

/// Read a CORS configuration from a JSON file using camelCase field names.
pub fn load_cors_file(path: &Path) -> AppResult<CorsConfiguration> {
    let contents = std::fs::read_to_string(path)?;
    let cors = serde_json::from_str(&contents)?;
    Ok(cors)
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
        })
        .transpose()
}
