use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,

    /// Port number to bind to (e.g., 3000)
    pub port: u16,
}

impl ServerConfig {
    /// Validate server configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("SERVER_HOST must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("SERVER_PORT must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Address string suitable for binding a listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
