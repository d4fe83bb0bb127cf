use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use websecurity::config::{self, Config};
use websecurity::error::AppResult;
use websecurity::{filter, server};

/// websecurity - CORS configuration for HTTP services
#[derive(Parser, Debug)]
#[command(name = "websecurity")]
#[command(version)]
#[command(about = "CORS configuration for HTTP services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// JSON file with the CORS configuration (overrides CORS_* env vars)
        #[arg(long)]
        cors_config: Option<PathBuf>,
    },

    /// Print the filter init parameters for the current configuration
    Show {
        /// JSON file with the CORS configuration (overrides CORS_* env vars)
        #[arg(long)]
        cors_config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
        )
        .init();

    // Load configuration
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            cors_config,
        } => {
            if let Some(path) = cors_config {
                config.cors = config::load_cors_file(&path)?;
            }

            // Override config with CLI args if provided
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = config.server.addr();
            server::run_server(config, addr).await
        }
        Commands::Show { cors_config } => {
            let cors = match cors_config {
                Some(path) => config::load_cors_file(&path)?,
                None => config.cors,
            };

            let report = json!({
                "enabled": cors.enabled(),
                "init_parameters": filter::init_parameters(&cors),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}
