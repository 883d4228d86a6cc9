//! DeviceGate Server: per-user device session admission.
//!
//! Main entry point that loads configuration, sets up logging and runs the
//! HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use devicegate_core::config::AppConfig;
use devicegate_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting DeviceGate"
    );

    if let Err(e) = devicegate_api::run_server(config).await {
        tracing::error!(kind = %e.kind, error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `DEVICEGATE_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DEVICEGATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
