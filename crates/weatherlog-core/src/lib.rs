//! Core configuration, error types and logging for the weatherlog tools.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ConfigError, FetchError, StoreError};

use anyhow::Result;

/// Initialize tracing/logging for the weatherlog binaries
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("weatherlog core initialized");
    Ok(())
}
