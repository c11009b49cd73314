pub mod config;
pub mod error;

pub use self::config::{
    Config, MockConfig, SearchConfig, TemperatureUnit, UnitsConfig, ValidationResult, WindUnit,
};
pub use error::{AppError, ConfigError, WeatherError};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Honors `RUST_LOG`; defaults to `info`. Fails if a global subscriber is already set.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("SkyCast core initialized");
    Ok(())
}
