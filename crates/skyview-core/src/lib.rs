pub mod config;
pub mod error;

pub use config::{
    Config, LocationConfig, SceneConfig, UiConfig, ValidationResult, WeatherConfig,
    API_KEY_ENV, API_KEY_PLACEHOLDER,
};
pub use error::{AppError, ConfigError, LocationError, NetworkError, ReqwestErrorExt, WeatherError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging; a second call (tests, embedders) is a no-op
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    tracing::info!("SkyView core initialized");
    Ok(())
}
