//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHECKOUT_PSP` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use checkout_psp::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! init_tracing(&config.logging).expect("Failed to install subscriber");
//!
//! let credential = config.merchant.credential().expect("Invalid merchant config");
//! ```

mod callback;
mod error;
mod logging;
mod merchant;

pub use callback::CallbackConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{init_tracing, LoggingConfig};
pub use merchant::MerchantConfig;

use serde::Deserialize;

/// Root configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Values are read once at startup and are immutable afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Merchant account (id, secret, algorithm, endpoint)
    pub merchant: MerchantConfig,

    /// Callback freshness window
    #[serde(default)]
    pub callback: CallbackConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHECKOUT_PSP` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHECKOUT_PSP__MERCHANT__ACCOUNT_ID=375917` -> `merchant.account_id`
    /// - `CHECKOUT_PSP__CALLBACK__TOLERANCE_SECS=600` -> `callback.tolerance_secs`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    /// - A value fails [`validate`](Self::validate)
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHECKOUT_PSP")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value. An unsupported
    /// algorithm is reported here so the process fails at startup.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.merchant.validate()?;
        self.callback.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
