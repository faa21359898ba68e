//! Configuration management for the client.

use crate::gateway::Environment;
use std::env;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote spreadsheet API endpoint
    pub api_url: String,
    /// Dataset to start in
    pub environment: Environment,
    /// Budget above which an uncontacted lead triggers an outreach alert
    pub high_value_threshold: f64,
}

impl Config {
    /// Load configuration from environment variables, honoring a `.env` file
    /// when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("ACRES_API_URL").map_err(|_| ConfigError::MissingApiUrl)?;

        let environment = match env::var("ACRES_ENV") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidEnvironment(raw))?,
            Err(_) => Environment::Test,
        };

        let high_value_threshold = match env::var("ACRES_HIGH_VALUE_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidThreshold(raw))?,
            Err(_) => acres_engine::HIGH_VALUE_THRESHOLD,
        };

        Ok(Self {
            api_url,
            environment,
            high_value_threshold,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ACRES_API_URL environment variable is required")]
    MissingApiUrl,

    #[error("invalid ACRES_ENV value: {0} (expected 'test' or 'live')")]
    InvalidEnvironment(String),

    #[error("invalid ACRES_HIGH_VALUE_THRESHOLD value: {0}")]
    InvalidThreshold(String),
}
