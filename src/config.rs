// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API base URL, without trailing slash
    pub api_url: String,
    /// File holding the persistent token slot
    pub token_file: PathBuf,
    /// Interval between conversation re-fetches while media is processing
    pub poll_interval: Duration,
    /// How long a publish success notice stays visible
    pub success_notice: Duration,
    /// How long a publish error notice stays visible
    pub error_notice: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            token_file: PathBuf::from(".multired/session.json"),
            poll_interval: Duration::from_millis(4000),
            success_notice: Duration::from_millis(3000),
            error_notice: Duration::from_millis(5000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("MULTIRED_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            token_file: env::var("MULTIRED_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            poll_interval: millis_var("MULTIRED_POLL_INTERVAL_MS")?
                .unwrap_or(defaults.poll_interval),
            success_notice: millis_var("MULTIRED_SUCCESS_NOTICE_MS")?
                .unwrap_or(defaults.success_notice),
            error_notice: millis_var("MULTIRED_ERROR_NOTICE_MS")?
                .unwrap_or(defaults.error_notice),
        })
    }

    /// Same defaults with a different backend URL.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// Read an optional millisecond duration; present-but-invalid is an error.
fn millis_var(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
