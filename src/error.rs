// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with consistent user-facing messages.

use crate::navigation::Route;
use serde::Deserialize;

/// Client error type surfaced to the CLI and to embedding UIs.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Red social {0} no soportada")]
    UnsupportedNetwork(String),

    #[error("Message {0} is already being published")]
    PublishInFlight(u64),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error body returned by the backend (`{"message": ...}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ClientError {
    /// True for errors that mean the session is missing or no longer accepted.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::InvalidToken)
    }

    /// Where the UI should go after this error, if anywhere.
    pub fn route(&self) -> Option<Route> {
        if self.is_auth_error() {
            Some(Route::Login)
        } else {
            None
        }
    }

    /// Message supplied by the backend, if this error carries one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Backend { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Build a backend error from a non-success status and raw body.
    ///
    /// NestJS-style bodies put the human message in `message`, which may be a
    /// string or an array of validation strings.
    pub fn from_backend(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| match b.message {
                Some(serde_json::Value::String(s)) => Some(s),
                Some(serde_json::Value::Array(items)) => Some(
                    items
                        .iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                _ => b.error,
            })
            .unwrap_or_default();

        ClientError::Backend { status, message }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
