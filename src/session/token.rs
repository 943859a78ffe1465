// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side reading of session token claims.
//!
//! The token is JWT-shaped. Only the payload segment is read, for `exp` and
//! the optional user `id`; the signature is never checked here.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims the client cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// Expiration time (Unix seconds, possibly fractional)
    pub exp: f64,
    /// Backend user id, when the token carries a numeric one
    pub id: Option<u64>,
}

/// Payload as sent. Only `exp` has to be well-formed; any other claim may
/// have any type without affecting validity.
#[derive(Deserialize)]
struct RawClaims {
    exp: f64,
    #[serde(default)]
    id: Option<serde_json::Value>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// Returns `None` for anything that is not three dot-separated segments
    /// with a base64url JSON payload carrying a numeric `exp`.
    pub fn decode(token: &str) -> Option<Self> {
        let mut parts = token.split('.');
        let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        let raw: RawClaims = serde_json::from_slice(&bytes).ok()?;
        if !raw.exp.is_finite() {
            return None;
        }

        Some(Self {
            exp: raw.exp,
            id: raw.id.as_ref().and_then(serde_json::Value::as_u64),
        })
    }

    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis((self.exp * 1000.0) as i64)
    }

    /// True iff `now` precedes the expiry, compared in milliseconds.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        (crate::time_utils::unix_millis(now) as f64) < self.exp * 1000.0
    }
}

/// True iff `token` decodes and has not expired at `now`.
///
/// A malformed token is simply not valid; this never fails.
pub fn is_token_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    TokenClaims::decode(token).is_some_and(|claims| claims.is_valid_at(now))
}
