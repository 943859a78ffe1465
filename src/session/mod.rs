// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session context: the bearer token and its lifecycle.
//!
//! A [`Session`] is created once at startup and shared (via `Arc`) with every
//! client that needs the token. Logging out clears the persistent slot; there
//! is no other global token state.

pub mod store;
pub mod token;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use token::{is_token_valid_at, TokenClaims};

use crate::error::{ClientError, Result};
use crate::navigation::Route;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared session handle.
pub type SharedSession = Arc<Session>;

/// Session context wrapping the single token slot.
pub struct Session {
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Create a session backed by `store`.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Session backed by a JSON file at `path`.
    pub fn open_file(path: impl Into<std::path::PathBuf>) -> SharedSession {
        let store = FileTokenStore::new(path);
        tracing::debug!(path = %store.path().display(), "Opened token store");
        Arc::new(Self::new(store))
    }

    /// Session with no persistence.
    pub fn in_memory() -> SharedSession {
        Arc::new(Self::new(MemoryTokenStore::new()))
    }

    /// Persist `token`, replacing any previous one.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token)?;
        tracing::debug!("Session token stored");
        Ok(())
    }

    /// The stored token, if any.
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// The stored token, or `Unauthorized` when there is none.
    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(ClientError::Unauthorized)
    }

    /// Decoded claims of the stored token.
    pub fn claims(&self) -> Option<TokenClaims> {
        self.token().as_deref().and_then(TokenClaims::decode)
    }

    /// Backend user id from the token's `id` claim.
    pub fn user_id(&self) -> Option<u64> {
        self.claims().and_then(|c| c.id)
    }

    /// True iff a token is stored, decodes, and has not expired.
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// [`Session::is_authenticated`] against an explicit clock.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        match self.token() {
            Some(token) => {
                let valid = is_token_valid_at(&token, now);
                if !valid {
                    tracing::debug!("Stored token is expired or malformed");
                }
                valid
            }
            None => false,
        }
    }

    /// Clear the token slot. The caller should navigate to the returned route.
    pub fn logout(&self) -> Result<Route> {
        self.store.remove(TOKEN_KEY)?;
        tracing::info!("Logged out, session token cleared");
        Ok(Route::Login)
    }
}
