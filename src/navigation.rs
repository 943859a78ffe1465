// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation targets returned by session and connection operations.
//!
//! Operations never drive a router themselves; they return the [`Route`] the
//! caller should move to and the embedding UI (or the CLI) acts on it.

use std::fmt;

/// A place the UI should move to after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Login entry point (`/login`).
    Login,
    /// Chat view (`/chat`).
    Chat,
    /// Connected-accounts page (`/client`).
    Client,
    /// Full-page redirect to an external URL (OAuth provider).
    External(String),
}

impl Route {
    /// Path or URL for this route.
    pub fn path(&self) -> &str {
        match self {
            Route::Login => "/login",
            Route::Chat => "/chat",
            Route::Client => "/client",
            Route::External(url) => url,
        }
    }

    /// True if following this route leaves the application.
    pub fn is_external(&self) -> bool {
        matches!(self, Route::External(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
