// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Linked social-platform accounts.

use serde::{Deserialize, Serialize};

/// A social account linked to the current user, as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    #[serde(default)]
    pub id: Option<u64>,
    /// Provider name (`"tiktok"`, `"facebook"`, ...)
    pub provider: String,
    /// Account id on the provider
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default = "default_connected")]
    pub connected: bool,
    /// When the account was linked (ISO 8601)
    #[serde(default)]
    pub connected_at: Option<String>,
}

fn default_connected() -> bool {
    true
}

/// Most recently fetched list of connected accounts.
///
/// Never edited locally; replaced wholesale on every re-fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectedAccounts {
    accounts: Vec<SocialAccount>,
}

impl ConnectedAccounts {
    pub fn new(accounts: Vec<SocialAccount>) -> Self {
        Self { accounts }
    }

    /// True iff `provider` appears in the list.
    pub fn is_connected(&self, provider: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.provider.eq_ignore_ascii_case(provider))
    }

    pub fn get(&self, provider: &str) -> Option<&SocialAccount> {
        self.accounts
            .iter()
            .find(|a| a.provider.eq_ignore_ascii_case(provider))
    }

    pub fn as_slice(&self) -> &[SocialAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// URL to send the browser to when linking a provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectUrl {
    pub url: String,
}
