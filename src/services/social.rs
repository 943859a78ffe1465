// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Linking and unlinking social-platform accounts.
//!
//! Linking is redirect based: the backend hands out a provider URL and the
//! whole page moves there. The provider later redirects back to the client
//! with `?connected=<provider>` or `?error=<provider>`.

use crate::error::{ClientError, Result};
use crate::models::{ConnectUrl, ConnectedAccounts, Network, SocialAccount};
use crate::navigation::Route;
use crate::services::ApiClient;
use std::sync::{Arc, RwLock};

/// Outcome carried by the provider's redirect back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCallback {
    Connected(String),
    Failed(String),
}

impl ConnectionCallback {
    /// Read `connected` / `error` from a callback URL's query string.
    pub fn parse(callback_url: &str) -> Option<Self> {
        let url = reqwest::Url::parse(callback_url).ok()?;
        let mut connected = None;
        let mut failed = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "connected" if !value.is_empty() => connected = Some(value.into_owned()),
                "error" if !value.is_empty() => failed = Some(value.into_owned()),
                _ => {}
            }
        }
        connected
            .map(ConnectionCallback::Connected)
            .or(failed.map(ConnectionCallback::Failed))
    }
}

/// Client for `/social-accounts` and the provider connect endpoints.
///
/// Keeps the most recently fetched account list; it is only ever replaced by
/// a re-fetch.
#[derive(Clone)]
pub struct SocialAccountService {
    api: ApiClient,
    accounts: Arc<RwLock<ConnectedAccounts>>,
}

impl SocialAccountService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            accounts: Arc::new(RwLock::new(ConnectedAccounts::default())),
        }
    }

    /// Fetch the connected accounts and replace the local list.
    pub async fn refresh(&self) -> Result<ConnectedAccounts> {
        let accounts: Vec<SocialAccount> = self
            .api
            .get_json("/social-accounts")
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load connected accounts"))?;

        let accounts = ConnectedAccounts::new(accounts);
        tracing::debug!(count = accounts.len(), "Connected accounts loaded");
        if let Ok(mut slot) = self.accounts.write() {
            *slot = accounts.clone();
        }
        Ok(accounts)
    }

    /// The last fetched list.
    pub fn accounts(&self) -> ConnectedAccounts {
        self.accounts
            .read()
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    /// True iff `network` appears in the last fetched list.
    pub fn is_connected(&self, network: Network) -> bool {
        self.accounts
            .read()
            .is_ok_and(|a| a.is_connected(network.slug()))
    }

    /// Ask the backend for the provider URL to link `network`.
    ///
    /// Returns `Route::Login` without calling the backend when there is no
    /// session token.
    pub async fn connect(&self, network: Network) -> Result<Route> {
        let path = match network {
            Network::TikTok => "/tiktok/connect",
            Network::Facebook => "/auth/connect/facebook/start",
            other => return Err(ClientError::UnsupportedNetwork(other.to_string())),
        };

        if self.api.session().token().is_none() {
            tracing::error!(%network, "Cannot connect account without a session");
            return Ok(Route::Login);
        }

        let ConnectUrl { url } = self
            .api
            .post_json(path, &serde_json::json!({}))
            .await
            .inspect_err(|e| tracing::error!(%network, error = %e, "Failed to start account connection"))?;

        tracing::info!(%network, "Connection URL received");
        Ok(Route::External(url))
    }

    /// Unlink `network`, then re-fetch the account list.
    ///
    /// Confirmation is the caller's job; this deletes unconditionally.
    pub async fn disconnect(&self, network: Network) -> Result<ConnectedAccounts> {
        self.api
            .delete(&format!("/social-accounts/{}", network.slug()))
            .await
            .inspect_err(|e| tracing::error!(%network, error = %e, "Failed to disconnect account"))?;

        tracing::info!(%network, "Account disconnected");
        self.refresh().await
    }

    /// Act on the provider's redirect back to the client.
    ///
    /// A successful connection re-fetches the account list.
    pub async fn handle_callback(&self, callback_url: &str) -> Result<Option<ConnectionCallback>> {
        let callback = ConnectionCallback::parse(callback_url);
        match &callback {
            Some(ConnectionCallback::Connected(provider)) => {
                tracing::info!(provider = %provider, "Account connected");
                self.refresh().await?;
            }
            Some(ConnectionCallback::Failed(provider)) => {
                tracing::warn!(provider = %provider, "Account connection failed");
            }
            None => {}
        }
        Ok(callback)
    }

    /// Details of the linked Facebook page/account.
    pub async fn facebook_account_info(&self) -> Result<serde_json::Value> {
        self.api.get_json("/posts/facebook/account").await
    }
}
