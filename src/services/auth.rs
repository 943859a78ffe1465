// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration, login and OAuth callback handling.

use crate::error::{ClientError, Result};
use crate::navigation::Route;
use crate::services::ApiClient;
use serde::{Deserialize, Serialize};

/// Social providers that can be used to sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginProvider {
    Google,
    Facebook,
}

impl LoginProvider {
    fn slug(self) -> &'static str {
        match self {
            LoginProvider::Google => "google",
            LoginProvider::Facebook => "facebook",
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Login response from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authentication client.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<serde_json::Value> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "name, email and password are required".to_string(),
            ));
        }

        let response = self
            .api
            .post_json_public(
                "/auth/register",
                &RegisterRequest {
                    name: name.trim(),
                    email: email.trim(),
                    password,
                },
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Registration failed"))?;

        tracing::info!(email = %email.trim(), "User registered");
        Ok(response)
    }

    /// Log in and store the returned token. On success the caller should
    /// navigate to the returned route (the chat view).
    pub async fn login(&self, email: &str, password: &str) -> Result<Route> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Por favor, ingrese su email y contraseña".to_string(),
            ));
        }

        let response: LoginResponse = self
            .api
            .post_json_public(
                "/auth/login",
                &LoginRequest {
                    email: email.trim(),
                    password,
                },
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Login failed"))?;

        if response.token.is_empty() {
            return Err(ClientError::InvalidToken);
        }

        self.api.session().set_token(&response.token)?;
        tracing::info!(email = %email.trim(), user_id = ?self.api.session().user_id(), "Logged in");
        Ok(Route::Chat)
    }

    /// Entry URL for signing in with a social provider (full-page redirect).
    pub fn oauth_login_url(&self, provider: LoginProvider) -> Route {
        Route::External(self.api.url(&format!("/auth/{}", provider.slug())))
    }

    /// Capture the token the backend appends to the OAuth callback URL.
    pub fn handle_oauth_callback(&self, callback_url: &str) -> Result<Route> {
        let url = reqwest::Url::parse(callback_url)
            .map_err(|e| ClientError::Validation(format!("invalid callback URL: {}", e)))?;

        let token = url
            .query_pairs()
            .find(|(k, _)| k == "token")
            .map(|(_, v)| v.into_owned())
            .filter(|t| !t.is_empty());

        match token {
            Some(token) => {
                self.api.session().set_token(&token)?;
                tracing::info!("OAuth login token captured");
                Ok(Route::Client)
            }
            None => {
                tracing::error!("No token found in OAuth callback URL");
                Err(ClientError::InvalidToken)
            }
        }
    }

    /// Clear the session. The caller should navigate to the returned route.
    pub fn logout(&self) -> Result<Route> {
        self.api.session().logout()
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }
}
