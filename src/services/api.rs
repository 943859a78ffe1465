// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Low-level HTTP client for the publishing backend.
//!
//! Handles:
//! - Attaching the session bearer token
//! - JSON, form and multipart request bodies
//! - Mapping non-success responses to typed errors

use crate::error::{ClientError, Result};
use crate::session::SharedSession;
use serde::{de::DeserializeOwned, Serialize};

/// Backend API client bound to a session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SharedSession,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>, session: SharedSession) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Absolute URL for an API path starting with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Unauthenticated JSON POST (login, register).
    pub async fn post_json_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error("POST", path, e))?;

        self.check_response_json(path, response, false).await
    }

    /// Authenticated GET with JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.session.require_token()?;
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.transport_error("GET", path, e))?;

        self.check_response_json(path, response, true).await
    }

    /// Authenticated POST with JSON body and response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.session.require_token()?;
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error("POST", path, e))?;

        self.check_response_json(path, response, true).await
    }

    /// Authenticated PATCH with JSON body and response.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.session.require_token()?;
        let response = self
            .http
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error("PATCH", path, e))?;

        self.check_response_json(path, response, true).await
    }

    /// Authenticated DELETE. The response body, if any, is returned as JSON.
    pub async fn delete(&self, path: &str) -> Result<serde_json::Value> {
        let token = self.session.require_token()?;
        let response = self
            .http
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.transport_error("DELETE", path, e))?;

        self.check_response_json(path, response, true).await
    }

    /// Authenticated multipart POST.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let token = self.session.require_token()?;
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error("POST", path, e))?;

        self.check_response_json(path, response, true).await
    }

    fn transport_error(&self, method: &str, path: &str, err: reqwest::Error) -> ClientError {
        tracing::error!(method, path, error = %err, "Backend request failed");
        ClientError::Http(err.to_string())
    }

    /// Check response status and parse the JSON body.
    ///
    /// A 401 on an `authenticated` call means the session is gone; on a
    /// public call (bad credentials) it is an ordinary backend error. An
    /// empty success body parses as JSON `null`.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
        authenticated: bool,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(path, status = status.as_u16(), error = %e, "Failed to read backend response body");
            ClientError::Http(format!("failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            if authenticated && status.as_u16() == 401 {
                tracing::warn!(path, "Backend rejected session token (401)");
                return Err(ClientError::Unauthorized);
            }

            let err = ClientError::from_backend(status.as_u16(), &body);
            tracing::error!(path, status = status.as_u16(), error = %err, "Backend returned error");

            if status.as_u16() == 404 {
                return Err(ClientError::NotFound(
                    err.backend_message().unwrap_or(path).to_string(),
                ));
            }
            return Err(err);
        }

        let body = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(path, error = %e, "Failed to parse backend response");
            ClientError::Http(format!("JSON parse error: {}", e))
        })
    }
}
