// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Linking and unlinking social accounts.

mod common;

use axum::http::Method;
use common::MockBackend;
use multired_client::error::ClientError;
use multired_client::models::Network;
use multired_client::navigation::Route;
use multired_client::services::ConnectionCallback;

#[tokio::test]
async fn test_refresh_lists_connected_accounts() {
    let backend = MockBackend::start().await;
    let client = backend.logged_in_client();
    assert!(!client.social.is_connected(Network::TikTok));

    let accounts = client.social.refresh().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert!(accounts.is_connected("TikTok"));
    assert!(client.social.is_connected(Network::Facebook));
    assert!(!client.social.is_connected(Network::Instagram));
}

#[tokio::test]
async fn test_disconnect_deletes_then_refetches() {
    let backend = MockBackend::start().await;
    let client = backend.logged_in_client();
    client.social.refresh().await.unwrap();
    assert!(client.social.is_connected(Network::TikTok));

    let accounts = client.social.disconnect(Network::TikTok).await.unwrap();

    assert_eq!(
        backend.state.count(Method::DELETE, "/social-accounts/tiktok"),
        1
    );
    assert_eq!(backend.state.count(Method::GET, "/social-accounts"), 2);
    assert!(!accounts.is_connected("tiktok"));
    assert!(!client.social.is_connected(Network::TikTok));
    assert!(client.social.is_connected(Network::Facebook));
}

#[tokio::test]
async fn test_connect_returns_provider_url() {
    let backend = MockBackend::start().await;
    let client = backend.logged_in_client();

    let route = client.social.connect(Network::TikTok).await.unwrap();
    assert_eq!(
        route,
        Route::External("https://www.tiktok.com/v2/auth/authorize?state=abc".to_string())
    );

    let route = client.social.connect(Network::Facebook).await.unwrap();
    assert!(route.is_external());
    assert_eq!(
        backend
            .state
            .count(Method::POST, "/auth/connect/facebook/start"),
        1
    );
}

#[tokio::test]
async fn test_connect_without_session_routes_to_login() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let route = client.social.connect(Network::TikTok).await.unwrap();
    assert_eq!(route, Route::Login);
    assert!(backend.state.recorded().is_empty());
}

#[tokio::test]
async fn test_connect_unsupported_network() {
    let backend = MockBackend::start().await;
    let client = backend.logged_in_client();

    let err = client.social.connect(Network::LinkedIn).await.unwrap_err();
    assert!(matches!(err, ClientError::UnsupportedNetwork(_)));
    assert!(backend.state.recorded().is_empty());
}

#[tokio::test]
async fn test_connection_callback() {
    let backend = MockBackend::start().await;
    let client = backend.logged_in_client();

    let result = client
        .social
        .handle_callback("http://localhost:4200/client?connected=tiktok")
        .await
        .unwrap();
    assert_eq!(result, Some(ConnectionCallback::Connected("tiktok".to_string())));
    assert_eq!(backend.state.count(Method::GET, "/social-accounts"), 1);

    let result = client
        .social
        .handle_callback("http://localhost:4200/client?error=facebook")
        .await
        .unwrap();
    assert_eq!(result, Some(ConnectionCallback::Failed("facebook".to_string())));
    assert_eq!(backend.state.count(Method::GET, "/social-accounts"), 1);
}

#[tokio::test]
async fn test_facebook_account_info() {
    let backend = MockBackend::start().await;
    let client = backend.logged_in_client();

    let info = client.social.facebook_account_info().await.unwrap();
    assert_eq!(info["pageName"], "Demo Page");
}
