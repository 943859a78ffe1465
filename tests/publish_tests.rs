// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Publishing generated media from a chat message.

mod common;

use axum::http::{Method, StatusCode};
use common::{completed_message, conversation, processing_message, published_message, MockBackend};
use multired_client::error::ClientError;
use multired_client::models::Network;
use serde_json::json;
use std::time::Duration;

const HISTORY_PATH: &str = "/conversations/5";
const TIKTOK_PUBLISH_PATH: &str = "/posts/tiktok/publish-from-message";

#[tokio::test]
async fn test_publish_shows_notice_and_reloads() {
    let backend = MockBackend::start().await;
    backend
        .state
        .set_conversation(conversation(5, vec![completed_message(42)]));
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();
    assert!(chat.can_publish(42, Network::TikTok));
    assert!(!chat.can_publish(42, Network::Facebook));

    let loads_before = backend.state.count(Method::GET, HISTORY_PATH);
    backend
        .state
        .set_conversation(conversation(5, vec![published_message(42)]));

    let response = chat.publish_by_name(42, "TikTok").await.unwrap();
    assert_eq!(response.publish_id.as_deref(), Some("p-1"));

    let request = backend.state.last(Method::POST, TIKTOK_PUBLISH_PATH).unwrap();
    assert_eq!(request.json(), json!({ "messageId": 42 }));

    assert_eq!(chat.success_notice().as_deref(), Some("ok"));
    assert_eq!(chat.publishing_message_id(), None);
    assert_eq!(backend.state.count(Method::GET, HISTORY_PATH), loads_before + 1);
    assert!(chat.messages()[0].is_published_to(Network::TikTok));
    assert!(!chat.can_publish(42, Network::TikTok));

    // Success notices clear themselves after the configured 150 ms.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(chat.success_notice(), None);
}

#[tokio::test]
async fn test_default_success_text() {
    let backend = MockBackend::start().await;
    backend
        .state
        .set_conversation(conversation(5, vec![completed_message(42)]));
    *backend.state.publish_reply.lock().unwrap() = (StatusCode::OK, json!({}));
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();

    chat.publish(42, Network::TikTok).await.unwrap();
    assert_eq!(
        chat.success_notice().as_deref(),
        Some("Publicado exitosamente en TikTok")
    );
}

#[tokio::test]
async fn test_unsupported_network_sends_nothing() {
    let backend = MockBackend::start().await;
    backend
        .state
        .set_conversation(conversation(5, vec![completed_message(42)]));
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();
    let requests_before = backend.state.recorded().len();

    let err = chat.publish_by_name(42, "MySpace").await.unwrap_err();
    assert!(matches!(err, ClientError::UnsupportedNetwork(_)));
    assert_eq!(
        chat.error_notice().as_deref(),
        Some("Red social MySpace no soportada")
    );
    assert_eq!(backend.state.recorded().len(), requests_before);
}

#[tokio::test]
async fn test_network_names_are_case_insensitive() {
    let backend = MockBackend::start().await;
    backend
        .state
        .set_conversation(conversation(5, vec![completed_message(42)]));
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();

    chat.publish_by_name(42, "tiktok").await.unwrap();
    assert_eq!(backend.state.count(Method::POST, TIKTOK_PUBLISH_PATH), 1);
}

#[tokio::test]
async fn test_second_publish_while_in_flight_is_rejected() {
    let backend = MockBackend::start().await;
    backend
        .state
        .set_conversation(conversation(5, vec![completed_message(42)]));
    *backend.state.publish_delay.lock().unwrap() = Duration::from_millis(200);
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();

    let (first, second) = tokio::join!(chat.publish(42, Network::TikTok), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(chat.publishing_message_id(), Some(42));
        chat.publish(42, Network::TikTok).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(ClientError::PublishInFlight(42))));
    assert_eq!(backend.state.count(Method::POST, TIKTOK_PUBLISH_PATH), 1);
    assert_eq!(chat.publishing_message_id(), None);
}

#[tokio::test]
async fn test_backend_failure_shows_backend_message() {
    let backend = MockBackend::start().await;
    backend
        .state
        .set_conversation(conversation(5, vec![completed_message(42)]));
    *backend.state.publish_reply.lock().unwrap() = (
        StatusCode::BAD_REQUEST,
        json!({ "message": "Cuenta de TikTok no conectada" }),
    );
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();

    let err = chat.publish(42, Network::TikTok).await.unwrap_err();
    assert_eq!(err.backend_message(), Some("Cuenta de TikTok no conectada"));
    assert_eq!(
        chat.error_notice().as_deref(),
        Some("Cuenta de TikTok no conectada")
    );
    assert_eq!(chat.success_notice(), None);
    assert_eq!(chat.publishing_message_id(), None);

    // Error notices last longer (200 ms here) but still clear.
    tokio::time::sleep(Duration::from_millis(450)).await;
    assert_eq!(chat.error_notice(), None);
}

#[tokio::test]
async fn test_backend_failure_without_message_uses_default_text() {
    let backend = MockBackend::start().await;
    backend
        .state
        .set_conversation(conversation(5, vec![completed_message(42)]));
    *backend.state.publish_reply.lock().unwrap() =
        (StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();

    assert!(chat.publish(42, Network::TikTok).await.is_err());
    assert_eq!(
        chat.error_notice().as_deref(),
        Some("Error al publicar en TikTok")
    );
}

#[tokio::test]
async fn test_ineligible_messages_are_not_sent() {
    let backend = MockBackend::start().await;
    backend.state.set_conversation(conversation(
        5,
        vec![published_message(42), processing_message(43)],
    ));
    let client = backend.logged_in_client();
    let chat = client.chat();
    chat.open_conversation(5).await.unwrap();
    chat.stop_polling();

    assert!(matches!(
        chat.publish(42, Network::TikTok).await,
        Err(ClientError::Validation(_))
    ));
    assert!(matches!(
        chat.publish(43, Network::TikTok).await,
        Err(ClientError::Validation(_))
    ));
    assert!(matches!(
        chat.publish(99, Network::TikTok).await,
        Err(ClientError::NotFound(_))
    ));
    assert!(chat.error_notice().is_some());
    assert_eq!(backend.state.count(Method::POST, TIKTOK_PUBLISH_PATH), 0);
}
