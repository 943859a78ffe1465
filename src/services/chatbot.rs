// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chatbot prompts and publish-from-message requests.

use crate::error::Result;
use crate::models::{ConversationDetail, Network};
use crate::services::ApiClient;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptRequest<'a> {
    prompt: &'a str,
    conversation_id: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishRequest {
    message_id: u64,
}

/// Backend reply to a publish request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub publish_id: Option<String>,
}

/// Client for the chatbot and per-network publishing endpoints.
#[derive(Clone)]
pub struct ChatbotService {
    api: ApiClient,
}

impl ChatbotService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Send a prompt to the assistant within a conversation.
    pub async fn send_message(
        &self,
        prompt: &str,
        conversation_id: u64,
    ) -> Result<serde_json::Value> {
        self.api
            .post_json(
                "/chatbot/redes",
                &PromptRequest {
                    prompt,
                    conversation_id,
                },
            )
            .await
    }

    /// Full message history of a conversation.
    pub async fn conversation_history(&self, conversation_id: u64) -> Result<ConversationDetail> {
        self.api
            .get_json(&format!("/conversations/{}", conversation_id))
            .await
    }

    /// Ask the backend to publish a message's generated media to `network`.
    pub async fn publish_from_message(
        &self,
        network: Network,
        message_id: u64,
    ) -> Result<PublishResponse> {
        let response: Option<PublishResponse> = self
            .api
            .post_json(
                &format!("/posts/{}/publish-from-message", network.slug()),
                &PublishRequest { message_id },
            )
            .await?;
        Ok(response.unwrap_or_default())
    }

    /// URL for previewing a generated media file.
    pub fn media_url(&self, file_name: &str) -> String {
        self.api
            .url(&format!("/media/{}", urlencoding::encode(file_name)))
    }
}
