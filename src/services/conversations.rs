// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversation CRUD.

use crate::error::{ClientError, Result};
use crate::models::{Conversation, ConversationDetail};
use crate::services::ApiClient;
use serde_json::json;

/// Client for `/conversations`.
#[derive(Clone)]
pub struct ConversationService {
    api: ApiClient,
}

impl ConversationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create a new empty conversation.
    pub async fn create(&self) -> Result<Conversation> {
        let conversation: Conversation = self.api.post_json("/conversations", &json!({})).await?;
        tracing::info!(conversation_id = conversation.id, "Conversation created");
        Ok(conversation)
    }

    /// List the user's conversations.
    pub async fn list(&self) -> Result<Vec<Conversation>> {
        self.api.get_json("/conversations").await
    }

    /// Fetch a conversation with its messages.
    pub async fn get(&self, conversation_id: u64) -> Result<ConversationDetail> {
        self.api
            .get_json(&format!("/conversations/{}", conversation_id))
            .await
    }

    pub async fn delete(&self, conversation_id: u64) -> Result<()> {
        self.api
            .delete(&format!("/conversations/{}", conversation_id))
            .await?;
        tracing::info!(conversation_id, "Conversation deleted");
        Ok(())
    }

    /// Rename a conversation.
    pub async fn update_title(&self, conversation_id: u64, title: &str) -> Result<Conversation> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::Validation("title must not be empty".to_string()));
        }

        self.api
            .patch_json(
                &format!("/conversations/{}/title", conversation_id),
                &json!({ "title": title }),
            )
            .await
    }
}
