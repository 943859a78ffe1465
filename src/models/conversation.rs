// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversation and message models as returned by the backend.

use super::Network;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Publication state value meaning "already published".
pub const PUBLISHED_STATE: &str = "publicado";

/// Conversation summary (list endpoints).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Conversation with its ordered messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Media generation status of an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    ProcessingMedia,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: MessageContent,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Generated media description for one network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "guion", default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(rename = "ruta", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Publication outcome recorded by the backend for one network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "publishId", default, skip_serializing_if = "Option::is_none")]
    pub publish_id: Option<String>,
    #[serde(rename = "mensaje", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Per-network content embedded in an assistant message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialNetworkContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_info: Option<MediaInfo>,
    #[serde(rename = "publicacion", default, skip_serializing_if = "Option::is_none")]
    pub publication: Option<Publication>,
}

impl SocialNetworkContent {
    /// Path of the generated media file, if any.
    pub fn media_path(&self) -> Option<&str> {
        self.media_info
            .as_ref()
            .and_then(|m| m.path.as_deref())
            .filter(|p| !p.is_empty())
    }

    /// True once the backend recorded a successful publication.
    pub fn is_published(&self) -> bool {
        self.publication
            .as_ref()
            .and_then(|p| p.state.as_deref())
            == Some(PUBLISHED_STATE)
    }
}

/// Structured message payload. Keys the client does not model are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaStatus>,
    #[serde(rename = "TikTok", default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<SocialNetworkContent>,
    #[serde(rename = "Facebook", default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<SocialNetworkContent>,
    #[serde(rename = "Instagram", default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<SocialNetworkContent>,
    #[serde(rename = "LinkedIn", default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<SocialNetworkContent>,
    #[serde(rename = "WhatsApp", default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<SocialNetworkContent>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl MessageContent {
    /// Plain-text content.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// This message's entry for `network`.
    pub fn network(&self, network: Network) -> Option<&SocialNetworkContent> {
        match network {
            Network::TikTok => self.tiktok.as_ref(),
            Network::Facebook => self.facebook.as_ref(),
            Network::Instagram => self.instagram.as_ref(),
            Network::LinkedIn => self.linkedin.as_ref(),
            Network::WhatsApp => self.whatsapp.as_ref(),
        }
    }

    /// Networks that have an entry in this content.
    pub fn networks(&self) -> impl Iterator<Item = (Network, &SocialNetworkContent)> {
        Network::ALL
            .into_iter()
            .filter_map(move |n| self.network(n).map(|c| (n, c)))
    }
}

impl Message {
    /// True while the assistant is still generating media.
    pub fn is_processing(&self) -> bool {
        self.content.status == Some(MediaStatus::ProcessingMedia)
    }

    /// Assistant message, generation completed, media present for `network`.
    pub fn can_publish_to(&self, network: Network) -> bool {
        self.role == Role::Assistant
            && self.content.status == Some(MediaStatus::Completed)
            && self
                .content
                .network(network)
                .and_then(SocialNetworkContent::media_path)
                .is_some()
    }

    /// True if the backend already published this message to `network`.
    pub fn is_published_to(&self, network: Network) -> bool {
        self.content
            .network(network)
            .is_some_and(SocialNetworkContent::is_published)
    }

    /// Publishable and not yet published.
    pub fn is_publish_ready(&self, network: Network) -> bool {
        self.can_publish_to(network) && !self.is_published_to(network)
    }
}

/// Accept object, JSON-encoded object, bare string, or null content.
fn deserialize_content<'de, D>(deserializer: D) -> Result<MessageContent, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(MessageContent::default()),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(obj @ Value::Object(_)) => {
                serde_json::from_value(obj).map_err(serde::de::Error::custom)
            }
            _ => Ok(MessageContent::from_text(text)),
        },
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

/// Last path segment of a media path, for either separator.
pub fn file_name_from_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or_default()
}
