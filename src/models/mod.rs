// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the publishing backend API.

pub mod conversation;
pub mod network;
pub mod social;

pub use conversation::{
    file_name_from_path, Conversation, ConversationDetail, MediaInfo, MediaStatus, Message,
    MessageContent, Publication, Role, SocialNetworkContent, PUBLISHED_STATE,
};
pub use network::Network;
pub use social::{ConnectUrl, ConnectedAccounts, SocialAccount};
