// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Multired client: chat-driven media generation and multi-network publishing
//!
//! This crate is the client side of the Multired backend: it keeps the user
//! session, talks to the conversation/chatbot API, follows media generation
//! by polling, and publishes generated media to TikTok, Facebook, Instagram,
//! LinkedIn and WhatsApp.

pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;
pub mod shell;
pub mod time_utils;

use chat::{ChatOrchestrator, ChatTimings};
use config::Config;
use services::{
    ApiClient, AuthService, ChatbotService, ConversationService, SocialAccountService,
    UploadService,
};
use session::SharedSession;

/// All clients, wired to one session.
pub struct Client {
    pub config: Config,
    pub session: SharedSession,
    pub auth: AuthService,
    pub conversations: ConversationService,
    pub chatbot: ChatbotService,
    pub social: SocialAccountService,
    pub uploads: UploadService,
}

impl Client {
    /// Build every client against `config.api_url`, sharing `session`.
    pub fn new(config: Config, session: SharedSession) -> Self {
        let api = ApiClient::new(config.api_url.clone(), session.clone());
        Self {
            auth: AuthService::new(api.clone()),
            conversations: ConversationService::new(api.clone()),
            chatbot: ChatbotService::new(api.clone()),
            social: SocialAccountService::new(api.clone()),
            uploads: UploadService::new(api),
            config,
            session,
        }
    }

    /// Session persisted in `config.token_file`.
    pub fn from_config(config: Config) -> Self {
        let session = session::Session::open_file(config.token_file.clone());
        Self::new(config, session)
    }

    /// A chat orchestrator using this client's chatbot and timings.
    pub fn chat(&self) -> ChatOrchestrator {
        ChatOrchestrator::new(self.chatbot.clone(), ChatTimings::from(&self.config))
    }
}
