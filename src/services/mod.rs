// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend API clients.

pub mod api;
pub mod auth;
pub mod chatbot;
pub mod conversations;
pub mod social;
pub mod uploads;

pub use api::ApiClient;
pub use auth::{AuthService, LoginProvider, LoginResponse};
pub use chatbot::{ChatbotService, PublishResponse};
pub use conversations::ConversationService;
pub use social::{ConnectionCallback, SocialAccountService};
pub use uploads::{MediaFile, UploadService};
