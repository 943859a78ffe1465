// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat and publish orchestration for one active conversation.
//!
//! [`ChatOrchestrator`] owns the message list of the selected conversation,
//! sends prompts, keeps the list fresh while media is being generated, and
//! dispatches publish requests for generated media. Dropping the
//! orchestrator cancels its poll task.

mod poller;
mod state;

pub use state::{Notice, NoticeKind};

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{Message, Network};
use crate::services::{ChatbotService, PublishResponse};
use state::ChatState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Timings that drive polling and notices.
#[derive(Debug, Clone, Copy)]
pub struct ChatTimings {
    pub poll_interval: Duration,
    pub success_notice: Duration,
    pub error_notice: Duration,
}

impl From<&Config> for ChatTimings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval,
            success_notice: config.success_notice,
            error_notice: config.error_notice,
        }
    }
}

impl Default for ChatTimings {
    fn default() -> Self {
        ChatTimings::from(&Config::default())
    }
}

/// State shared between the orchestrator and its background tasks.
pub(crate) struct Shared {
    chatbot: ChatbotService,
    timings: ChatTimings,
    state: Mutex<ChatState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Which busy flag a [`BusyGuard`] resets.
#[derive(Clone, Copy)]
enum Busy {
    Sending,
    Publishing,
}

/// Clears a busy flag when dropped, so a cancelled call never leaves the
/// view stuck in "sending" or "publishing".
struct BusyGuard<'a> {
    shared: &'a Shared,
    busy: Busy,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        match self.busy {
            Busy::Sending => state.is_sending = false,
            Busy::Publishing => state.publishing_message_id = None,
        }
    }
}

/// A registered conversation fetch. Dropping it before [`finish`] (the
/// awaiting future was aborted) still releases the in-flight slot.
///
/// [`finish`]: PendingFetch::finish
struct PendingFetch<'a> {
    shared: &'a Shared,
    seq: u64,
    done: bool,
}

impl<'a> PendingFetch<'a> {
    fn begin(shared: &'a Shared, state: &mut ChatState) -> Self {
        Self {
            shared,
            seq: state.begin_fetch(),
            done: false,
        }
    }

    /// Release the slot; true if this response is the newest seen.
    fn finish(mut self, state: &mut ChatState) -> bool {
        self.done = true;
        state.finish_fetch(self.seq)
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.shared.lock().finish_fetch(self.seq);
        }
    }
}

/// Drives the chat view of a single conversation.
pub struct ChatOrchestrator {
    shared: Arc<Shared>,
}

impl ChatOrchestrator {
    pub fn new(chatbot: ChatbotService, timings: ChatTimings) -> Self {
        Self {
            shared: Arc::new(Shared {
                chatbot,
                timings,
                state: Mutex::new(ChatState::default()),
            }),
        }
    }

    // ─── Conversation selection ─────────────────────────────────────────────

    /// Make `conversation_id` the active conversation: load its messages and
    /// start polling.
    pub async fn open_conversation(&self, conversation_id: u64) -> Result<()> {
        self.stop_polling();
        {
            let mut state = self.shared.lock();
            state.conversation_id = Some(conversation_id);
            state.messages.clear();
            state.clear_notices();
        }
        tracing::info!(conversation_id, "Conversation opened");

        self.reload_messages().await?;
        self.start_polling();
        Ok(())
    }

    /// Re-fetch the active conversation's messages.
    ///
    /// A response that arrives after a newer one, or after the active
    /// conversation changed, is discarded.
    pub async fn reload_messages(&self) -> Result<()> {
        let (conversation_id, pending) = {
            let mut state = self.shared.lock();
            let Some(id) = state.conversation_id else {
                return Ok(());
            };
            (id, PendingFetch::begin(&self.shared, &mut state))
        };

        let result = self
            .shared
            .chatbot
            .conversation_history(conversation_id)
            .await;

        let mut state = self.shared.lock();
        let fresh = pending.finish(&mut state);
        match result {
            Ok(detail) => {
                if fresh && state.conversation_id == Some(detail.id) {
                    tracing::debug!(
                        conversation_id,
                        count = detail.messages.len(),
                        "Messages loaded"
                    );
                    state.messages = detail.messages;
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(conversation_id, error = %e, "Failed to load messages");
                Err(e)
            }
        }
    }

    // ─── Sending ────────────────────────────────────────────────────────────

    /// Send a prompt to the assistant in the active conversation.
    ///
    /// On success the message list is reloaded and polling restarts from
    /// scratch.
    pub async fn send_message(&self, prompt: &str) -> Result<()> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ClientError::Validation("prompt must not be empty".to_string()));
        }

        let (conversation_id, busy) = {
            let mut state = self.shared.lock();
            if state.is_sending {
                return Err(ClientError::Validation(
                    "a message is already being sent".to_string(),
                ));
            }
            let id = state
                .conversation_id
                .ok_or_else(|| ClientError::Validation("no active conversation".to_string()))?;
            state.is_sending = true;
            (
                id,
                BusyGuard {
                    shared: &self.shared,
                    busy: Busy::Sending,
                },
            )
        };

        tracing::info!(conversation_id, "Sending prompt");
        let result = self.shared.chatbot.send_message(prompt, conversation_id).await;
        drop(busy);
        if let Err(e) = result {
            tracing::error!(conversation_id, error = %e, "Failed to send message");
            return Err(e);
        }

        // Already logged; the prompt itself went through.
        let _ = self.reload_messages().await;
        self.restart_polling();
        Ok(())
    }

    // ─── Polling ────────────────────────────────────────────────────────────

    /// Start polling if it is not already running.
    pub fn start_polling(&self) {
        let mut state = self.shared.lock();
        if state.poll.is_some() {
            return;
        }
        state.poll_generation += 1;
        let generation = state.poll_generation;
        state.poll = Some(poller::spawn(Arc::clone(&self.shared), generation));
        tracing::debug!(generation, "Polling started");
    }

    /// Cancel the poll task, if any. No result fetched by it is applied
    /// afterwards.
    pub fn stop_polling(&self) {
        let handle = {
            let mut state = self.shared.lock();
            state.poll_generation += 1;
            state.poll.take()
        };
        if let Some(handle) = handle {
            tracing::debug!(generation = handle.generation(), "Polling stopped");
            handle.cancel();
        }
    }

    /// Cancel any running poll task and start a fresh one.
    pub fn restart_polling(&self) {
        self.stop_polling();
        self.start_polling();
    }

    pub fn is_polling(&self) -> bool {
        self.shared.lock().poll.is_some()
    }

    /// Wait until the poll task has stopped (all media settled, or cancelled).
    pub async fn wait_until_settled(&self) {
        let step = self.shared.timings.poll_interval / 4;
        while self.is_polling() {
            tokio::time::sleep(step.max(Duration::from_millis(10))).await;
        }
    }

    /// [`wait_until_settled`](Self::wait_until_settled), giving up after
    /// `limit`. Returns false on timeout; polling is left running.
    pub async fn wait_until_settled_for(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.wait_until_settled())
            .await
            .is_ok()
    }

    // ─── Publishing ─────────────────────────────────────────────────────────

    /// Publish a message's media to a network given by name.
    ///
    /// Unknown names fail locally with an error notice and no request.
    pub async fn publish_by_name(&self, message_id: u64, network: &str) -> Result<PublishResponse> {
        match network.parse::<Network>() {
            Ok(network) => self.publish(message_id, network).await,
            Err(e) => {
                tracing::warn!(message_id, network, "Unsupported network");
                self.show_notice(NoticeKind::Error, e.to_string());
                Err(e)
            }
        }
    }

    /// Publish a loaded, publish-ready message's media to `network`.
    ///
    /// Only one publish may be outstanding at a time. On success a success
    /// notice is shown and the conversation reloaded; on failure an error
    /// notice carries the backend's message.
    pub async fn publish(&self, message_id: u64, network: Network) -> Result<PublishResponse> {
        let busy = {
            let mut state = self.shared.lock();
            if let Some(current) = state.publishing_message_id {
                return Err(ClientError::PublishInFlight(current));
            }

            let check = match state.messages.iter().find(|m| m.id == message_id) {
                None => Err(ClientError::NotFound(format!("message {}", message_id))),
                Some(m) if m.is_published_to(network) => Err(ClientError::Validation(format!(
                    "message {} is already published to {}",
                    message_id, network
                ))),
                Some(m) if !m.can_publish_to(network) => Err(ClientError::Validation(format!(
                    "message {} has no completed {} media",
                    message_id, network
                ))),
                Some(_) => Ok(()),
            };
            if let Err(e) = check {
                drop(state);
                tracing::warn!(message_id, %network, error = %e, "Message not publishable");
                self.show_notice(NoticeKind::Error, e.to_string());
                return Err(e);
            }

            state.publishing_message_id = Some(message_id);
            state.clear_notices();
            BusyGuard {
                shared: &self.shared,
                busy: Busy::Publishing,
            }
        };

        tracing::info!(message_id, %network, "Publishing message");
        let result = self
            .shared
            .chatbot
            .publish_from_message(network, message_id)
            .await;
        drop(busy);

        match result {
            Ok(response) => {
                let text = response
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("Publicado exitosamente en {}", network));
                tracing::info!(message_id, %network, "Published");
                self.show_notice(NoticeKind::Success, text);
                // Already logged; the publish itself succeeded.
                let _ = self.reload_messages().await;
                Ok(response)
            }
            Err(e) => {
                tracing::error!(message_id, %network, error = %e, "Publish failed");
                let text = e
                    .backend_message()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("Error al publicar en {}", network));
                self.show_notice(NoticeKind::Error, text);
                Err(e)
            }
        }
    }

    // ─── Notices ────────────────────────────────────────────────────────────

    /// Show a notice that clears itself after the configured delay, unless
    /// it has been replaced by then.
    fn show_notice(&self, kind: NoticeKind, text: String) {
        let delay = match kind {
            NoticeKind::Success => self.shared.timings.success_notice,
            NoticeKind::Error => self.shared.timings.error_notice,
        };
        let seq = self.shared.lock().set_notice(kind, text);

        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.lock().expire_notice(kind, seq);
            }
        });
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn conversation_id(&self) -> Option<u64> {
        self.shared.lock().conversation_id
    }

    pub fn messages(&self) -> Vec<Message> {
        self.shared.lock().messages.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.shared.lock().is_sending
    }

    pub fn publishing_message_id(&self) -> Option<u64> {
        self.shared.lock().publishing_message_id
    }

    pub fn success_notice(&self) -> Option<String> {
        self.shared.lock().success.as_ref().map(|n| n.text.clone())
    }

    pub fn error_notice(&self) -> Option<String> {
        self.shared.lock().error.as_ref().map(|n| n.text.clone())
    }

    /// True if `message_id` is loaded and publish-ready for `network`.
    pub fn can_publish(&self, message_id: u64, network: Network) -> bool {
        self.shared
            .lock()
            .messages
            .iter()
            .any(|m| m.id == message_id && m.is_publish_ready(network))
    }
}

impl Drop for ChatOrchestrator {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
