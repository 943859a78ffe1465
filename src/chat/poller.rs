// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversation polling task.
//!
//! While any loaded message is still generating media, the conversation is
//! re-fetched on a fixed interval. The task stops itself as soon as nothing
//! is processing, and can be cancelled at any time through its handle.

use super::{PendingFetch, Shared};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running poll task.
pub(crate) struct PollHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop future ticks. A fetch already in flight may still complete; its
    /// result is discarded by the generation check.
    pub fn cancel(self) {
        self.task.abort();
    }
}

/// Spawn a poll task for `generation`.
pub(crate) fn spawn(shared: Arc<Shared>, generation: u64) -> PollHandle {
    let task = tokio::spawn(poll_loop(shared, generation));
    PollHandle { generation, task }
}

async fn poll_loop(shared: Arc<Shared>, generation: u64) {
    let mut ticker = tokio::time::interval(shared.timings.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; wait a full interval first.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let (conversation_id, pending) = {
            let mut state = shared.lock();
            if state.poll_generation != generation {
                return;
            }

            if !state.has_processing_media() {
                tracing::debug!(generation, "No media in progress, polling stopped");
                state.poll = None;
                return;
            }

            let Some(conversation_id) = state.conversation_id else {
                state.poll = None;
                return;
            };

            if state.fetches_in_flight > 0 {
                tracing::debug!(conversation_id, "Fetch still in flight, skipping poll tick");
                continue;
            }

            (conversation_id, PendingFetch::begin(&shared, &mut state))
        };

        tracing::debug!(conversation_id, generation, "Polling conversation");
        let result = shared.chatbot.conversation_history(conversation_id).await;

        let mut state = shared.lock();
        let fresh = pending.finish(&mut state);
        if state.poll_generation != generation {
            tracing::debug!(generation, "Dropping poll result after cancellation");
            return;
        }

        match result {
            Ok(detail) => {
                if fresh && state.conversation_id == Some(detail.id) {
                    state.messages = detail.messages;
                }
            }
            Err(e) if e.is_auth_error() => {
                tracing::warn!(error = %e, "Session rejected while polling, polling stopped");
                state.poll_generation += 1;
                state.poll = None;
                return;
            }
            Err(e) => {
                tracing::error!(conversation_id, error = %e, "Poll fetch failed");
            }
        }
    }
}
