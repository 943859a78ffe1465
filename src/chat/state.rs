// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory state of the active chat view.

use super::poller::PollHandle;
use crate::models::Message;

/// Kind of transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A self-clearing status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// Distinguishes a notice from a later one with the same text.
    pub(crate) seq: u64,
}

/// Everything the chat view renders, plus task bookkeeping.
#[derive(Default)]
pub(crate) struct ChatState {
    pub conversation_id: Option<u64>,
    pub messages: Vec<Message>,
    pub is_sending: bool,
    pub publishing_message_id: Option<u64>,

    pub success: Option<Notice>,
    pub error: Option<Notice>,
    pub notice_seq: u64,

    /// Bumped on every poll start/stop; a poll task only applies results
    /// while its captured generation is current.
    pub poll_generation: u64,
    pub poll: Option<PollHandle>,

    /// Conversation fetches currently awaiting a response.
    pub fetches_in_flight: u32,
    /// Sequence number handed to the next fetch.
    pub fetch_seq: u64,
    /// Sequence number of the newest fetch whose result was applied.
    pub applied_seq: u64,
}

impl ChatState {
    pub fn has_processing_media(&self) -> bool {
        self.messages.iter().any(Message::is_processing)
    }

    /// Replace the notice of `kind`, returning its sequence number.
    pub fn set_notice(&mut self, kind: NoticeKind, text: String) -> u64 {
        self.notice_seq += 1;
        let notice = Notice {
            kind,
            text,
            seq: self.notice_seq,
        };
        match kind {
            NoticeKind::Success => self.success = Some(notice),
            NoticeKind::Error => self.error = Some(notice),
        }
        self.notice_seq
    }

    /// Clear the notice of `kind` only if it is still the one numbered `seq`.
    pub fn expire_notice(&mut self, kind: NoticeKind, seq: u64) {
        let slot = match kind {
            NoticeKind::Success => &mut self.success,
            NoticeKind::Error => &mut self.error,
        };
        if slot.as_ref().is_some_and(|n| n.seq == seq) {
            *slot = None;
        }
    }

    pub fn clear_notices(&mut self) {
        self.success = None;
        self.error = None;
    }

    /// Register a new fetch and return its sequence number.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetches_in_flight += 1;
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Account for a finished fetch. Returns true if its result is the newest
    /// seen so far and should be applied.
    pub fn finish_fetch(&mut self, seq: u64) -> bool {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        if seq > self.applied_seq {
            self.applied_seq = seq;
            true
        } else {
            false
        }
    }
}
