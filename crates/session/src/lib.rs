//! Per-widget conversation state.
//!
//! A `Conversation` owns one append-only transcript. User turns are
//! classified and resolved immediately, and the bot turn is staged until
//! `deliver_reply` is called, which lets a host insert the "thinking"
//! delay between the two. `ChatSession` does exactly that on a tokio
//! timer.

mod widget;

use std::time::Duration;

use chatbot_classifier::classify;
use chatbot_model::{Intent, Message, QuickReplyOption, ResponseEntry};
use chatbot_responses::{resolve, GREETING};
use thiserror::Error;

pub use widget::ChatSession;

/// Why a submission left the transcript untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("Previous reply is still pending")]
    ReplyPending,
}

/// Lifecycle of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing seeded yet
    Empty,
    /// Only the greeting is present
    Seeded,
    /// A user turn is waiting for its bot reply
    AwaitingReply,
    /// At least one exchange has happened
    Exchanged,
}

/// Default "thinking" delay before a bot reply.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cosmetic delay between a user turn and the bot reply (zero allowed)
    pub reply_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
        }
    }
}

impl SessionConfig {
    pub fn with_reply_delay(mut self, reply_delay: Duration) -> Self {
        self.reply_delay = reply_delay;
        self
    }
}

/// An append-only transcript with at most one staged bot reply.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    transcript: Vec<Message>,
    pending: Option<ResponseEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a conversation from an existing transcript.
    pub fn from_transcript(transcript: Vec<Message>) -> Self {
        Self {
            transcript,
            pending: None,
        }
    }

    /// Push the greeting. Only applies to an empty transcript.
    pub fn seed(&mut self) {
        if !self.transcript.is_empty() {
            tracing::debug!(len = self.transcript.len(), "Already seeded");
            return;
        }
        self.transcript.push(Message::bot(GREETING));
    }

    /// Append a user turn and stage the classified reply.
    ///
    /// Whitespace-only text and submissions made while a reply is pending
    /// are rejected without touching the transcript.
    pub fn submit_user_text(&mut self, text: &str) -> Result<Intent, SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if self.pending.is_some() {
            return Err(SubmitError::ReplyPending);
        }

        let intent = classify(text);
        self.transcript.push(Message::user(text));
        self.pending = Some(resolve(intent).clone());
        Ok(intent)
    }

    /// Append the option label as a user turn and stage its bound response.
    ///
    /// The label is not classified.
    pub fn select_quick_reply(&mut self, option: &QuickReplyOption) -> Result<(), SubmitError> {
        if self.pending.is_some() {
            return Err(SubmitError::ReplyPending);
        }

        self.transcript.push(Message::user(option.label.clone()));
        self.pending = Some(option.response.clone());
        Ok(())
    }

    /// Append the staged reply, if any.
    pub fn deliver_reply(&mut self) -> Option<&Message> {
        let response = self.pending.take()?;
        self.transcript.push(Message::from_response(&response));
        self.transcript.last()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.pending.is_some()
    }

    /// Quick replies are offered while the greeting is the only entry.
    pub fn should_show_quick_replies(&self) -> bool {
        self.transcript.len() == 1
    }

    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            return SessionState::AwaitingReply;
        }
        match self.transcript.len() {
            0 => SessionState::Empty,
            1 => SessionState::Seeded,
            _ => SessionState::Exchanged,
        }
    }
}
