//! Request side of the chat-completion assistant.
//!
//! This module builds chat-completions requests, enforces the client-side
//! rate limit, and turns backend failures into supportive fallback replies.
//! The HTTPS transport is supplied by the caller through [`ChatBackend`].

use crate::config::{ChatConfig, Config, JournalConfig};
use crate::journal::{append_conversation, conversation_history};
use crate::matcher::suggest_for_draft;
use crate::store::KeyValueStore;
use crate::Suggestion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const SYSTEM_PROMPT: &str = "You are a compassionate AI therapist specializing in PTSD and trauma support. \
You provide evidence-based guidance using DBT/CBT techniques. Always:

- Be empathetic and validating
- Prioritize safety - if someone mentions self-harm or suicide, immediately provide crisis resources
- Suggest specific grounding, breathing, or coping techniques when appropriate
- Keep responses concise but supportive (2-3 sentences max unless crisis situation)
- Never diagnose or replace professional therapy
- Focus on immediate coping strategies

Crisis resources to provide when needed:
- National Suicide Prevention Lifeline: 988
- Crisis Text Line: Text HOME to 741741
- Veterans Crisis Line: 1-800-273-8255
- Emergency Services: 911";

pub const RATE_LIMITED_REPLY: &str = "You're sending messages too quickly. Please wait a moment before trying again. Take a deep breath.";
pub const MISSING_KEY_REPLY: &str = "I'm here to support you. While I can't provide AI responses right now, I can suggest helpful techniques. Try the Tools tab for grounding exercises, breathing techniques, and coping strategies.";
pub const TIMEOUT_REPLY: &str = "Connection timeout. Please check your internet connection and try again. The Tools tab has offline techniques you can use now.";
pub const NETWORK_REPLY: &str = "Unable to connect. Please check your internet connection and try again. The Tools tab has offline techniques you can use now.";
pub const GENERIC_REPLY: &str = "I'm having trouble responding right now. Try the Tools tab for helpful coping techniques, or try again in a moment.";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of a chat-completions request
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Transport deadline; not part of the JSON body
    #[serde(skip)]
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// Extract the first choice's text from a chat-completions response body
pub fn parse_completion(body: &str) -> Result<String, ChatError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| ChatError::Malformed(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ChatError::Malformed("response has no choices".into()))
}

/// System prompt, the newest `history_window` prior turns, then `message`.
///
/// System messages in `history` are never forwarded.
pub fn build_request(config: &ChatConfig, history: &[ChatMessage], message: &str) -> ChatRequest {
    let prior: Vec<&ChatMessage> = history
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .collect();
    let start = prior.len().saturating_sub(config.history_window);

    let mut messages = Vec::with_capacity(prior.len() - start + 2);
    messages.push(ChatMessage {
        role: ChatRole::System,
        content: SYSTEM_PROMPT.to_string(),
    });
    messages.extend(prior[start..].iter().map(|m| (*m).clone()));
    messages.push(ChatMessage::user(message));

    ChatRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        timeout: Duration::from_secs(config.timeout_secs),
    }
}

// ============================================================================
// Rate Limiting
// ============================================================================

/// Sliding-window limiter: at most `max_requests` per `window`
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    sent: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            sent: VecDeque::with_capacity(max_requests),
        }
    }

    /// Record a request at `now` if the window has room; returns whether it did
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        while let Some(oldest) = self.sent.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.sent.pop_front();
            } else {
                break;
            }
        }

        if self.sent.len() >= self.max_requests {
            return false;
        }
        self.sent.push_back(now);
        true
    }
}

// ============================================================================
// Backend and Session
// ============================================================================

/// Failure modes of a chat-completion backend
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ChatError {
    /// Supportive text shown in place of an assistant reply
    pub fn fallback_reply(&self) -> &'static str {
        match self {
            ChatError::MissingApiKey => MISSING_KEY_REPLY,
            ChatError::Timeout => TIMEOUT_REPLY,
            ChatError::Network(_) => NETWORK_REPLY,
            ChatError::Status { .. } | ChatError::Malformed(_) => GENERIC_REPLY,
        }
    }
}

/// Transport that performs a chat-completions call
pub trait ChatBackend {
    fn complete(&mut self, api_key: &str, request: &ChatRequest) -> Result<String, ChatError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    Answered,
    RateLimited,
    Fallback,
}

/// What the user sees after sending a message
#[derive(Clone, Debug)]
pub struct ChatReply {
    pub text: String,
    pub outcome: ReplyOutcome,
    /// Techniques matching the outgoing message
    pub suggestions: Vec<Suggestion>,
}

/// A conversation with a backend.
///
/// The in-memory history holds only answered exchanges and is capped at
/// `journal.conversation_limit` messages, oldest dropped first.
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    config: ChatConfig,
    journal: JournalConfig,
    suggest_after_chars: usize,
    limiter: RateLimiter,
    history: Vec<ChatMessage>,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B, config: &Config) -> Self {
        let limiter = RateLimiter::new(
            config.chat.rate_limit,
            Duration::from_secs(config.chat.rate_window_secs),
        );
        Self {
            backend,
            config: config.chat.clone(),
            journal: config.journal.clone(),
            suggest_after_chars: config.matcher.suggest_after_chars,
            limiter,
            history: Vec::new(),
        }
    }

    /// Seed the session with an earlier conversation
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self.trim_history();
        self
    }

    /// Resume the conversation stored in `store`
    pub fn resume<S: KeyValueStore + ?Sized>(self, store: &S) -> crate::Result<Self> {
        let stored = conversation_history(store)?;
        Ok(self.with_history(stored.into_iter().map(|entry| entry.message).collect()))
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn trim_history(&mut self) {
        if self.history.len() > self.journal.conversation_limit {
            let excess = self.history.len() - self.journal.conversation_limit;
            self.history.drain(..excess);
        }
    }

    /// Send `message` at `now`. Never fails: every error becomes a fallback reply.
    pub fn send(&mut self, message: &str, now: Instant) -> ChatReply {
        let message = message.trim();
        let suggestions = suggest_for_draft(message, self.suggest_after_chars);

        if !self.limiter.try_acquire(now) {
            tracing::warn!("Chat rate limit reached, not sending");
            return ChatReply {
                text: RATE_LIMITED_REPLY.to_string(),
                outcome: ReplyOutcome::RateLimited,
                suggestions,
            };
        }

        let result = match self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(api_key) => {
                let request = build_request(&self.config, &self.history, message);
                self.backend.complete(api_key, &request)
            }
            None => Err(ChatError::MissingApiKey),
        };

        match result {
            Ok(text) => {
                self.history.push(ChatMessage::user(message));
                self.history.push(ChatMessage::assistant(text.clone()));
                self.trim_history();
                ChatReply {
                    text,
                    outcome: ReplyOutcome::Answered,
                    suggestions,
                }
            }
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                ChatReply {
                    text: e.fallback_reply().to_string(),
                    outcome: ReplyOutcome::Fallback,
                    suggestions,
                }
            }
        }
    }

    /// [`send`](Self::send), then append an answered exchange to the stored
    /// conversation stamped `at`
    pub fn send_and_record<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        message: &str,
        now: Instant,
        at: DateTime<Utc>,
    ) -> crate::Result<ChatReply> {
        let reply = self.send(message, now);
        if reply.outcome == ReplyOutcome::Answered {
            let start = self.history.len().saturating_sub(2);
            for turn in &self.history[start..] {
                append_conversation(store, turn.clone(), &self.journal, at)?;
            }
        }
        Ok(reply)
    }
}
