//! Session-scoped conversation state for the interactive chat surface.
//!
//! The chat UI owns one `ChatSession` per user session and drives it through
//! the same completion-service boundary the extraction passes use. The
//! extraction pipeline never touches this state.

use std::sync::mpsc;

use crate::completion::{ChatTurn, CompletionClient, CompletionError, CompletionRequest};
use crate::config;

/// Accumulated conversation turns plus the model they are sent to.
#[derive(Debug, Clone)]
pub struct ChatSession {
    model: String,
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_model(config::DEFAULT_CHAT_MODEL)
    }

    pub fn with_model(model: &str) -> Self {
        Self {
            model: model.to_string(),
            turns: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Every turn so far, oldest first.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn push_user(&mut self, content: &str) {
        self.turns.push(ChatTurn::user(content));
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.turns.push(ChatTurn::assistant(content));
    }

    /// A request carrying the whole conversation so far. Chat sends no
    /// system instruction; the accumulated turns are the full context.
    pub fn request(&self, stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system: String::new(),
            turns: self.turns.clone(),
            stream,
        }
    }

    /// Send a user message and stream the reply. Fragments arrive on
    /// `token_tx` as they are generated; the assembled reply is recorded as
    /// an assistant turn and returned. On failure the user turn stays in the
    /// session, so a retry resends it.
    pub fn send_streaming(
        &mut self,
        client: &dyn CompletionClient,
        content: &str,
        token_tx: mpsc::Sender<String>,
    ) -> Result<String, CompletionError> {
        self.push_user(content);
        let request = self.request(true);
        let reply = client.complete_streaming(&request, token_tx)?;
        self.push_assistant(&reply);
        Ok(reply)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
