use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use super::CompletionError;

/// Speaker of a prior conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single role-tagged turn sent to the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: &str) -> Self {
        Self {
            role: ChatRole::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.to_string(),
        }
    }
}

/// One request to the completion service: a system instruction, the ordered
/// prior turns, the target model, and whether to stream the response.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub turns: Vec<ChatTurn>,
    pub stream: bool,
}

impl CompletionRequest {
    /// A non-streaming request with exactly one user turn — the shape both
    /// extraction passes use.
    pub fn one_shot(model: &str, system: &str, user_content: &str) -> Self {
        Self {
            model: model.to_string(),
            system: system.to_string(),
            turns: vec![ChatTurn::user(user_content)],
            stream: false,
        }
    }
}

/// Completion service abstraction (allows mocking).
pub trait CompletionClient {
    /// Issue a blocking request and return the full completion text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Issue a streaming request, forwarding each text fragment through
    /// `token_tx` as it arrives, and return the assembled completion.
    /// Used only by the interactive chat surface.
    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        token_tx: mpsc::Sender<String>,
    ) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn one_shot_request_has_single_user_turn() {
        let request = CompletionRequest::one_shot("gpt-3.5-turbo", "be terse", "ph 7.41");
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.system, "be terse");
        assert_eq!(request.turns.len(), 1);
        assert_eq!(request.turns[0].role, ChatRole::User);
        assert_eq!(request.turns[0].content, "ph 7.41");
        assert!(!request.stream);
    }

    #[test]
    fn turn_constructors_tag_roles() {
        assert_eq!(ChatTurn::user("hi").role, ChatRole::User);
        assert_eq!(ChatTurn::assistant("hello").role, ChatRole::Assistant);
    }
}
