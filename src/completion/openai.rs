use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::types::{ChatTurn, CompletionClient, CompletionRequest};
use super::CompletionError;
use crate::config;

/// Blocking HTTP client for an OpenAI-compatible chat-completion endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    /// Create a new client against the given endpoint.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client against the configured endpoint. The key comes from
    /// OPENAI_API_KEY — credential loading is the host application's job.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        Self::new(
            &config::api_base_url(),
            &api_key,
            config::REQUEST_TIMEOUT_SECS,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_connect() {
            CompletionError::ServiceUnavailable(self.base_url.clone())
        } else if e.is_timeout() {
            CompletionError::Timeout(self.timeout_secs)
        } else {
            CompletionError::HttpClient(e.to_string())
        }
    }

    fn post_chat(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<reqwest::blocking::Response, CompletionError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = WireRequest::build(request, stream);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.as_u16() == 503 {
            return Err(CompletionError::ServiceUnavailable(self.base_url.clone()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

/// Request body for /v1/chat/completions
#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> WireRequest<'a> {
    /// A non-empty system instruction travels as the leading "system"
    /// message, followed by the prior turns in order. Chat sessions carry no
    /// system instruction and send turns only.
    fn build(request: &'a CompletionRequest, stream: bool) -> Self {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        if !request.system.is_empty() {
            messages.push(WireMessage {
                role: "system",
                content: &request.system,
            });
        }
        for ChatTurn { role, content } in &request.turns {
            messages.push(WireMessage {
                role: role.as_str(),
                content,
            });
        }
        Self {
            model: &request.model,
            messages,
            stream,
        }
    }
}

/// Response body for non-streaming requests
#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}

/// One server-sent chunk of a streaming response
#[derive(Deserialize)]
struct WireChunk {
    choices: Vec<WireChunkChoice>,
}

#[derive(Deserialize)]
struct WireChunkChoice {
    delta: WireDelta,
}

#[derive(Deserialize, Default)]
struct WireDelta {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let response = self.post_chat(request, false)?;

        let parsed: WireResponse = response
            .json()
            .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::EmptyCompletion)
    }

    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        token_tx: mpsc::Sender<String>,
    ) -> Result<String, CompletionError> {
        let response = self.post_chat(request, true)?;

        let reader = BufReader::new(response);
        let mut full_text = String::new();

        for line in reader.lines() {
            let line = line.map_err(|e| CompletionError::HttpClient(e.to_string()))?;
            let Some(payload) = line.strip_prefix("data:") else {
                continue;
            };
            let payload = payload.trim();
            if payload.is_empty() {
                continue;
            }
            if payload == "[DONE]" {
                break;
            }

            let chunk: WireChunk = serde_json::from_str(payload)
                .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;
            for choice in chunk.choices {
                if let Some(fragment) = choice.delta.content {
                    if !fragment.is_empty() {
                        full_text.push_str(&fragment);
                        // Receiver may already be gone; keep assembling anyway.
                        let _ = token_tx.send(fragment);
                    }
                }
            }
        }

        Ok(full_text)
    }
}

/// Mock completion client for testing — plays back a scripted sequence of
/// outcomes, falling back to a fixed response once the script is exhausted.
/// Clones share state, so a caller can keep a handle for inspection after
/// boxing one for the code under test.
#[derive(Clone)]
pub struct MockCompletionClient {
    script: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    fallback: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    /// A client that always returns the same completion.
    pub fn new(response: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Some(response.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client that plays outcomes back in order, then errors.
    pub fn with_script(outcomes: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into())),
            fallback: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every request issued through this client, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    fn next_outcome(&self) -> Result<String, CompletionError> {
        if let Some(outcome) = self.script.lock().expect("mock lock poisoned").pop_front() {
            return outcome;
        }
        match &self.fallback {
            Some(text) => Ok(text.clone()),
            None => Err(CompletionError::ResponseParsing(
                "mock script exhausted".into(),
            )),
        }
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());
        self.next_outcome()
    }

    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        token_tx: mpsc::Sender<String>,
    ) -> Result<String, CompletionError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());
        let text = self.next_outcome()?;
        let _ = token_tx.send(text.clone());
        Ok(text)
    }
}
