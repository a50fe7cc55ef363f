pub mod openai;
pub mod types;

pub use openai::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion service unavailable at {0}")]
    ServiceUnavailable(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Completion service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Completion contained no choices")]
    EmptyCompletion,
}

impl CompletionError {
    /// Transient failures are the only kind the extraction passes retry.
    /// A timed-out request counts as transient, same as an explicit
    /// service-unavailable signal.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_and_timeout_are_transient() {
        assert!(CompletionError::ServiceUnavailable("http://localhost".into()).is_transient());
        assert!(CompletionError::Timeout(120).is_transient());
    }

    #[test]
    fn auth_and_malformed_request_failures_are_not_transient() {
        let auth = CompletionError::Api {
            status: 401,
            body: "invalid api key".into(),
        };
        let bad_request = CompletionError::Api {
            status: 400,
            body: "malformed request".into(),
        };
        assert!(!auth.is_transient());
        assert!(!bad_request.is_transient());
        assert!(!CompletionError::EmptyCompletion.is_transient());
        assert!(!CompletionError::ResponseParsing("truncated".into()).is_transient());
    }
}
