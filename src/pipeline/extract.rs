use std::time::Duration;

use super::prompt::{build_date_system_prompt, build_values_system_prompt};
use crate::completion::{CompletionClient, CompletionError, CompletionRequest};
use crate::config;

/// Retry policy and model selection for the extraction passes.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Model used for both extraction passes.
    pub model: String,
    /// Attempt ceiling for transiently failing completion calls.
    pub max_attempts: usize,
    /// Fixed sleep between attempts.
    pub retry_delay: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: config::DEFAULT_EXTRACTION_MODEL.to_string(),
            max_attempts: config::MAX_COMPLETION_ATTEMPTS,
            retry_delay: Duration::from_secs(config::RETRY_DELAY_SECS),
        }
    }
}

/// Builds and issues the one-shot extraction requests for a single document.
///
/// Both operations send the exemplar-anchored system instruction with the
/// document text as the sole user turn, and share one bounded-retry policy
/// for transient service failures.
pub struct ReportExtractor {
    client: Box<dyn CompletionClient + Send + Sync>,
    config: ExtractorConfig,
}

impl ReportExtractor {
    pub fn new(client: Box<dyn CompletionClient + Send + Sync>, config: ExtractorConfig) -> Self {
        Self { client, config }
    }

    /// Ask the model for the report's value mapping. Returns the raw
    /// completion text; parsing is the value extractor's job.
    pub fn extract_values(
        &self,
        doc_id: &str,
        document_text: &str,
    ) -> Result<String, CompletionError> {
        let system = build_values_system_prompt();
        self.request_with_retry(doc_id, &system, document_text)
    }

    /// Ask the model for the report's date/time string, unparsed.
    pub fn extract_date(
        &self,
        doc_id: &str,
        document_text: &str,
    ) -> Result<String, CompletionError> {
        let system = build_date_system_prompt();
        self.request_with_retry(doc_id, &system, document_text)
    }

    fn request_with_retry(
        &self,
        doc_id: &str,
        system: &str,
        document_text: &str,
    ) -> Result<String, CompletionError> {
        let request = CompletionRequest::one_shot(&self.config.model, system, document_text);

        let mut attempt = 1;
        loop {
            match self.client.complete(&request) {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    tracing::warn!(
                        doc_id = %doc_id,
                        attempt,
                        error = %e,
                        "completion call failed, retrying"
                    );
                    std::thread::sleep(self.config.retry_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
