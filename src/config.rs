/// Application-level constants
pub const APP_NAME: &str = "Labgas";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default OpenAI-compatible completion endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";

/// Model used for both extraction passes.
pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-3.5-turbo";

/// Model used for the interactive chat surface.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";

/// Attempt ceiling for completion calls that fail transiently.
pub const MAX_COMPLETION_ATTEMPTS: usize = 5;

/// Seconds to wait between retry attempts.
pub const RETRY_DELAY_SECS: u64 = 5;

/// Per-request timeout for completion calls. A timed-out request is treated
/// the same as an explicit service-unavailable signal.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Completion endpoint base URL, overridable via LABGAS_API_BASE_URL.
pub fn api_base_url() -> String {
    std::env::var("LABGAS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_labgas() {
        assert_eq!(APP_NAME, "Labgas");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn retry_budget_is_five_attempts_with_five_second_delay() {
        assert_eq!(MAX_COMPLETION_ATTEMPTS, 5);
        assert_eq!(RETRY_DELAY_SECS, 5);
    }

    #[test]
    fn default_log_filter_scopes_to_crate() {
        assert_eq!(default_log_filter(), "labgas=info");
    }
}
