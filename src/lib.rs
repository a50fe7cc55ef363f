pub mod completion; // Completion-service boundary (HTTP client + trait)
pub mod config;
pub mod models;
pub mod pipeline; // Extraction passes: values, date, resolution
pub mod session; // Conversation state for the chat surface
