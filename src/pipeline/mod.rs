pub mod dates;
pub mod extract;
pub mod processor;
pub mod prompt;
pub mod store;
pub mod values;

pub use dates::*;
pub use extract::*;
pub use processor::*;
pub use prompt::*;
pub use store::*;
pub use values::*;

use thiserror::Error;

use crate::completion::CompletionError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Completion service error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Malformed value payload: {0}")]
    MalformedValues(String),

    #[error("Unknown document: {0}")]
    UnknownDocument(String),

    #[error("Duplicate document: {0}")]
    DuplicateDocument(String),
}
