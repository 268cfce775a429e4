//! Errors from the text-generation layer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("No LLM provider configured")]
    NotConfigured,

    #[error("{0}")]
    Provider(String),

    #[error("No content generated")]
    NoContent,
}
