//! Error types for BharatExplain.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
