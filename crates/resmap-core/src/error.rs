//! Error types for the resource map engine.

use thiserror::Error;

use crate::models::TagId;
use crate::validate::MoveRejection;

/// Result type alias using the engine's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for resource map operations.
///
/// Variants fall into two families: local validation (nothing was sent to
/// the remote store) and remote failures (the store call was attempted and
/// refused or never answered).
#[derive(Error, Debug)]
pub enum Error {
    /// Move or placement refused by the hierarchy rules
    #[error("Move rejected: {0}")]
    MoveRejected(MoveRejection),

    /// Tag is not present in the fetched list
    #[error("Tag not found: {0}")]
    TagNotFound(TagId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote store refused the operation
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Remote store reported a missing resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (authenticated but not authorized)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the failure was detected locally and no remote call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MoveRejected(_) | Error::TagNotFound(_) | Error::InvalidInput(_)
        )
    }

    /// True when a remote store call was attempted and failed.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Remote(_)
                | Error::NotFound(_)
                | Error::Request(_)
                | Error::Unauthorized(_)
                | Error::Forbidden(_)
                | Error::Serialization(_)
        )
    }
}

impl From<MoveRejection> for Error {
    fn from(r: MoveRejection) -> Self {
        Error::MoveRejected(r)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
