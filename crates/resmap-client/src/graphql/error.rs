//! Mapping of GraphQL and HTTP failures onto engine errors.

use resmap_core::Error;

/// Failure classes reported by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorCode {
    /// Missing or invalid credentials.
    Unauthenticated,
    /// Authenticated but not allowed.
    Forbidden,
    /// Tag or workspace does not exist.
    NotFound,
    /// Server-side input validation refused the request.
    BadUserInput,
    /// Too many requests.
    RateLimited,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl RemoteErrorCode {
    /// Determine error code from an HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthenticated,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 422 => Self::BadUserInput,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Determine error code from a GraphQL `extensions.code`.
    pub fn from_extension(code: Option<&str>) -> Self {
        match code {
            Some("UNAUTHENTICATED") => Self::Unauthenticated,
            Some("FORBIDDEN") => Self::Forbidden,
            Some("NOT_FOUND") => Self::NotFound,
            Some("BAD_USER_INPUT") | Some("GRAPHQL_VALIDATION_FAILED") => Self::BadUserInput,
            Some("RATE_LIMITED") => Self::RateLimited,
            Some("INTERNAL_SERVER_ERROR") => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether repeating the call may succeed. Classification only; the
    /// client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError)
    }
}

/// Convert a remote failure to an engine error.
pub fn to_resmap_error(code: RemoteErrorCode, message: &str) -> Error {
    match code {
        RemoteErrorCode::Unauthenticated => Error::Unauthorized(message.to_string()),
        RemoteErrorCode::Forbidden => Error::Forbidden(message.to_string()),
        RemoteErrorCode::NotFound => Error::NotFound(message.to_string()),
        RemoteErrorCode::BadUserInput => Error::Remote(format!("Rejected input: {}", message)),
        RemoteErrorCode::RateLimited => Error::Remote(format!("Rate limit exceeded: {}", message)),
        RemoteErrorCode::ServerError => Error::Remote(format!("Server error: {}", message)),
        RemoteErrorCode::Unknown => Error::Remote(message.to_string()),
    }
}
