//! Errors surfaced by the admin API client and the console facade.

use std::sync::Arc;

use lunchdesk_core::{PageError, ValidationError};
use thiserror::Error;

/// Errors that can occur when talking to the admin API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// API rejected the bearer token. The session has been cleared.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session expired"))]
    Unauthorized { message: Option<String> },

    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request body could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status code, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Message the server put in the error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Unauthorized { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server's message, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Whether the session was expired by this error.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Errors from running a mutation.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The same operation is still in flight; the second call was not sent.
    #[error("{0} is already in progress")]
    AlreadyPending(&'static str),

    /// The call failed. `message` is what the user is shown.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// Errors returned by console actions.
///
/// The `Display` text of every variant is the message a view shows.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Input was rejected before any request was made.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A mutation was refused or failed.
    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// A query failed. The cache keeps no entry for it.
    #[error("{message}")]
    Query {
        message: String,
        #[source]
        source: Arc<ApiError>,
    },
}

impl ActionError {
    /// The underlying API error, if a request was made and failed.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Mutation(MutationError::Failed { source, .. }) => Some(source),
            Self::Query { source, .. } => Some(source),
            _ => None,
        }
    }
}
