//! Terrakube API error types

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unable to marshal payload: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Terrakube API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Unable to unmarshal payload response: {0}")]
    Decoding(String),

    #[error("{kind} {id} not found in organization {organization_id}")]
    NotFound {
        kind: &'static str,
        organization_id: String,
        id: String,
    },

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Identifier {0:?} cannot be used as a path segment")]
    InvalidIdentifier(String),
}

impl ApiError {
    /// The remote entity no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// The HTTP exchange failed or came back with an unexpected status.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
