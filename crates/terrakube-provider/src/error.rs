//! Provider error types

use terrakube_api::ApiError;
use thiserror::Error;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Expected import identifier with format: 'organization_ID,ID', Got: {0:?}")]
    InvalidImportIdentifier(String),

    #[error(
        "Expected provider data with endpoint, token and insecure_http_client, got: {0}. \
         Please report this issue to the provider developers."
    )]
    UnexpectedConfigurationType(String),

    #[error("Missing Terrakube {setting}: set it in the provider configuration or via {env_var}")]
    MissingConfiguration {
        setting: &'static str,
        env_var: &'static str,
    },

    #[error("Unable to read {what}: {reason}")]
    InvalidState { what: &'static str, reason: String },

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("State file error: {0}")]
    StateFile(String),

    #[error("Lock acquisition failed: {0}")]
    Lock(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
