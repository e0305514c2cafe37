//! Diagnostics reported back to the host

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use terrakube_api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single user-visible message attached to a resource call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Attribute the diagnostic refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Error diagnostic for a failed lifecycle call on a `kind` resource
    pub fn from_error(kind: &str, error: &ProviderError) -> Self {
        let summary = match error {
            ProviderError::Api(ApiError::Encoding(_)) => "Unable to marshal payload".to_string(),
            ProviderError::Api(e) if e.is_transport() => {
                format!("Error executing {} resource request", kind)
            }
            ProviderError::Api(ApiError::Decoding(_)) => {
                "Error unmarshal payload response".to_string()
            }
            ProviderError::Api(ApiError::NotFound { .. }) => {
                format!("The {} no longer exists", kind)
            }
            ProviderError::Api(ApiError::InvalidIdentifier(_)) => {
                format!("Invalid {} identifier", kind)
            }
            ProviderError::Api(ApiError::InvalidEndpoint(_)) => {
                "Invalid Terrakube endpoint".to_string()
            }
            ProviderError::InvalidImportIdentifier(_) => "Unexpected Import Identifier".to_string(),
            ProviderError::UnexpectedConfigurationType(_) => {
                "Unexpected Provider Configure Type".to_string()
            }
            ProviderError::MissingConfiguration { .. } => {
                "Missing Terrakube configuration".to_string()
            }
            ProviderError::InvalidState { what, .. } => format!("Unable to read {}", what),
            ProviderError::UnknownResourceType(_) => "Unknown resource type".to_string(),
            _ => format!("Error handling {} resource", kind),
        };

        Self::error(summary, error.to_string())
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
