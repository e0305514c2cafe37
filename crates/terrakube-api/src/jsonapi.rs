//! JSON:API document framing
//!
//! Every request and response body exchanged with Terrakube is a single
//! resource object wrapped in a top-level `data` member:
//!
//! ```json
//! { "data": { "type": "team", "id": "...", "attributes": { ... } } }
//! ```

use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE: &str = "application/vnd.api+json";

/// Top-level document carrying one primary resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<A> {
    pub data: ResourceObject<A>,
}

/// A JSON:API resource object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject<A> {
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Omitted on create; the server assigns it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub attributes: A,
}

impl<A: Serialize> Document<A> {
    pub fn new(resource_type: impl Into<String>, id: Option<String>, attributes: A) -> Self {
        Self {
            data: ResourceObject {
                resource_type: resource_type.into(),
                id,
                attributes,
            },
        }
    }

    /// Serialize the document into a request body
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(ApiError::Encoding)
    }
}

impl<A: DeserializeOwned> Document<A> {
    /// Parse a response body and check that it carries an identified
    /// resource of `expected_type`. Returns the id and attributes.
    pub fn decode(body: &[u8], expected_type: &str) -> Result<(String, A)> {
        let document: Document<A> =
            serde_json::from_slice(body).map_err(|e| ApiError::Decoding(e.to_string()))?;
        let ResourceObject {
            resource_type,
            id,
            attributes,
        } = document.data;

        if resource_type != expected_type {
            return Err(ApiError::Decoding(format!(
                "expected resource type `{}`, got `{}`",
                expected_type, resource_type
            )));
        }

        match id {
            Some(id) if !id.is_empty() => Ok((id, attributes)),
            _ => Err(ApiError::Decoding(format!(
                "`{}` resource in response has no id",
                expected_type
            ))),
        }
    }
}

/// JSON:API error document returned on failed requests
#[derive(Debug, Default, Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    errors: Vec<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Best-effort human readable message from an error response body
pub fn error_message(body: &str) -> String {
    let document: ErrorDocument = serde_json::from_str(body).unwrap_or_default();

    document
        .errors
        .into_iter()
        .find_map(|e| e.detail.or(e.title))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}
