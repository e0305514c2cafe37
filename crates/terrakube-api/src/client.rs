//! Shared HTTP connection to a Terrakube instance
//!
//! One `ApiClient` is built per provider configuration and shared by every
//! resource handler. It is immutable after construction.

use crate::config::ConnectionConfig;
use crate::error::{ApiError, Result};
use crate::jsonapi;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Response, Url};

const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Terrakube API connection
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    endpoint: String,
    token: String,
}

impl ApiClient {
    /// Build the HTTP client for `config`
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        let base = Url::parse(&endpoint)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidEndpoint(format!(
                "{}: not a hierarchical URL",
                endpoint
            )));
        }

        if config.insecure_http_client {
            tracing::warn!(endpoint = %endpoint, "TLS certificate verification is disabled");
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_http_client)
            .build()?;

        Ok(Self {
            http,
            base,
            endpoint,
            token: config.token.clone(),
        })
    }

    /// Base endpoint without trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/api/v1/organization/{org}/{kind}`
    pub fn collection_url(&self, organization_id: &str, kind: &str) -> Result<Url> {
        self.url(&[organization_id, kind])
    }

    /// `{endpoint}/api/v1/organization/{org}/{kind}/{id}`
    pub fn entity_url(&self, organization_id: &str, kind: &str, id: &str) -> Result<Url> {
        self.url(&[organization_id, kind, id])
    }

    /// Each identifier becomes exactly one percent-encoded path segment
    fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ApiError::InvalidIdentifier(bad.to_string()));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidEndpoint(self.endpoint.clone()))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .push("organization")
            .extend(segments);
        Ok(url)
    }

    /// Send one request with bearer auth and JSON:API headers
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        tracing::debug!(method = %method, url = %url, "Sending Terrakube API request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, jsonapi::CONTENT_TYPE)
            .header(ACCEPT, jsonapi::CONTENT_TYPE);

        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }
}

/// Turn a non-success status into `ApiError::Status`, keeping 2xx responses
pub(crate) async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Error reading error response body");
            String::new()
        }
    };

    Err(ApiError::Status {
        status,
        message: jsonapi::error_message(&body),
    })
}
