//! Connection settings shared by every resource handler

use std::fmt;

/// Endpoint, credentials and TLS policy for one provider instance.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Base URL of the Terrakube API, without the `/api/v1` prefix
    pub endpoint: String,

    /// Personal access or team token sent as a bearer token
    pub token: String,

    /// Skip TLS certificate verification
    pub insecure_http_client: bool,
}

impl ConnectionConfig {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            insecure_http_client: false,
        }
    }

    pub fn with_insecure_http_client(mut self, insecure: bool) -> Self {
        self.insecure_http_client = insecure;
        self
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("insecure_http_client", &self.insecure_http_client)
            .finish()
    }
}
