//! Provider configuration and resource registry

use crate::error::{ProviderError, Result};
use crate::resource::{Resource, ResourceHandler, ResourceKind};
use crate::schema::Schema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use terrakube_api::{ApiClient, Collection, ConnectionConfig, EntityKind, Module, Team};

/// Provider type name; resource types are `terrakube_<kind>`
pub const PROVIDER_TYPE_NAME: &str = "terrakube";

pub const ENDPOINT_ENV: &str = "TERRAKUBE_ENDPOINT";
pub const TOKEN_ENV: &str = "TERRAKUBE_TOKEN";

/// Provider block as supplied by the host
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderData {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    insecure_http_client: Option<bool>,
}

/// A configured provider: one shared connection and a handler per resource type
pub struct Provider {
    api: Arc<ApiClient>,
    resources: Vec<Box<dyn ResourceHandler>>,
}

impl Provider {
    /// Build the provider from an explicit connection configuration
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let api = Arc::new(ApiClient::new(config)?);

        let resources: Vec<Box<dyn ResourceHandler>> = vec![
            Box::new(Resource::<Team>::new(Arc::clone(&api))),
            Box::new(Resource::<Module>::new(Arc::clone(&api))),
            Box::new(Resource::<Collection>::new(Arc::clone(&api))),
        ];

        tracing::debug!(endpoint = %api.endpoint(), "Configured Terrakube provider");
        Ok(Self { api, resources })
    }

    /// Build the provider from the host's provider block.
    ///
    /// Missing `endpoint` and `token` fall back to `TERRAKUBE_ENDPOINT` and
    /// `TERRAKUBE_TOKEN`.
    pub fn configure(provider_data: Option<&Value>) -> Result<Self> {
        Self::new(&connection_config(provider_data)?)
    }

    pub fn endpoint(&self) -> &str {
        self.api.endpoint()
    }

    /// Registered resource type names
    pub fn resource_types(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.type_name()).collect()
    }

    /// Look up the handler for a resource type
    pub fn resource(&self, type_name: &str) -> Result<&dyn ResourceHandler> {
        self.resources
            .iter()
            .find(|r| r.type_name() == type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    /// Schemas of every resource type, available without a connection
    pub fn schemas() -> Vec<(String, Schema)> {
        vec![
            schema_entry::<Team>(),
            schema_entry::<Module>(),
            schema_entry::<Collection>(),
        ]
    }

    /// Schema of one resource type, available without a connection
    pub fn schema(type_name: &str) -> Result<Schema> {
        Self::schemas()
            .into_iter()
            .find(|(name, _)| name == type_name)
            .map(|(_, schema)| schema)
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }
}

fn schema_entry<K: ResourceKind>() -> (String, Schema) {
    (format!("{}_{}", PROVIDER_TYPE_NAME, K::KIND), K::schema())
}

/// Resolve the connection settings from the provider block and environment
fn connection_config(provider_data: Option<&Value>) -> Result<ConnectionConfig> {
    let data = match provider_data {
        None | Some(Value::Null) => ProviderData::default(),
        Some(value) => ProviderData::deserialize(value)
            .map_err(|e| ProviderError::UnexpectedConfigurationType(e.to_string()))?,
    };

    let endpoint = data
        .endpoint
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|s| !s.is_empty()))
        .ok_or(ProviderError::MissingConfiguration {
            setting: "API endpoint",
            env_var: ENDPOINT_ENV,
        })?;

    let token = data
        .token
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|s| !s.is_empty()))
        .ok_or(ProviderError::MissingConfiguration {
            setting: "API token",
            env_var: TOKEN_ENV,
        })?;

    Ok(ConnectionConfig::new(endpoint, token)
        .with_insecure_http_client(data.insecure_http_client.unwrap_or(false)))
}
