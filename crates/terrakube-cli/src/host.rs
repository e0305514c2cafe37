//! Host-side plumbing shared by the lifecycle commands
//!
//! Plays the part Terraform normally plays around the provider: builds the
//! plan from configuration, persists the state each call returns and renders
//! diagnostics.

use crate::ConnectionArgs;
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::Path;
use terrakube_provider::{
    Diagnostics, Outcome, Provider, ResourceHandler, Schema, Severity, StateChange, StateFile,
    StateManager,
};

pub struct Host {
    provider: Provider,
    state: StateManager,
}

impl Host {
    pub fn connect(connection: &ConnectionArgs, dir: &Path) -> anyhow::Result<Self> {
        let provider = Provider::configure(Some(&provider_block(connection)))?;
        tracing::debug!(
            endpoint = %provider.endpoint(),
            state_dir = %dir.display(),
            "Host ready"
        );
        Ok(Self {
            provider,
            state: StateManager::new(dir),
        })
    }

    pub fn resource(&self, resource_type: &str) -> anyhow::Result<&dyn ResourceHandler> {
        Ok(self.provider.resource(resource_type)?)
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Record the outcome of a lifecycle call and report its diagnostics.
    ///
    /// Fails when the call produced an error diagnostic.
    pub async fn commit(
        &self,
        state: &mut StateFile,
        address: &str,
        resource_type: &str,
        outcome: Outcome,
    ) -> anyhow::Result<()> {
        print_diagnostics(&outcome.diagnostics);
        let failed = outcome.has_error();

        match outcome.state {
            StateChange::Keep => {}
            StateChange::Set(value) => {
                state.set(address, resource_type, value);
                self.state.save(state).await?;
            }
            StateChange::Remove => {
                if state.remove(address).is_some() {
                    self.state.save(state).await?;
                }
            }
        }

        if failed {
            anyhow::bail!("{} failed", address);
        }
        Ok(())
    }
}

/// Provider block from the connection flags; unset flags are left out so
/// the provider can fall back to the environment
fn provider_block(connection: &ConnectionArgs) -> Value {
    let mut block = Map::new();
    if let Some(endpoint) = &connection.endpoint {
        block.insert("endpoint".to_string(), Value::String(endpoint.clone()));
    }
    if let Some(token) = &connection.token {
        block.insert("token".to_string(), Value::String(token.clone()));
    }
    block.insert(
        "insecure_http_client".to_string(),
        Value::Bool(connection.insecure),
    );
    Value::Object(block)
}

/// Read a resource configuration file (a JSON object)
pub fn read_config(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(config) => Ok(config),
        other => anyhow::bail!(
            "{} must contain a JSON object, found {}",
            path.display(),
            other
        ),
    }
}

/// Validate the configuration and turn it into a plan.
///
/// Defaults fill unset optional attributes; attributes marked
/// use-state-for-unknown (the server id) are copied from prior state.
pub fn plan(
    schema: &Schema,
    mut config: Map<String, Value>,
    prior: Option<&Value>,
) -> anyhow::Result<Map<String, Value>> {
    let diagnostics = schema.validate(&config);
    print_diagnostics(&diagnostics);
    if diagnostics.has_error() {
        anyhow::bail!("Invalid configuration");
    }

    schema.apply_defaults(&mut config);

    if let Some(prior) = prior {
        for attribute in schema.attributes.iter().filter(|a| a.use_state_for_unknown) {
            if let Some(value) = prior.get(&attribute.name) {
                config.insert(attribute.name.clone(), value.clone());
            }
        }
    }

    Ok(config)
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        let label = match diagnostic.severity {
            Severity::Error => "Error:".red().bold(),
            Severity::Warning => "Warning:".yellow().bold(),
        };
        eprintln!("{} {}", label, diagnostic.summary);
        if let Some(attribute) = &diagnostic.attribute {
            eprintln!("  with {}", attribute.cyan());
        }
        if !diagnostic.detail.is_empty() {
            eprintln!("  {}", diagnostic.detail);
        }
    }
}
