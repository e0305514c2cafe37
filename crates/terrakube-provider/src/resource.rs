//! Resource lifecycle handlers
//!
//! A single generic [`Resource`] implements Create/Read/Update/Delete/Import
//! for every entity kind. Kind-specific behavior (state model, field
//! mapping, schema, immutable fields) comes from the [`ResourceKind`]
//! descriptor.
//!
//! Handlers never write partial state: a failing step reports an error
//! diagnostic and leaves the host's state untouched.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ProviderError, Result};
use crate::import::ImportId;
use crate::provider::PROVIDER_TYPE_NAME;
use crate::schema::Schema;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use terrakube_api::{ApiClient, EntityClient, EntityKind};

/// Binds an entity kind to its tracked-state model
pub trait ResourceKind: EntityKind {
    /// Tracked state fields besides `id` and `organization_id`
    type Model: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync;

    fn schema() -> Schema;

    /// Outbound mapping used on create
    fn to_attributes(model: &Self::Model) -> Self::Attributes;

    /// Outbound mapping used on update. Kinds with immutable fields take
    /// them from `prior` instead of `planned`.
    fn to_update_attributes(_prior: &Self::Model, planned: &Self::Model) -> Self::Attributes {
        Self::to_attributes(planned)
    }

    /// Inbound mapping: the server's values replace every field
    fn from_attributes(attributes: Self::Attributes) -> Self::Model;
}

/// Tracked state of one resource instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceModel<M> {
    /// Unknown until the server assigns it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub organization_id: String,

    #[serde(flatten)]
    pub fields: M,
}

/// The identifying part of tracked state, enough to address the entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub id: String,
    pub organization_id: String,
}

/// What the host should do with the instance's state after a call
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// Leave prior state as it was
    Keep,
    /// Replace state wholesale
    Set(Value),
    /// Drop the instance from state
    Remove,
}

/// Result of one lifecycle call
#[derive(Debug, Clone)]
pub struct Outcome {
    pub state: StateChange,
    pub diagnostics: Diagnostics,
}

impl Outcome {
    pub fn set(state: Value) -> Self {
        Self {
            state: StateChange::Set(state),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn removed() -> Self {
        Self {
            state: StateChange::Remove,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Keep prior state and report a failure
    pub fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            state: StateChange::Keep,
            diagnostics: diagnostic.into(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// Object-safe surface the host drives, one per resource type
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Entity kind, e.g. `team`
    fn kind(&self) -> &str;

    /// Full resource type name, e.g. `terrakube_team`
    fn type_name(&self) -> &str;

    fn schema(&self) -> &Schema;

    async fn create(&self, plan: &Value) -> Outcome;

    async fn read(&self, state: &Value) -> Outcome;

    async fn update(&self, prior_state: &Value, plan: &Value) -> Outcome;

    async fn delete(&self, state: &Value) -> Outcome;

    /// Seed state from an `"<organization_id>,<id>"` identifier. The host
    /// follows up with `read` to fill in the remaining attributes.
    fn import(&self, import_id: &str) -> Outcome {
        match ImportId::parse(import_id) {
            Ok(import) => Outcome::set(serde_json::json!({
                "organization_id": import.organization_id,
                "id": import.id,
            })),
            Err(e) => Outcome::failed(Diagnostic::from_error(self.kind(), &e)),
        }
    }
}

/// Generic reconciler for entities of kind `K`
pub struct Resource<K: ResourceKind> {
    client: EntityClient<K>,
    type_name: String,
    schema: Schema,
}

impl<K: ResourceKind> Resource<K> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        tracing::debug!(kind = K::KIND, "Configuring resource");
        Self {
            client: EntityClient::new(api),
            type_name: format!("{}_{}", PROVIDER_TYPE_NAME, K::KIND),
            schema: K::schema(),
        }
    }

    /// POST the plan and return the server's view with its new id
    pub async fn create_model(
        &self,
        plan: &ResourceModel<K::Model>,
    ) -> Result<ResourceModel<K::Model>> {
        let attributes = K::to_attributes(&plan.fields);
        let entity = self
            .client
            .create(&plan.organization_id, &attributes)
            .await?;

        Ok(ResourceModel {
            id: Some(entity.id),
            organization_id: plan.organization_id.clone(),
            fields: K::from_attributes(entity.attributes),
        })
    }

    /// GET the entity; `ApiError::NotFound` propagates
    pub async fn read_model(&self, address: &Address) -> Result<ResourceModel<K::Model>> {
        let entity = self
            .client
            .read(&address.organization_id, &address.id)
            .await?;

        Ok(ResourceModel {
            id: Some(entity.id),
            organization_id: address.organization_id.clone(),
            fields: K::from_attributes(entity.attributes),
        })
    }

    /// PATCH all mutable attributes, then read the entity back
    pub async fn update_model(
        &self,
        prior: &ResourceModel<K::Model>,
        plan: &ResourceModel<K::Model>,
    ) -> Result<ResourceModel<K::Model>> {
        let id = prior.id.as_deref().ok_or_else(|| ProviderError::InvalidState {
            what: "prior state",
            reason: "missing id".to_string(),
        })?;
        let attributes = K::to_update_attributes(&prior.fields, &plan.fields);
        let entity = self
            .client
            .update(&prior.organization_id, id, &attributes)
            .await?;

        Ok(ResourceModel {
            id: Some(id.to_string()),
            organization_id: prior.organization_id.clone(),
            fields: K::from_attributes(entity.attributes),
        })
    }

    pub async fn delete_model(&self, address: &Address) -> Result<()> {
        self.client
            .delete(&address.organization_id, &address.id)
            .await?;
        Ok(())
    }

    fn failed(&self, error: ProviderError) -> Outcome {
        tracing::error!(kind = K::KIND, error = %error, "Resource operation failed");
        Outcome::failed(Diagnostic::from_error(K::KIND, &error))
    }

    fn to_state(&self, model: &ResourceModel<K::Model>) -> Outcome {
        match serde_json::to_value(model) {
            Ok(state) => Outcome::set(state),
            Err(e) => self.failed(e.into()),
        }
    }
}

fn decode<T: DeserializeOwned>(what: &'static str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| ProviderError::InvalidState {
        what,
        reason: e.to_string(),
    })
}

#[async_trait]
impl<K: ResourceKind> ResourceHandler for Resource<K> {
    fn kind(&self) -> &str {
        K::KIND
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(&self, plan: &Value) -> Outcome {
        let plan: ResourceModel<K::Model> = match decode("plan", plan) {
            Ok(plan) => plan,
            Err(e) => return self.failed(e),
        };

        match self.create_model(&plan).await {
            Ok(created) => {
                tracing::info!(kind = K::KIND, id = ?created.id, "Resource created");
                self.to_state(&created)
            }
            Err(e) => self.failed(e),
        }
    }

    async fn read(&self, state: &Value) -> Outcome {
        let address: Address = match decode("state", state) {
            Ok(address) => address,
            Err(e) => return self.failed(e),
        };

        match self.read_model(&address).await {
            Ok(current) => {
                tracing::info!(kind = K::KIND, id = %address.id, "Resource read");
                self.to_state(&current)
            }
            Err(ProviderError::Api(e)) if e.is_not_found() => {
                tracing::warn!(
                    kind = K::KIND,
                    id = %address.id,
                    organization_id = %address.organization_id,
                    "Resource no longer exists, removing it from state"
                );
                let mut outcome = Outcome::removed();
                outcome.diagnostics.add_warning(
                    "Resource not found",
                    format!(
                        "{} {} no longer exists in organization {} and was removed from state",
                        K::KIND,
                        address.id,
                        address.organization_id
                    ),
                );
                outcome
            }
            Err(e) => self.failed(e),
        }
    }

    async fn update(&self, prior_state: &Value, plan: &Value) -> Outcome {
        let prior: ResourceModel<K::Model> = match decode("prior state", prior_state) {
            Ok(prior) => prior,
            Err(e) => return self.failed(e),
        };
        let plan: ResourceModel<K::Model> = match decode("plan", plan) {
            Ok(plan) => plan,
            Err(e) => return self.failed(e),
        };

        match self.update_model(&prior, &plan).await {
            Ok(updated) => {
                tracing::info!(kind = K::KIND, id = ?updated.id, "Resource updated");
                self.to_state(&updated)
            }
            Err(e) => self.failed(e),
        }
    }

    async fn delete(&self, state: &Value) -> Outcome {
        let address: Address = match decode("state", state) {
            Ok(address) => address,
            Err(e) => return self.failed(e),
        };

        match self.delete_model(&address).await {
            Ok(()) => {
                tracing::info!(kind = K::KIND, id = %address.id, "Resource deleted");
                Outcome::removed()
            }
            Err(e) => self.failed(e),
        }
    }
}
