//! Terrakube provider core
//!
//! Resource lifecycle handlers for the Terrakube Terraform/OpenTofu
//! provider. Each handler translates a host's plan or state into Terrakube
//! REST calls and reconciles the server's answer back into tracked state.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │             Host (Terraform / CLI)              │
//! │       plan / state / import id / diagnostics    │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               terrakube-provider                │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Resource<K>: create/read/update/delete  │   │
//! │  │  trait ResourceKind { Model, mapping }   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │   Schemas    │  │  State file  │             │
//! │  └──────────────┘  └──────────────┘             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │   terrakube-api: EntityClient<K> over JSON:API  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use terrakube_provider::{Provider, StateChange};
//!
//! let provider = Provider::configure(Some(&serde_json::json!({
//!     "endpoint": "https://terrakube-api.example.com",
//!     "token": token,
//! })))?;
//!
//! let teams = provider.resource("terrakube_team")?;
//! let outcome = teams.import("org-id,team-id");
//! if let StateChange::Set(state) = outcome.state {
//!     let refreshed = teams.read(&state).await;
//! }
//! ```

pub mod collection;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod module;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod state;
pub mod team;

// Re-exports
pub use collection::CollectionModel;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ProviderError, Result};
pub use import::ImportId;
pub use module::ModuleModel;
pub use provider::{ENDPOINT_ENV, PROVIDER_TYPE_NAME, Provider, TOKEN_ENV};
pub use resource::{
    Address, Outcome, Resource, ResourceHandler, ResourceKind, ResourceModel, StateChange,
};
pub use schema::{Attribute, AttributeType, Schema};
pub use state::{StateFile, StateLock, StateManager, TrackedResource};
pub use team::TeamModel;
