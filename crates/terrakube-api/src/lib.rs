//! Terrakube API client
//!
//! Thin JSON:API client for the Terrakube REST API, covering the entities
//! the provider manages: teams, registry modules and variable collections.
//!
//! All entities live under `/api/v1/organization/{organization_id}/{kind}`
//! and are exchanged one per request as JSON:API documents.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use terrakube_api::{ApiClient, ConnectionConfig, EntityClient, Team, TeamAttributes};
//!
//! let config = ConnectionConfig::new("https://terrakube-api.example.com", token);
//! let api = Arc::new(ApiClient::new(&config)?);
//! let teams: EntityClient<Team> = EntityClient::new(api);
//!
//! let team = teams
//!     .create("org-id", &TeamAttributes { name: "infra-admins".into(), ..Default::default() })
//!     .await?;
//! let team = teams.read("org-id", &team.id).await?;
//! ```

pub mod client;
pub mod collection;
pub mod config;
pub mod entity;
pub mod error;
pub mod jsonapi;
pub mod module;
pub mod team;

pub use client::ApiClient;
pub use collection::{Collection, CollectionAttributes};
pub use config::ConnectionConfig;
pub use entity::{Entity, EntityClient, EntityKind};
pub use error::{ApiError, Result};
pub use module::{Module, ModuleAttributes};
pub use team::{Team, TeamAttributes};
