//! Private registry module entity

use crate::entity::EntityKind;
use serde::{Deserialize, Serialize};

/// Module entity kind
pub struct Module;

impl EntityKind for Module {
    const KIND: &'static str = "module";
    type Attributes = ModuleAttributes;
}

/// Module attributes as exchanged with the API.
///
/// Server-managed attributes (registry path, download counters, ...) are
/// ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleAttributes {
    pub name: String,
    pub description: String,
    /// Terraform provider the module targets (e.g. `azurerm`, `aws`)
    pub provider: String,
    /// Git source, https or ssh
    pub source: String,
}
