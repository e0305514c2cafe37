//! Variable collection entity

use crate::entity::EntityKind;
use serde::{Deserialize, Serialize};

/// Collection entity kind
pub struct Collection;

impl EntityKind for Collection {
    const KIND: &'static str = "collection";
    type Attributes = CollectionAttributes;
}

/// Collection attributes as exchanged with the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionAttributes {
    pub name: String,
    pub description: String,
    /// Higher priority collections win when variables overlap
    pub priority: i64,
}
