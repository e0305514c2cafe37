//! Team entity
//!
//! A team binds a group of users to an organization with a fixed set of
//! permission flags.

use crate::entity::EntityKind;
use serde::{Deserialize, Serialize};

/// Team entity kind
pub struct Team;

impl EntityKind for Team {
    const KIND: &'static str = "team";
    type Attributes = TeamAttributes;
}

/// Team attributes as exchanged with the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamAttributes {
    pub name: String,
    pub manage_state: bool,
    pub manage_workspace: bool,
    pub manage_module: bool,
    pub manage_provider: bool,
    pub manage_vcs: bool,
    pub manage_template: bool,
    pub manage_job: bool,
    pub manage_collection: bool,
}
