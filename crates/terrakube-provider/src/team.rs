//! `terrakube_team` resource
//!
//! Creates a team and binds it to an organization. Renaming a team replaces
//! it, so updates always send the name already known from state.

use crate::resource::ResourceKind;
use crate::schema::{Attribute, AttributeType, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;
use terrakube_api::{Team, TeamAttributes};

/// Tracked team fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamModel {
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

const PERMISSIONS: [(&str, &str); 8] = [
    ("manage_state", "Allow to manage Terraform/OpenTofu state"),
    ("manage_job", "Allow to manage and trigger jobs"),
    ("manage_collection", "Allow to manage variables collection"),
    ("manage_workspace", "Allow to manage workspaces"),
    ("manage_module", "Allow to manage modules"),
    ("manage_provider", "Allow to manage providers"),
    ("manage_vcs", "Allow to manage vcs connections"),
    ("manage_template", "Allow to manage templates"),
];

impl ResourceKind for Team {
    type Model = TeamModel;

    fn schema() -> Schema {
        let schema = Schema::new(
            "Create a team and bind it to an organization. Allows for fined grained access management.",
        )
        .with_attribute(
            Attribute::computed("id", AttributeType::String, "Team Id").use_state_for_unknown(),
        )
        .with_attribute(
            Attribute::required(
                "organization_id",
                AttributeType::String,
                "Terrakube organization id",
            )
            .requires_replace(),
        )
        .with_attribute(
            Attribute::required("name", AttributeType::String, "Team name").requires_replace(),
        );

        PERMISSIONS
            .iter()
            .fold(schema, |schema, (name, description)| {
                schema.with_attribute(Attribute::optional_with_default(
                    name,
                    AttributeType::Bool,
                    description,
                    json!(false),
                ))
            })
    }

    fn to_attributes(model: &TeamModel) -> TeamAttributes {
        TeamAttributes {
            name: model.name.clone(),
            manage_state: model.manage_state,
            manage_workspace: model.manage_workspace,
            manage_module: model.manage_module,
            manage_provider: model.manage_provider,
            manage_vcs: model.manage_vcs,
            manage_template: model.manage_template,
            manage_job: model.manage_job,
            manage_collection: model.manage_collection,
        }
    }

    fn to_update_attributes(prior: &TeamModel, planned: &TeamModel) -> TeamAttributes {
        TeamAttributes {
            name: prior.name.clone(),
            ..Self::to_attributes(planned)
        }
    }

    fn from_attributes(attributes: TeamAttributes) -> TeamModel {
        TeamModel {
            name: attributes.name,
            manage_state: attributes.manage_state,
            manage_workspace: attributes.manage_workspace,
            manage_module: attributes.manage_module,
            manage_provider: attributes.manage_provider,
            manage_vcs: attributes.manage_vcs,
            manage_template: attributes.manage_template,
            manage_job: attributes.manage_job,
            manage_collection: attributes.manage_collection,
        }
    }
}
