//! `terrakube_module` resource

use crate::resource::ResourceKind;
use crate::schema::{Attribute, AttributeType, Schema};
use serde::{Deserialize, Serialize};
use terrakube_api::{Module, ModuleAttributes};

/// Tracked module fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleModel {
    pub name: String,
    pub description: String,
    pub provider_name: String,
    pub source: String,
}

impl ResourceKind for Module {
    type Model = ModuleModel;

    fn schema() -> Schema {
        Schema::new("Register a module in an organization's private registry.")
            .with_attribute(
                Attribute::computed("id", AttributeType::String, "Module Id")
                    .use_state_for_unknown(),
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
                Attribute::required("name", AttributeType::String, "Module name")
                    .requires_replace(),
            )
            .with_attribute(Attribute::required(
                "description",
                AttributeType::String,
                "Module description",
            ))
            .with_attribute(Attribute::required(
                "provider_name",
                AttributeType::String,
                "Module provider name. Example: azurerm, google, aws, etc",
            ))
            .with_attribute(Attribute::required(
                "source",
                AttributeType::String,
                "Source (git using https or ssh protocol)",
            ))
    }

    fn to_attributes(model: &ModuleModel) -> ModuleAttributes {
        ModuleAttributes {
            name: model.name.clone(),
            description: model.description.clone(),
            provider: model.provider_name.clone(),
            source: model.source.clone(),
        }
    }

    fn to_update_attributes(prior: &ModuleModel, planned: &ModuleModel) -> ModuleAttributes {
        ModuleAttributes {
            name: prior.name.clone(),
            ..Self::to_attributes(planned)
        }
    }

    fn from_attributes(attributes: ModuleAttributes) -> ModuleModel {
        ModuleModel {
            name: attributes.name,
            description: attributes.description,
            provider_name: attributes.provider,
            source: attributes.source,
        }
    }
}
