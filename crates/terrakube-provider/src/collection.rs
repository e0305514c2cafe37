//! `terrakube_collection` resource

use crate::resource::ResourceKind;
use crate::schema::{Attribute, AttributeType, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;
use terrakube_api::{Collection, CollectionAttributes};

/// Tracked collection fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionModel {
    pub name: String,
    pub description: String,
    pub priority: i64,
}

impl ResourceKind for Collection {
    type Model = CollectionModel;

    fn schema() -> Schema {
        Schema::new("Create a variable collection that can be shared across workspaces.")
            .with_attribute(
                Attribute::computed("id", AttributeType::String, "Collection Id")
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
            .with_attribute(Attribute::required(
                "name",
                AttributeType::String,
                "Collection name",
            ))
            .with_attribute(Attribute::required(
                "description",
                AttributeType::String,
                "Collection description",
            ))
            .with_attribute(Attribute::optional_with_default(
                "priority",
                AttributeType::Number,
                "Collection priority, higher values win when variables overlap",
                json!(0),
            ))
    }

    fn to_attributes(model: &CollectionModel) -> CollectionAttributes {
        CollectionAttributes {
            name: model.name.clone(),
            description: model.description.clone(),
            priority: model.priority,
        }
    }

    fn from_attributes(attributes: CollectionAttributes) -> CollectionModel {
        CollectionModel {
            name: attributes.name,
            description: attributes.description,
            priority: attributes.priority,
        }
    }
}
