//! Resource schema descriptors
//!
//! Schemas describe each resource's attributes to the host. The host owns
//! validation and default filling; [`Schema::validate`] and
//! [`Schema::apply_defaults`] are provided for hosts that do not bring their
//! own (such as the bundled command-line host).

use crate::diagnostics::{Diagnostic, Diagnostics};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Number,
}

impl AttributeType {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Number => value.is_number(),
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Bool => write!(f, "bool"),
            AttributeType::Number => write!(f, "number"),
        }
    }
}

/// One attribute of a resource schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Changing the value destroys and recreates the resource
    pub requires_replace: bool,
    /// Keep the prior state value while the planned value is unknown
    pub use_state_for_unknown: bool,
}

impl Attribute {
    fn base(name: &str, attribute_type: AttributeType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute_type,
            description: description.to_string(),
            required: false,
            optional: false,
            computed: false,
            default: None,
            requires_replace: false,
            use_state_for_unknown: false,
        }
    }

    pub fn required(name: &str, attribute_type: AttributeType, description: &str) -> Self {
        Self {
            required: true,
            ..Self::base(name, attribute_type, description)
        }
    }

    /// Server-assigned, never set in configuration
    pub fn computed(name: &str, attribute_type: AttributeType, description: &str) -> Self {
        Self {
            computed: true,
            ..Self::base(name, attribute_type, description)
        }
    }

    /// Optional attribute that falls back to a static default
    pub fn optional_with_default(
        name: &str,
        attribute_type: AttributeType,
        description: &str,
        default: Value,
    ) -> Self {
        Self {
            optional: true,
            computed: true,
            default: Some(default),
            ..Self::base(name, attribute_type, description)
        }
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn use_state_for_unknown(mut self) -> Self {
        self.use_state_for_unknown = true;
        self
    }

    /// Settable from configuration
    pub fn is_configurable(&self) -> bool {
        self.required || self.optional
    }
}

/// Schema of one resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Fill unset attributes that declare a default
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for attribute in &self.attributes {
            let Some(default) = &attribute.default else {
                continue;
            };
            let unset = config.get(&attribute.name).is_none_or(Value::is_null);
            if unset {
                config.insert(attribute.name.clone(), default.clone());
            }
        }
    }

    /// Check a configuration object against the schema
    pub fn validate(&self, config: &Map<String, Value>) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        for (key, value) in config {
            match self.attribute(key) {
                None => diagnostics.push(
                    Diagnostic::error(
                        "Unsupported argument",
                        format!("An argument named {:?} is not expected here.", key),
                    )
                    .with_attribute(key.clone()),
                ),
                Some(attribute) if !attribute.is_configurable() && !value.is_null() => {
                    diagnostics.push(
                        Diagnostic::error(
                            "Invalid Configuration for Read-Only Attribute",
                            format!(
                                "Cannot set value for attribute {:?}, it is computed by the provider.",
                                key
                            ),
                        )
                        .with_attribute(key.clone()),
                    )
                }
                Some(attribute) if !value.is_null() && !attribute.attribute_type.accepts(value) => {
                    diagnostics.push(
                        Diagnostic::error(
                            "Incorrect attribute value type",
                            format!(
                                "Attribute {:?} must be a {}, got {}",
                                key, attribute.attribute_type, value
                            ),
                        )
                        .with_attribute(key.clone()),
                    )
                }
                Some(_) => {}
            }
        }

        for attribute in self.attributes.iter().filter(|a| a.required) {
            let missing = config.get(&attribute.name).is_none_or(Value::is_null);
            if missing {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing required argument",
                        format!(
                            "The argument {:?} is required, but no definition was found.",
                            attribute.name
                        ),
                    )
                    .with_attribute(attribute.name.clone()),
                );
            }
        }

        diagnostics
    }

    /// Attributes flagged `requires_replace` whose value differs between
    /// prior state and plan
    pub fn replacement_attributes(
        &self,
        prior: &Map<String, Value>,
        planned: &Map<String, Value>,
    ) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .filter(|a| prior.get(&a.name) != planned.get(&a.name))
            .map(|a| a.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("test")
            .with_attribute(
                Attribute::computed("id", AttributeType::String, "Id").use_state_for_unknown(),
            )
            .with_attribute(
                Attribute::required("name", AttributeType::String, "Name").requires_replace(),
            )
            .with_attribute(Attribute::optional_with_default(
                "enabled",
                AttributeType::Bool,
                "Enabled",
                json!(false),
            ))
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_apply_defaults_fills_unset_and_null() {
        let schema = schema();

        let mut config = object(json!({ "name": "a" }));
        schema.apply_defaults(&mut config);
        assert_eq!(config["enabled"], json!(false));

        let mut config = object(json!({ "name": "a", "enabled": null }));
        schema.apply_defaults(&mut config);
        assert_eq!(config["enabled"], json!(false));

        let mut config = object(json!({ "name": "a", "enabled": true }));
        schema.apply_defaults(&mut config);
        assert_eq!(config["enabled"], json!(true));
    }

    #[test]
    fn test_validate() {
        let schema = schema();

        assert!(schema.validate(&object(json!({ "name": "a" }))).is_empty());

        let diags = schema.validate(&object(json!({ "enabled": "yes", "extra": 1, "id": "x" })));
        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert!(summaries.contains(&"Missing required argument"));
        assert!(summaries.contains(&"Incorrect attribute value type"));
        assert!(summaries.contains(&"Unsupported argument"));
        assert!(summaries.contains(&"Invalid Configuration for Read-Only Attribute"));
    }

    #[test]
    fn test_replacement_attributes() {
        let schema = schema();
        let prior = object(json!({ "id": "1", "name": "a", "enabled": false }));

        let planned = object(json!({ "id": "1", "name": "a", "enabled": true }));
        assert!(schema.replacement_attributes(&prior, &planned).is_empty());

        let planned = object(json!({ "id": "1", "name": "b", "enabled": false }));
        assert_eq!(schema.replacement_attributes(&prior, &planned), vec!["name"]);
    }

    #[test]
    fn test_serializes_for_host() {
        let value = serde_json::to_value(schema()).unwrap();
        assert_eq!(value["attributes"][0]["type"], json!("string"));
        assert_eq!(value["attributes"][2]["default"], json!(false));
        assert!(value["attributes"][0].get("default").is_none());
    }
}
