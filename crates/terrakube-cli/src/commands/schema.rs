use serde_json::{Map, Value};
use terrakube_provider::Provider;

pub fn handle(resource_type: Option<&str>) -> anyhow::Result<()> {
    let output = match resource_type {
        Some(resource_type) => serde_json::to_value(Provider::schema(resource_type)?)?,
        None => {
            let mut schemas = Map::new();
            for (name, schema) in Provider::schemas() {
                schemas.insert(name, serde_json::to_value(schema)?);
            }
            Value::Object(schemas)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
