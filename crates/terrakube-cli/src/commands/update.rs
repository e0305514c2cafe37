use crate::host::{self, Host};
use colored::Colorize;
use serde_json::Value;
use std::path::Path;
use terrakube_provider::state;

pub async fn handle(
    host: &Host,
    resource_type: &str,
    name: &str,
    config_path: &Path,
) -> anyhow::Result<()> {
    let handler = host.resource(resource_type)?;
    let config = host::read_config(config_path)?;

    let lock = host.state().acquire_lock().await?;
    let mut tracked = host.state().load().await?;
    let address = state::address(resource_type, name);

    let prior = tracked
        .get(&address)
        .map(|r| r.state.clone())
        .ok_or_else(|| anyhow::anyhow!("{} is not tracked", address))?;
    let prior_fields = prior.as_object().cloned().unwrap_or_default();

    let plan = host::plan(handler.schema(), config, Some(&prior))?;

    let replaced = handler.schema().replacement_attributes(&prior_fields, &plan);
    if !replaced.is_empty() {
        anyhow::bail!(
            "Changing {} forces replacement of {}; delete and create it again",
            replaced.join(", "),
            address
        );
    }

    if plan == prior_fields {
        println!("{}", format!("{} is up to date", address).dimmed());
        lock.release().await?;
        return Ok(());
    }

    println!("{}", format!("Updating {}...", address).blue());
    let outcome = handler.update(&prior, &Value::Object(plan)).await;
    host.commit(&mut tracked, &address, resource_type, outcome).await?;
    println!("{}", format!("✓ Updated {}", address).green().bold());

    lock.release().await?;
    Ok(())
}
