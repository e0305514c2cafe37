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
    let plan = host::plan(handler.schema(), config, None)?;

    let lock = host.state().acquire_lock().await?;
    let mut tracked = host.state().load().await?;
    let address = state::address(resource_type, name);

    if tracked.get(&address).is_some() {
        anyhow::bail!(
            "{} is already tracked; use `terrakube update` to change it",
            address
        );
    }

    println!("{}", format!("Creating {}...", address).blue());
    let outcome = handler.create(&Value::Object(plan)).await;
    host.commit(&mut tracked, &address, resource_type, outcome).await?;

    let id = tracked
        .get(&address)
        .and_then(|r| r.id())
        .unwrap_or("(unknown)")
        .to_string();
    println!(
        "{}",
        format!("✓ Created {} (id: {})", address, id).green().bold()
    );

    lock.release().await?;
    Ok(())
}
