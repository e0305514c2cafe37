use colored::Colorize;
use std::path::Path;
use terrakube_provider::StateManager;

pub async fn handle(dir: &Path, resource_type: Option<&str>) -> anyhow::Result<()> {
    let state = StateManager::new(dir).load().await?;

    let resources: Vec<_> = match resource_type {
        Some(resource_type) => state.by_type(resource_type),
        None => state.resources.iter().collect(),
    };

    if resources.is_empty() {
        println!("{}", "No tracked resources".dimmed());
        return Ok(());
    }

    for (address, resource) in resources {
        println!(
            "{}  id={}  updated {}",
            address.cyan(),
            resource.id().unwrap_or("(unknown)"),
            resource.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}
