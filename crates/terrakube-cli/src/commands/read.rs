use crate::host::Host;
use colored::Colorize;
use terrakube_provider::state;

pub async fn handle(host: &Host, resource_type: &str, name: &str) -> anyhow::Result<()> {
    let handler = host.resource(resource_type)?;

    let lock = host.state().acquire_lock().await?;
    let mut tracked = host.state().load().await?;
    let address = state::address(resource_type, name);

    let prior = tracked
        .get(&address)
        .map(|r| r.state.clone())
        .ok_or_else(|| anyhow::anyhow!("{} is not tracked", address))?;

    let outcome = handler.read(&prior).await;
    host.commit(&mut tracked, &address, resource_type, outcome).await?;

    match tracked.get(&address) {
        Some(resource) => println!("{}", serde_json::to_string_pretty(&resource.state)?),
        None => println!("{}", format!("{} was removed from state", address).yellow()),
    }

    lock.release().await?;
    Ok(())
}
