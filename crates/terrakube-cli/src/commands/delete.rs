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

    println!("{}", format!("Deleting {}...", address).yellow());
    let outcome = handler.delete(&prior).await;
    host.commit(&mut tracked, &address, resource_type, outcome).await?;
    println!("{}", format!("✓ Deleted {}", address).green().bold());

    lock.release().await?;
    Ok(())
}
