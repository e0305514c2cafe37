use crate::host::{self, Host};
use colored::Colorize;
use terrakube_provider::{StateChange, state};

pub async fn handle(
    host: &Host,
    resource_type: &str,
    name: &str,
    import_id: &str,
) -> anyhow::Result<()> {
    let handler = host.resource(resource_type)?;

    let imported = handler.import(import_id);
    let seed = match &imported.state {
        StateChange::Set(seed) if !imported.has_error() => seed.clone(),
        _ => {
            host::print_diagnostics(&imported.diagnostics);
            anyhow::bail!("Import of {} failed", import_id);
        }
    };

    let lock = host.state().acquire_lock().await?;
    let mut tracked = host.state().load().await?;
    let address = state::address(resource_type, name);

    if tracked.get(&address).is_some() {
        anyhow::bail!("{} is already tracked", address);
    }

    println!("{}", format!("Importing {} as {}...", import_id, address).blue());
    let outcome = handler.read(&seed).await;
    if outcome.state == StateChange::Remove {
        host::print_diagnostics(&outcome.diagnostics);
        anyhow::bail!(
            "Cannot import non-existent remote object {} ({})",
            import_id,
            resource_type
        );
    }
    host.commit(&mut tracked, &address, resource_type, outcome).await?;
    println!("{}", format!("✓ Imported {}", address).green().bold());

    lock.release().await?;
    Ok(())
}
