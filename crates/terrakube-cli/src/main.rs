mod commands;
mod host;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "terrakube")]
#[command(about = "Manage Terrakube teams, modules and collections", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Project directory holding .terrakube/state.json
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Log provider activity to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Terrakube connection settings
#[derive(clap::Args, Debug)]
pub struct ConnectionArgs {
    /// Terrakube API endpoint
    #[arg(long, global = true, env = "TERRAKUBE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Terrakube personal access token
    #[arg(long, global = true, env = "TERRAKUBE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true, env = "TERRAKUBE_INSECURE_HTTP_CLIENT")]
    pub insecure: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print resource schemas as JSON
    Schema {
        /// Resource type (e.g. terrakube_team); all types when omitted
        resource_type: Option<String>,
    },
    /// Create a resource from a JSON configuration file
    Create {
        /// Resource type (e.g. terrakube_team)
        resource_type: String,
        /// Local name of the resource in state
        name: String,
        /// JSON file with the resource's attributes
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Refresh a tracked resource from the API
    Read {
        resource_type: String,
        name: String,
    },
    /// Apply a changed configuration to a tracked resource
    Update {
        resource_type: String,
        name: String,
        /// JSON file with the resource's attributes
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Delete a tracked resource
    Delete {
        resource_type: String,
        name: String,
    },
    /// Bring an existing entity under management
    Import {
        resource_type: String,
        name: String,
        /// Identifier in the form <organization_id>,<id>
        import_id: String,
    },
    /// List tracked resources
    State {
        /// Only show resources of this type
        resource_type: Option<String>,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new(
            "terrakube=debug,terrakube_api=debug,terrakube_provider=debug",
        )
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Version => {
            println!("terrakube {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Schema { resource_type } => {
            commands::schema::handle(resource_type.as_deref())?;
        }
        Commands::State { resource_type } => {
            commands::state::handle(&cli.dir, resource_type.as_deref()).await?;
        }
        Commands::Create {
            resource_type,
            name,
            config,
        } => {
            let host = host::Host::connect(&cli.connection, &cli.dir)?;
            commands::create::handle(&host, &resource_type, &name, &config).await?;
        }
        Commands::Read {
            resource_type,
            name,
        } => {
            let host = host::Host::connect(&cli.connection, &cli.dir)?;
            commands::read::handle(&host, &resource_type, &name).await?;
        }
        Commands::Update {
            resource_type,
            name,
            config,
        } => {
            let host = host::Host::connect(&cli.connection, &cli.dir)?;
            commands::update::handle(&host, &resource_type, &name, &config).await?;
        }
        Commands::Delete {
            resource_type,
            name,
        } => {
            let host = host::Host::connect(&cli.connection, &cli.dir)?;
            commands::delete::handle(&host, &resource_type, &name).await?;
        }
        Commands::Import {
            resource_type,
            name,
            import_id,
        } => {
            let host = host::Host::connect(&cli.connection, &cli.dir)?;
            commands::import::handle(&host, &resource_type, &name, &import_id).await?;
        }
    }

    Ok(())
}
