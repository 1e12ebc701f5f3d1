use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{AppConfig, ErrorEnvelope};
use database::{ConnectionProvider, DbRepository, SensorRepository};
use std::net::IpAddr;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Project Nexus sensor API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config().context("Failed to load configuration")?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => web_server::run_server(args.apply(config)).await,
        Commands::CheckDb => handle_check_db(&config).await,
        Commands::Zones => handle_zones(&config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Read-only HTTP API over greenhouse zone sensor readings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Query the database clock once and exit.
    CheckDb,
    /// Print all zones, ordered by name.
    Zones,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind, overriding `server.host`.
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind, overriding `server.port`.
    #[arg(long)]
    port: Option<u16>,

    /// How `/db` and `/zones` report database failures.
    #[arg(long, value_enum)]
    error_envelope: Option<ErrorEnvelope>,
}

impl ServeArgs {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(envelope) = self.error_envelope {
            config.errors.envelope = envelope;
        }
        config
    }
}

// ==============================================================================
// Operator Commands
// ==============================================================================

fn repository(config: &AppConfig) -> anyhow::Result<DbRepository> {
    let provider = ConnectionProvider::from_config(config)?;
    Ok(DbRepository::new(provider))
}

async fn handle_check_db(config: &AppConfig) -> anyhow::Result<()> {
    let now = repository(config)?
        .database_time()
        .await
        .context("Database check failed")?;
    println!("Database reachable, server time {}", now.to_rfc3339());
    Ok(())
}

async fn handle_zones(config: &AppConfig) -> anyhow::Result<()> {
    let zones = repository(config)?
        .list_zones()
        .await
        .context("Failed to list zones")?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for zone in &zones {
        table.add_row(vec![zone.id.to_string(), zone.name.clone()]);
    }
    println!("{table}");
    Ok(())
}
