mod config;
mod logging;
mod server;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use resource_api::ResourceApiModule;
use resource_api::infra::policy::hash_password;

use crate::config::AppConfig;

/// Storefront Server - generic REST resources behind an access policy
#[derive(Parser)]
#[command(name = "storefront-server")]
#[command(about = "Storefront Server - generic REST resources behind an access policy")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Print the SHA-256 hex digest to store as a user's `password_sha256`
    HashPassword {
        /// Plain-text password
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::HashPassword { password }) = &cli.command {
        println!("{}", hash_password(password));
        return Ok(());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port);

    logging::init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!("Storefront Server starting");
            server::run(config).await
        }
        Commands::Check => check_config(&config).await,
        Commands::HashPassword { .. } => Ok(()),
    }
}

async fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    // Building the module also opens and migrates the configured storage.
    let module = ResourceApiModule::from_config(&config.resource_api).await?;
    println!("Configuration is valid");
    println!("Resources: {}", module.state().paths().join(", "));
    println!("{}", config.to_yaml()?);
    Ok(())
}
