//! roslist - RouterOS country address-list generator.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use roslist::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate { family, dry_run } => {
            roslist::commands::generate::run(family, dry_run, &cli.config).await
        }
        Commands::InitConfig { force } => roslist::commands::init_config::run(force, &cli.config),
        Commands::Version => {
            println!("roslist {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
