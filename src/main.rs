//! Gainstage CLI
//!
//! Command-line interface for the gain-staging calculator.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use gainstage::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Gainstage v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Gainstage v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Level { text, reference } => commands::level(&text, reference.as_deref())
            .with_context(|| format!("could not evaluate level '{}'", text)),
        Commands::Gain { text } => {
            commands::gain(&text).with_context(|| format!("could not evaluate gain '{}'", text))
        }
        Commands::Chain { path, zone } => commands::chain(&path, zone)
            .with_context(|| format!("could not evaluate chain {}", path.display())),
    }
}
