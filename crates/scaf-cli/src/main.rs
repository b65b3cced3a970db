//! scaf CLI
//!
//! Thin command-line surface over the scaf editors.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Env { file, action } => commands::run_env(&file, action, cli.dry_run),
        Commands::Manifest { file, action } => commands::run_manifest(&file, action, cli.dry_run),
        Commands::Config { file, action } => commands::run_config(&file, action, cli.dry_run),
        Commands::Provider { file, action } => commands::run_provider(&file, action, cli.dry_run),
        Commands::Text { file, action } => commands::run_text(&file, action, cli.dry_run),
    }
}
