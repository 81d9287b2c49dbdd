//! protosim - protocol description checker
//!
//! Validates a protocol document and a settings document and prints both as tables.

mod config;
mod driver;

use clap::Parser;
use colored::Colorize;
use config::Config;
use protosim_core::{ConsoleOutput, Output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protosim")]
#[command(about = "Simulator, executor for N protocol entities")]
#[command(version)]
struct Cli {
    /// Path to the protocol file (in YAML extension)
    #[arg(short, long)]
    protocol: PathBuf,

    /// Path to the settings file (in YAML extension)
    #[arg(short, long)]
    settings: PathBuf,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            eprintln!("{}: {}", "Error".bold().red(), e);
            return ExitCode::FAILURE;
        }
    };
    if !config.output.color {
        colored::control::set_override(false);
    }

    let mut out = ConsoleOutput::new();
    match driver::run(&cli.protocol, &cli.settings, &config, &mut out) {
        Ok(outcome) => ExitCode::from(outcome.exit_status(config.exit.fail_on_error)),
        Err(e) => {
            tracing::error!("unexpected error: {}", e);
            out.error("Error", &e.to_string());
            if config.exit.fail_on_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}
