//! Command-line front end.
//!
//! The binary stays a thin wrapper around [`run`], which parses arguments,
//! layers configuration and dispatches to a subcommand handler.

mod commands;
pub mod logging;

use anyhow::{Context, Result};
use clap::Parser;
pub use cli_defs::{AppConfig, Cli, Commands, ConfigOverrides};
use cli_defs::{DEFAULT_DEMO_RESOURCE, DEFAULT_PACE_MS, DemoArgs};

use crate::session::SessionConfig;

/// Parse process arguments and run the requested command.
///
/// # Errors
/// Returns any failure from configuration loading or the command itself.
pub fn run() -> Result<()> { run_with_cli(Cli::parse()) }

/// Run an already parsed [`Cli`].
///
/// # Errors
/// Returns any failure from configuration loading or the command itself.
pub fn run_with_cli(cli: Cli) -> Result<()> {
    logging::init_tracing()?;
    let app = AppConfig::load(&cli.config).context("failed to load configuration")?;
    let cfg = SessionConfig::from(&app);
    match cli.command.unwrap_or_else(default_command) {
        Commands::Query => commands::query(&cfg),
        Commands::Send(args) => commands::send(&cfg, &args),
        Commands::Load(args) => commands::load(&cfg, &args),
        Commands::Demo(args) => commands::demo(&cfg, &args),
        Commands::WriteExamples(args) => commands::write_examples(&args),
    }
}

fn default_command() -> Commands {
    Commands::Demo(DemoArgs {
        resource: DEFAULT_DEMO_RESOURCE.to_owned(),
        pace_ms: DEFAULT_PACE_MS,
    })
}
