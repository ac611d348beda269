// ABOUTME: Entry point for the edgesite CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::DeployArgs;
use edgesite::config::{self, Config};
use edgesite::error::Result;
use edgesite::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(cli.quiet, cli.json);

    if let Err(e) = run(cli, Output::new(mode)).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    match cli.command {
        Commands::Init {
            site,
            domain,
            content,
            force,
        } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(
                &cwd,
                site.as_deref(),
                domain.as_deref(),
                content.as_deref(),
                force,
            )?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Deploy {
            site,
            domain,
            content,
            destination,
            no_input,
        } => {
            let cwd = env::current_dir()?;
            config::load_dotenv(&cwd)?;
            let config = Config::discover_or_default(&cwd)?;

            let config = if let Some(dest) = destination {
                config.for_destination(&dest)?
            } else {
                config
            };

            let args = DeployArgs {
                site,
                domain,
                content,
                interactive: !no_input,
            };
            commands::deploy(config, args, output).await
        }
    }
}
