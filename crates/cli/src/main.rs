mod setup;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::{Environment, Settings};

/// Shelf reading tracker backend
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load settings and serve the HTTP API
    Serve,
    /// Copy `env.<environment>` to `.env`
    Setup {
        /// Environment whose template should be installed
        #[arg(short, long, default_value = "local", value_parser = parse_environment)]
        environment: Environment,
        /// Directory holding the templates and receiving `.env`
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Overwrite an existing `.env`
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_environment(value: &str) -> Result<Environment, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => serve(),
        Command::Setup {
            environment,
            dir,
            force,
        } => {
            let installed = setup::install_env(&dir, environment, force)?;
            setup::print_next_steps(&installed, environment);
            Ok(())
        }
    }
}

fn serve() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = %settings.environment,
        storage = %settings.storage.path.display(),
        "shelf serve starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(shelf_app::run(settings))
}
