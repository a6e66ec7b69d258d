mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("magspin CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match &cli.command {
        Commands::Angles(args) => {
            info!("Dispatching to 'angles' command.");
            commands::angles::run(args)
        }
        Commands::Vector(args) => {
            info!("Dispatching to 'vector' command.");
            commands::vector::run(args)
        }
        Commands::Rotate(args) => {
            info!("Dispatching to 'rotate' command.");
            commands::transform::rotate(args)
        }
        Commands::Mirror(args) => {
            info!("Dispatching to 'mirror' command.");
            commands::transform::mirror(args)
        }
        Commands::Apply(args) => {
            info!("Dispatching to 'apply' command.");
            commands::transform::apply(args)
        }
        Commands::Images(args) => {
            info!("Dispatching to 'images' command.");
            commands::images::run(args)
        }
    };

    match &command_result {
        Ok(()) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }

    command_result
}
