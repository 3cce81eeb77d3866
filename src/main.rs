//! imgrot - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;

use imgrot::cli::{Cli, Commands, ConfigCommands};
use imgrot::logging::init_logging;
use imgrot::Config;

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    if let Err(e) = init_logging(&config.log_file(), &config.logging.level) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match cli.command {
        Commands::Browse { dir } => commands::browse::handle(&dir, config),
        Commands::Scan { dir } => commands::scan::handle(&dir, &config),
        Commands::Export { dir, output, upto } => {
            commands::export::handle(&dir, &output, upto, &config)
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config),
            ConfigCommands::Path => commands::config::handle_path(),
        },
    }
}
