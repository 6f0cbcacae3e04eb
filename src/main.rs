//! idstore - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;

use idstore::cli::{Cli, Commands, ConfigCommands};
use idstore::{logging, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config must not prevent logging from coming up; the command
    // itself will report the parse error.
    let level = Config::load()
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| idstore::config::default_log_level());
    logging::init(&level);

    match cli.command {
        Commands::Migrate {
            store,
            no_backup,
            dry_run,
        } => commands::migrate::handle(store, no_backup, dry_run),
        Commands::Inspect { store } => commands::inspect::handle(store),
        Commands::Connections { store, sort } => commands::connections::handle(store, sort),
        Commands::Preview { profile, store } => commands::preview::handle(&profile, store),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Path => commands::config::handle_path(),
        },
    }
}
