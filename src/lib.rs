//! taxibook library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod google;
pub mod models;
pub mod scanner;
pub mod sync;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use ui::messages::warning;
use ui::theme::{self, Theme};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(cli, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Shift { action } => cli::commands::shift::handle(action, cfg),
        Commands::Ride { action } => cli::commands::ride::handle(action, cfg),
        Commands::Expense { action } => cli::commands::expense::handle(action, cfg),
        Commands::Ref { action } => cli::commands::reference::handle(action, cfg),
        Commands::Scan { .. } => cli::commands::scan::handle(&cli.command, cfg),
        Commands::Summary { period } => cli::commands::summary::handle(period.as_ref(), cfg),
        Commands::Sync { action } => cli::commands::sync::handle(action, cli, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // test mode never reads the user's config file
    let mut cfg = if cli.test {
        Config {
            setup_completed: true,
            ..Config::default()
        }
    } else {
        Config::load()?
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    theme::init(Theme::from_config(&cfg.theme));

    if !cfg.setup_completed && !matches!(cli.command, Commands::Init) {
        warning("Setup not completed yet: run `taxibook init` to create the configuration.");
    }

    dispatch(&cli, &cfg)
}
