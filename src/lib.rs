//! guardshift library root.
//! Exposes the CLI parser, the high-level run() function and the attendance
//! core (scan processing, schedule toggling, reconciliation, absences).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;
pub mod worker;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::AddEmployee { .. }
        | Commands::SetActive { .. }
        | Commands::AddProject { .. }
        | Commands::AddShift { .. }
        | Commands::Shifts { .. } => cli::commands::directory::handle(cli, cfg),
        Commands::Scan { .. } => cli::commands::scan::handle(cli, cfg),
        Commands::Toggle { .. }
        | Commands::Overtime { .. }
        | Commands::Leave { .. }
        | Commands::Schedule { .. } => cli::commands::schedule::handle(cli, cfg),
        Commands::List { .. } => cli::commands::list::handle(cli, cfg),
        Commands::Reconcile { .. } | Commands::Absences { .. } => {
            cli::commands::sweep::handle(cli, cfg)
        }
        Commands::Serve => cli::commands::serve::handle(cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (tests) finds a subscriber already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    init_tracing(&cfg.log_filter);

    let result = dispatch(&cli, &cfg);
    if let (true, Err(e)) = (cli.json, &result) {
        ui::messages::json_error(e);
    }
    result
}
