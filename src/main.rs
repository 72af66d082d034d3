mod browser;
mod cli;
mod error;
mod filter;
mod fmt;
mod ledger;
mod models;
mod settings;
mod storage;
mod tui;
mod view;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::list::ListOptions;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let path = settings::ledger_path(cli.file.as_deref());
    debug!("Using ledger {}", path.display());

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cli::menu::run(&path),
        Commands::Add {
            category,
            amount,
            date,
            txn_type,
        } => cli::transactions::add(&path, &category, &amount, &date, txn_type.as_deref()),
        Commands::Update {
            category,
            index,
            amount,
            date,
            txn_type,
        } => cli::transactions::update(&path, &category, index, &amount, &date, txn_type.as_deref()),
        Commands::Delete { category, index } => cli::transactions::delete(&path, &category, index),
        Commands::List {
            category,
            date,
            amount,
            txn_type,
            sort,
            desc,
        } => cli::list::run(
            &path,
            ListOptions {
                category: category.as_deref(),
                date: date.as_deref(),
                amount: amount.as_deref(),
                txn_type: txn_type.as_deref(),
                sort,
                desc,
            },
        ),
        Commands::Browse => cli::browse::run(&path),
        Commands::Status => cli::status::run(&path),
        Commands::Load { path } => cli::load::run(&path),
        Commands::Backup { output } => cli::backup::run(&path, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber. RUST_LOG, when set, takes precedence.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
