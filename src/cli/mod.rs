pub mod backup;
pub mod browse;
pub mod list;
pub mod load;
pub mod menu;
pub mod status;
pub mod transactions;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use crate::view::Column;

#[derive(Parser)]
#[command(name = "tally", about = "Track personal income and expenses by category.")]
pub struct Cli {
    /// Ledger file (default: the configured ledger, else ./transactions.json)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Logging verbosity: off, error, warn, info, debug, trace. RUST_LOG overrides it.
    #[arg(long = "log-level", global = true, default_value_t = LevelFilter::WARN)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Numbered text menu for adding, updating and deleting (the default).
    Menu,
    /// Add a transaction to a category.
    Add {
        /// Category name, created if new
        category: String,
        /// Amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Date: YYYY-MM-DD
        date: String,
        /// income or expense (default: expense)
        #[arg(long = "type")]
        txn_type: Option<String>,
    },
    /// Replace a transaction. Without --type the stored type is cleared.
    Update {
        /// Category name
        category: String,
        /// Transaction number within the category, starting at 1
        index: usize,
        /// New amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// New date: YYYY-MM-DD
        date: String,
        /// income or expense
        #[arg(long = "type")]
        txn_type: Option<String>,
    },
    /// Delete a transaction.
    Delete {
        /// Category name
        category: String,
        /// Transaction number within the category, starting at 1
        index: usize,
    },
    /// Print transactions, optionally filtered and sorted.
    List {
        /// Case-insensitive substring of the category name
        #[arg(long)]
        category: Option<String>,
        /// Exact date: YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Amount, matched within 0.01
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// income or expense
        #[arg(long = "type")]
        txn_type: Option<String>,
        /// Sort column: date, amount or type
        #[arg(long)]
        sort: Option<Column>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Interactive table with search and sortable columns.
    Browse,
    /// Show the ledger file and summary totals.
    Status,
    /// Switch to an existing ledger file.
    Load {
        /// Path to a ledger JSON file
        path: String,
    },
    /// Copy the ledger file to a timestamped backup.
    Backup {
        /// Output path (default: <ledger dir>/backups/<name>-YYYYMMDD-HHMMSS.json)
        #[arg(long)]
        output: Option<String>,
    },
}
