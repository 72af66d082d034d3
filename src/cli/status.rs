use std::path::Path;

use crate::error::Result;
use crate::fmt::{format_bytes, money};
use crate::models::{Store, TxnType};
use crate::settings::settings_path;
use crate::storage;

pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub untyped: usize,
}

pub fn totals(store: &Store) -> Totals {
    let mut t = Totals {
        income: 0.0,
        expense: 0.0,
        untyped: 0,
    };
    for (_, txns) in store.iter() {
        for txn in txns {
            match txn.txn_type() {
                Some(TxnType::Income) => t.income += txn.amount,
                Some(TxnType::Expense) => t.expense += txn.amount,
                None => t.untyped += 1,
            }
        }
    }
    t
}

pub fn run(path: &Path) -> Result<()> {
    println!("Settings:      {}", settings_path().display());
    println!("Ledger:        {}", path.display());

    if !path.exists() {
        println!();
        println!("Ledger file not found. Add a transaction to create it.");
        return Ok(());
    }

    let size = std::fs::metadata(path)?.len();
    println!("File size:     {}", format_bytes(size));

    let store = storage::load(path)?;
    let t = totals(&store);
    println!();
    let names: Vec<&str> = store.categories().collect();
    println!("Categories:    {} ({})", store.len(), names.join(", "));
    println!("Transactions:  {}", store.transaction_count());
    println!("Income:        {}", money(t.income));
    println!("Expense:       {}", money(t.expense));
    println!("Net:           {}", money(t.income - t.expense));
    if t.untyped > 0 {
        println!("Untyped:       {}", t.untyped);
    }
    Ok(())
}
