use std::path::Path;

use crate::browser::LedgerBrowser;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::Store;

pub fn run(path: &Path) -> Result<()> {
    let ledger = Ledger::open(path)?;
    show(ledger.store())
}

/// Open the interactive table over `store` and block until it is closed.
pub fn show(store: &Store) -> Result<()> {
    let mut browser = LedgerBrowser::new(store);
    browser.run()?;
    Ok(())
}
