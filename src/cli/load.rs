use std::path::PathBuf;

use crate::error::{Result, TallyError};
use crate::settings::{load_settings, save_settings, shellexpand_path};
use crate::storage;

pub fn run(path: &str) -> Result<()> {
    let expanded = PathBuf::from(shellexpand_path(path));
    if !expanded.is_file() {
        return Err(TallyError::Settings(format!(
            "No ledger found at {}\nRun `tally --file {} add ...` to start one.",
            expanded.display(),
            expanded.display()
        )));
    }
    let resolved = std::fs::canonicalize(&expanded)?;
    let store = storage::load(&resolved)?;

    let mut settings = load_settings();
    settings.ledger_path = resolved.to_string_lossy().to_string();
    save_settings(&settings)?;

    println!(
        "Switched to {} ({} transactions)",
        resolved.display(),
        store.transaction_count()
    );
    Ok(())
}
