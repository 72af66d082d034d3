use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Store;

/// Read the ledger file. A missing file is a fresh ledger, not an error.
pub fn load(path: &Path) -> Result<Store> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Ledger file {} not found, starting empty", path.display());
            return Ok(Store::new());
        }
        Err(e) => return Err(e.into()),
    };
    let store: Store = serde_json::from_str(&content)?;
    debug!(
        "Loaded {} transactions in {} categories from {}",
        store.transaction_count(),
        store.len(),
        path.display()
    );
    Ok(store)
}

/// Overwrite the ledger file with the whole store.
pub fn save(store: &Store, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(store)?;
    std::fs::write(path, format!("{json}\n"))?;
    debug!(
        "Saved {} transactions to {}",
        store.transaction_count(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use crate::models::Transaction;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir.path().join("transactions.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        let mut store = Store::new();
        store.entry("food").push(Transaction {
            amount: 12.5,
            date: "2024-01-01".to_string(),
            kind: Some("expense".to_string()),
        });
        store.entry("salary");
        save(&store, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, store);
        assert!(loaded.get("salary").unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        std::fs::write(&path, r#"{"old": [{"amount": 1, "date": "2020-01-01"}]}"#).unwrap();
        save(&Store::new(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "{}");
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("ledger.json");
        save(&Store::new(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path), Err(TallyError::Json(_))));
    }

    #[test]
    fn test_load_reads_compact_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        std::fs::write(
            &path,
            r#"{"food": [{"amount": 12.5, "date": "2024-01-01", "type": "expense"}]}"#,
        )
        .unwrap();
        let store = load(&path).unwrap();
        assert_eq!(store.get("food").unwrap()[0].kind.as_deref(), Some("expense"));
    }
}
