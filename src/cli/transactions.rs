use std::path::Path;

use colored::Colorize;

use crate::error::{Result, TallyError};
use crate::filter::{parse_date, parse_record_amount};
use crate::ledger::Ledger;
use crate::models::TxnType;

pub(crate) fn parse_type(input: Option<&str>) -> Result<Option<TxnType>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

pub(crate) fn check_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(TallyError::Other("Category cannot be empty".into()));
    }
    Ok(())
}

pub fn add(path: &Path, category: &str, amount: &str, date: &str, txn_type: Option<&str>) -> Result<()> {
    check_category(category)?;
    let amount = parse_record_amount(amount)?;
    let date = parse_date(date)?;
    let kind = parse_type(txn_type)?;

    let mut ledger = Ledger::open(path)?;
    let index = ledger.add(category, amount, date, kind)?;
    println!("Added {category} #{index} to {}", ledger.path().display());
    Ok(())
}

pub fn update(
    path: &Path,
    category: &str,
    index: usize,
    amount: &str,
    date: &str,
    txn_type: Option<&str>,
) -> Result<()> {
    let amount = parse_record_amount(amount)?;
    let date = parse_date(date)?;
    let kind = parse_type(txn_type)?;

    let mut ledger = Ledger::open(path)?;
    let had_type = ledger.get(category, index)?.kind.is_some();
    ledger.update(category, index, amount, date, kind)?;
    println!("Updated {category} #{index}");
    if kind.is_none() && had_type {
        println!(
            "{}",
            "Note: the transaction type was cleared. Pass --type to keep it.".yellow()
        );
    }
    Ok(())
}

pub fn delete(path: &Path, category: &str, index: usize) -> Result<()> {
    let mut ledger = Ledger::open(path)?;
    let removed = ledger.delete(category, index)?;
    println!(
        "Deleted {category} #{index} ({} on {})",
        removed.amount, removed.date
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;

    #[test]
    fn test_parse_type_blank_is_none() {
        assert_eq!(parse_type(None).unwrap(), None);
        assert_eq!(parse_type(Some("  ")).unwrap(), None);
        assert_eq!(parse_type(Some("Income")).unwrap(), Some(TxnType::Income));
        assert!(parse_type(Some("gift")).is_err());
    }

    #[test]
    fn test_add_rejects_bad_input_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        assert!(matches!(
            add(&path, "food", "twelve", "2024-01-01", None),
            Err(TallyError::InvalidAmount(_))
        ));
        assert!(matches!(
            add(&path, "food", "12", "01/01/2024", None),
            Err(TallyError::InvalidDate(_))
        ));
        assert!(add(&path, " ", "12", "2024-01-01", None).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_add_update_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        add(&path, "food", "12.5", "2024-01-01", Some("expense")).unwrap();
        add(&path, "food", "-3", "2024-01-02", None).unwrap();
        update(&path, "food", 1, "20", "2024-02-02", Some("income")).unwrap();
        delete(&path, "food", 2).unwrap();

        let store = storage::load(&path).unwrap();
        let txns = store.get("food").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, 20.0);
        assert_eq!(txns[0].kind.as_deref(), Some("income"));
    }

    #[test]
    fn test_update_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        add(&path, "food", "12.5", "2024-01-01", None).unwrap();
        assert!(matches!(
            update(&path, "food", 2, "1", "2024-01-01", None),
            Err(TallyError::InvalidReference { .. })
        ));
    }
}
