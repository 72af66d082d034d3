use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Result, TallyError};
use crate::models::{Store, Transaction, TxnType};
use crate::storage;

/// The record store: the in-memory ledger and the file it is persisted to.
/// Every successful mutation rewrites the whole file.
pub struct Ledger {
    store: Store,
    path: PathBuf,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self> {
        let store = storage::load(path)?;
        Ok(Self {
            store,
            path: path.to_path_buf(),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a transaction, creating the category if needed. Returns its 1-based index.
    pub fn add(
        &mut self,
        category: &str,
        amount: f64,
        date: NaiveDate,
        kind: Option<TxnType>,
    ) -> Result<usize> {
        check_amount(amount)?;
        let kind = kind.unwrap_or(TxnType::Expense);
        let txns = self.store.entry(category);
        txns.push(Transaction::new(amount, date, Some(kind)));
        let index = txns.len();
        self.persist()?;
        info!("Added {kind} of {amount} on {date} to {category} #{index}");
        Ok(index)
    }

    /// Replace the transaction at 1-based `index`.
    ///
    /// With `kind` of `None` the stored type is dropped; menu updates never
    /// carry a type, so their records come back untyped.
    pub fn update(
        &mut self,
        category: &str,
        index: usize,
        amount: f64,
        date: NaiveDate,
        kind: Option<TxnType>,
    ) -> Result<()> {
        check_amount(amount)?;
        let slot = self.slot(category, index)?;
        let txns = self
            .store
            .get_mut(category)
            .ok_or_else(|| invalid_reference(category, index))?;
        txns[slot] = Transaction::new(amount, date, kind);
        self.persist()?;
        info!("Updated {category} #{index}");
        Ok(())
    }

    /// Remove the transaction at 1-based `index`; later entries shift down.
    pub fn delete(&mut self, category: &str, index: usize) -> Result<Transaction> {
        let slot = self.slot(category, index)?;
        let txns = self
            .store
            .get_mut(category)
            .ok_or_else(|| invalid_reference(category, index))?;
        let removed = txns.remove(slot);
        self.persist()?;
        info!("Deleted {category} #{index}");
        Ok(removed)
    }

    /// The transaction at 1-based `index`, or `InvalidReference`.
    pub fn get(&self, category: &str, index: usize) -> Result<&Transaction> {
        let slot = self.slot(category, index)?;
        self.store
            .get(category)
            .and_then(|txns| txns.get(slot))
            .ok_or_else(|| invalid_reference(category, index))
    }

    fn slot(&self, category: &str, index: usize) -> Result<usize> {
        let len = self
            .store
            .get(category)
            .map(|txns| txns.len())
            .ok_or_else(|| invalid_reference(category, index))?;
        if index == 0 || index > len {
            return Err(invalid_reference(category, index));
        }
        Ok(index - 1)
    }

    fn persist(&self) -> Result<()> {
        storage::save(&self.store, &self.path)
    }
}

// A non-finite f64 serializes as `null`, which would make the file unloadable.
fn check_amount(amount: f64) -> Result<()> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(TallyError::InvalidAmount(amount.to_string()))
    }
}

fn invalid_reference(category: &str, index: usize) -> TallyError {
    TallyError::InvalidReference {
        category: category.to_string(),
        index,
    }
}
