use std::str::FromStr;

use crate::error::TallyError;
use crate::fmt::amount_repr;
use crate::models::{Store, Transaction};

/// One displayed line: a transaction with the category and 1-based index it
/// lives at, and its position in the order the view was built.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub category: String,
    pub index: usize,
    pub seq: usize,
    pub txn: Transaction,
}

impl Row {
    /// The column's display string, which is also its sort key.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Date => self.txn.date.clone(),
            Column::Amount => amount_repr(self.txn.amount),
            Column::Type => self.txn.kind.clone().unwrap_or_default(),
        }
    }
}

/// Flatten a store into rows, category by category.
pub fn build_rows(store: &Store) -> Vec<Row> {
    build_rows_in(store, store)
}

/// Flatten a filtered view into rows whose indexes point back into `store`.
///
/// A filtered sequence is a subsequence of the stored one, so each record is
/// matched against the earliest equal record after the previous match.
pub fn build_rows_in(view: &Store, store: &Store) -> Vec<Row> {
    let mut rows = Vec::with_capacity(view.transaction_count());
    for (name, txns) in view.iter() {
        let origin = store.get(name).unwrap_or(&[]);
        let mut cursor = 0;
        for (i, t) in txns.iter().enumerate() {
            let found = origin
                .get(cursor..)
                .and_then(|rest| rest.iter().position(|o| o == t))
                .map(|p| cursor + p);
            let index = match found {
                Some(pos) => {
                    cursor = pos + 1;
                    pos + 1
                }
                None => i + 1,
            };
            rows.push(Row {
                category: name.to_string(),
                index,
                seq: rows.len(),
                txn: t.clone(),
            });
        }
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Amount,
    Type,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Date, Column::Amount, Column::Type];

    pub fn title(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Amount => "Amount",
            Column::Type => "Type",
        }
    }

    fn slot(&self) -> usize {
        match self {
            Column::Date => 0,
            Column::Amount => 1,
            Column::Type => 2,
        }
    }
}

impl FromStr for Column {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Column::Date),
            "amount" => Ok(Column::Amount),
            "type" => Ok(Column::Type),
            other => Err(TallyError::Other(format!(
                "Unknown column '{other}': expected date, amount or type"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "\u{25b2}",
            SortDirection::Descending => "\u{25bc}",
        }
    }
}

/// Reorder rows by the column's display string. Ties fall back to build
/// order, so descending is always the exact reverse of ascending.
pub fn sort_rows(rows: &mut [Row], column: Column, direction: SortDirection) {
    rows.sort_by_cached_key(|r| (r.cell(column), r.seq));
    if direction == SortDirection::Descending {
        rows.reverse();
    }
}

/// Per-column sort toggles. Each column starts ascending and flips on every
/// invocation, independent of the others.
#[derive(Debug, Default)]
pub struct SortState {
    next: [Option<SortDirection>; 3],
    active: Option<(Column, SortDirection)>,
}

impl SortState {
    /// Direction for this invocation on `column`; flips the column's toggle.
    pub fn toggle(&mut self, column: Column) -> SortDirection {
        let slot = &mut self.next[column.slot()];
        let dir = slot.unwrap_or(SortDirection::Ascending);
        *slot = Some(match dir {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        });
        self.active = Some((column, dir));
        dir
    }

    /// The most recently applied sort, for header markers.
    pub fn active(&self) -> Option<(Column, SortDirection)> {
        self.active
    }

    /// Forget all toggles; called whenever the rows are rebuilt.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
