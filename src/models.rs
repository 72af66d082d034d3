use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TallyError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnType {
    Income,
    Expense,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Income => "income",
            TxnType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxnType {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxnType::Income),
            "expense" => Ok(TxnType::Expense),
            _ => Err(TallyError::InvalidType(s.to_string())),
        }
    }
}

/// One income or expense record. Identity is positional within its category.
///
/// `kind` keeps the raw `type` string from the file so hand-edited ledgers
/// round trip untouched; it is `None` after an update that did not carry a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub date: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Transaction {
    pub fn new(amount: f64, date: NaiveDate, kind: Option<TxnType>) -> Self {
        Self {
            amount,
            date: date.format(DATE_FORMAT).to_string(),
            kind: kind.map(|k| k.as_str().to_string()),
        }
    }

    pub fn txn_type(&self) -> Option<TxnType> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }
}

/// Category name to transactions, in category insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    categories: Vec<(String, Vec<Transaction>)>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of categories, including empty ones.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.categories.iter().map(|(_, txns)| txns.len()).sum()
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|(name, _)| name == category)
    }

    pub fn get(&self, category: &str) -> Option<&[Transaction]> {
        self.position(category)
            .map(|pos| self.categories[pos].1.as_slice())
    }

    pub fn get_mut(&mut self, category: &str) -> Option<&mut Vec<Transaction>> {
        let pos = self.position(category)?;
        Some(&mut self.categories[pos].1)
    }

    /// The sequence for `category`, created empty at the end if absent.
    pub fn entry(&mut self, category: &str) -> &mut Vec<Transaction> {
        let pos = match self.position(category) {
            Some(pos) => pos,
            None => {
                self.categories.push((category.to_string(), Vec::new()));
                self.categories.len() - 1
            }
        };
        &mut self.categories[pos].1
    }

    /// Replace the sequence for `category` in place, or append it.
    pub fn insert(&mut self, category: String, transactions: Vec<Transaction>) {
        match self.position(&category) {
            Some(pos) => self.categories[pos].1 = transactions,
            None => self.categories.push((category, transactions)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Transaction])> {
        self.categories
            .iter()
            .map(|(name, txns)| (name.as_str(), txns.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, Vec<Transaction>)> for Store {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Transaction>)>>(iter: I) -> Self {
        let mut store = Store::new();
        for (category, txns) in iter {
            store.insert(category, txns);
        }
        store
    }
}

impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (category, txns) in &self.categories {
            map.serialize_entry(category, txns)?;
        }
        map.end()
    }
}

struct StoreVisitor;

impl<'de> Visitor<'de> for StoreVisitor {
    type Value = Store;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping category names to transaction lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Store, A::Error> {
        let mut store = Store::new();
        while let Some((category, txns)) = access.next_entry::<String, Vec<Transaction>>()? {
            // Later duplicates win, keeping the first position.
            store.insert(category, txns);
        }
        Ok(store)
    }
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StoreVisitor)
    }
}
