use chrono::NaiveDate;

use crate::error::{Result, TallyError};
use crate::models::{Store, Transaction, TxnType, DATE_FORMAT};

pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// A single search predicate over the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Category(String),
    Date(NaiveDate),
    Amount(f64),
    Type(TxnType),
}

impl Query {
    pub fn category(input: &str) -> Self {
        Query::Category(input.trim().to_string())
    }

    pub fn date(input: &str) -> Result<Self> {
        parse_date(input).map(Query::Date)
    }

    pub fn amount(input: &str) -> Result<Self> {
        parse_amount(input).map(Query::Amount)
    }

    pub fn txn_type(input: &str) -> Result<Self> {
        input.parse().map(Query::Type)
    }

    /// Short label for status lines, e.g. `date: 2024-01-01`.
    pub fn describe(&self) -> String {
        match self {
            Query::Category(q) => format!("category: {q}"),
            Query::Date(d) => format!("date: {}", d.format(DATE_FORMAT)),
            Query::Amount(a) => format!("amount: {a}"),
            Query::Type(t) => format!("type: {t}"),
        }
    }
}

/// Strict `YYYY-MM-DD`: four-digit year, two-digit month and day, dash
/// separated, and a real calendar date. Signed years are rejected.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let s = input.trim();
    let shaped = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(TallyError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| TallyError::InvalidDate(input.to_string()))
}

pub fn parse_amount(input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| TallyError::InvalidAmount(input.to_string()))
}

/// An amount to store on a record. Unlike a query amount it must be finite:
/// `nan`, `inf` and overflowing input such as `1e400` have no JSON number form.
pub fn parse_record_amount(input: &str) -> Result<f64> {
    let amount = parse_amount(input)?;
    if !amount.is_finite() {
        return Err(TallyError::InvalidAmount(input.to_string()));
    }
    Ok(amount)
}

/// Apply `query` to `store`, returning a new mapping. Categories left with no
/// matching transactions are omitted. The store is never modified.
pub fn apply(store: &Store, query: &Query) -> Result<Store> {
    match query {
        Query::Category(q) => Ok(by_category(store, q)),
        Query::Date(d) => by_date(store, *d),
        Query::Amount(a) => Ok(by_amount(store, *a)),
        Query::Type(t) => Ok(by_type(store, *t)),
    }
}

pub fn by_category(store: &Store, query: &str) -> Store {
    let q = query.to_lowercase();
    store
        .iter()
        .filter(|(name, txns)| !txns.is_empty() && name.to_lowercase().contains(&q))
        .map(|(name, txns)| (name.to_string(), txns.to_vec()))
        .collect()
}

/// Fails with `InvalidDate` if any stored date does not parse.
pub fn by_date(store: &Store, date: NaiveDate) -> Result<Store> {
    let mut out = Store::new();
    for (name, txns) in store.iter() {
        let mut matched = Vec::new();
        for t in txns {
            let stored = NaiveDate::parse_from_str(&t.date, DATE_FORMAT)
                .map_err(|_| TallyError::InvalidDate(format!("{} (stored in {name})", t.date)))?;
            if stored == date {
                matched.push(t.clone());
            }
        }
        if !matched.is_empty() {
            out.insert(name.to_string(), matched);
        }
    }
    Ok(out)
}

pub fn by_amount(store: &Store, amount: f64) -> Store {
    retain(store, |t| (t.amount - amount).abs() < AMOUNT_TOLERANCE)
}

pub fn by_type(store: &Store, kind: TxnType) -> Store {
    retain(store, |t| {
        t.kind
            .as_deref()
            .is_some_and(|k| k.to_lowercase() == kind.as_str())
    })
}

fn retain(store: &Store, pred: impl Fn(&Transaction) -> bool) -> Store {
    store
        .iter()
        .filter_map(|(name, txns)| {
            let matched: Vec<Transaction> = txns.iter().filter(|t| pred(t)).cloned().collect();
            if matched.is_empty() {
                None
            } else {
                Some((name.to_string(), matched))
            }
        })
        .collect()
}
