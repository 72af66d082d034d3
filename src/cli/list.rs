use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::filter::{self, Query};
use crate::fmt::money;
use crate::ledger::Ledger;
use crate::models::{Store, TxnType};
use crate::view::{build_rows_in, sort_rows, Column, Row, SortDirection};

pub struct ListOptions<'a> {
    pub category: Option<&'a str>,
    pub date: Option<&'a str>,
    pub amount: Option<&'a str>,
    pub txn_type: Option<&'a str>,
    pub sort: Option<Column>,
    pub desc: bool,
}

/// Parse every supplied search option. Each becomes one filter pass.
fn queries(opts: &ListOptions) -> Result<Vec<Query>> {
    let mut out = Vec::new();
    if let Some(c) = opts.category {
        out.push(Query::category(c));
    }
    if let Some(d) = opts.date {
        out.push(Query::date(d)?);
    }
    if let Some(a) = opts.amount {
        out.push(Query::amount(a)?);
    }
    if let Some(t) = opts.txn_type {
        out.push(Query::txn_type(t)?);
    }
    Ok(out)
}

pub(crate) fn select_rows(store: &Store, opts: &ListOptions) -> Result<Vec<Row>> {
    let mut view = store.clone();
    for q in queries(opts)? {
        view = filter::apply(&view, &q)?;
    }
    let mut rows = build_rows_in(&view, store);
    if let Some(column) = opts.sort {
        let dir = if opts.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        sort_rows(&mut rows, column, dir);
    }
    Ok(rows)
}

pub fn run(path: &Path, opts: ListOptions) -> Result<()> {
    let ledger = Ledger::open(path)?;
    let rows = select_rows(ledger.store(), &opts)?;
    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "#", "Date", "Amount", "Type"]);
    let mut income = 0.0;
    let mut expense = 0.0;
    for r in &rows {
        match r.txn.txn_type() {
            Some(TxnType::Income) => income += r.txn.amount,
            Some(TxnType::Expense) => expense += r.txn.amount,
            None => {}
        }
        table.add_row(vec![
            Cell::new(&r.category),
            Cell::new(r.index),
            Cell::new(r.cell(Column::Date)),
            Cell::new(r.cell(Column::Amount)),
            Cell::new(r.cell(Column::Type)),
        ]);
    }
    println!("Transactions\n{table}");

    let net = income - expense;
    let net_label = if net >= 0.0 { "Net".green().bold() } else { "Net".red().bold() };
    println!(
        "Income: {}  Expense: {}  {net_label}: {}",
        money(income),
        money(expense),
        money(net)
    );
    Ok(())
}
