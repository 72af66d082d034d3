use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use super::transactions::{check_category, parse_type};
use crate::error::{Result, TallyError};
use crate::filter::{parse_date, parse_record_amount};
use crate::ledger::Ledger;
use crate::models::Store;

const MENU: &str =
    " 1: Add Transactions\n 2: Update Transactions\n 3: Delete Transactions\n 4: Browse\n 5: Exit";

pub fn run(path: &Path) -> Result<()> {
    let mut ledger = Ledger::open(path)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_with(&mut ledger, &mut input, &mut out, super::browse::show)
}

/// Drive the numbered menu over arbitrary input and output. `browse` is called
/// for choice 4 and blocks until the browser closes.
pub fn run_with<R, W, B>(ledger: &mut Ledger, input: &mut R, out: &mut W, mut browse: B) -> Result<()>
where
    R: BufRead,
    W: Write,
    B: FnMut(&Store) -> Result<()>,
{
    loop {
        writeln!(out, "{MENU}")?;
        let Some(choice) = prompt(input, out, "Enter your choice: ")? else {
            break;
        };
        let outcome = match choice.as_str() {
            "1" => add(ledger, input, out),
            "2" => update(ledger, input, out),
            "3" => delete(ledger, input, out),
            "4" => browse(ledger.store()).map(|_| None),
            "5" => {
                writeln!(out, "Exiting..")?;
                break;
            }
            _ => {
                writeln!(out, "Invalid choice!")?;
                continue;
            }
        };
        match outcome {
            Ok(Some(msg)) => writeln!(out, "{}", msg.green())?,
            Ok(None) => {}
            Err(e) => writeln!(out, "{}", e.to_string().red())?,
        }
    }
    Ok(())
}

/// Print `label` and read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn parse_index(raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| TallyError::Other(format!("Invalid transaction index: '{raw}'")))
}

// Each action returns Ok(None) when input ends mid-prompt.

fn add<R: BufRead, W: Write>(ledger: &mut Ledger, input: &mut R, out: &mut W) -> Result<Option<String>> {
    let Some(category) = prompt(input, out, "Enter the category: ")? else {
        return Ok(None);
    };
    check_category(&category)?;
    let Some(amount) = prompt(input, out, "Enter the amount: ")? else {
        return Ok(None);
    };
    let amount = parse_record_amount(&amount)?;
    let Some(date) = prompt(input, out, "Enter the date (YYYY-MM-DD): ")? else {
        return Ok(None);
    };
    let date = parse_date(&date)?;
    let Some(kind) = prompt(input, out, "Enter the transaction type (income/expense): ")? else {
        return Ok(None);
    };
    let kind = parse_type(Some(&kind))?;

    ledger.add(&category, amount, date, kind)?;
    Ok(Some("Transaction added successfully.".to_string()))
}

fn update<R: BufRead, W: Write>(ledger: &mut Ledger, input: &mut R, out: &mut W) -> Result<Option<String>> {
    let Some(category) = prompt(input, out, "Enter the category: ")? else {
        return Ok(None);
    };
    let Some(index) = prompt(input, out, "Enter the index of the transaction to update: ")? else {
        return Ok(None);
    };
    let index = parse_index(&index)?;
    ledger.get(&category, index)?;

    let Some(amount) = prompt(input, out, "Enter the new amount: ")? else {
        return Ok(None);
    };
    let amount = parse_record_amount(&amount)?;
    let Some(date) = prompt(input, out, "Enter the new date (YYYY-MM-DD): ")? else {
        return Ok(None);
    };
    let date = parse_date(&date)?;

    // The menu never asks for a type, so the stored one is dropped.
    ledger.update(&category, index, amount, date, None)?;
    Ok(Some("Transaction updated successfully.".to_string()))
}

fn delete<R: BufRead, W: Write>(ledger: &mut Ledger, input: &mut R, out: &mut W) -> Result<Option<String>> {
    let Some(category) = prompt(input, out, "Enter the category: ")? else {
        return Ok(None);
    };
    let Some(index) = prompt(input, out, "Enter the index of the transaction to delete: ")? else {
        return Ok(None);
    };
    let index = parse_index(&index)?;
    ledger.delete(&category, index)?;
    Ok(Some("Transaction deleted successfully.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;

    fn test_ledger() -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::open(&dir.path().join("transactions.json")).unwrap();
        (dir, ledger)
    }

    fn drive(ledger: &mut Ledger, script: &str) -> String {
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        run_with(ledger, &mut input, &mut out, |_| Ok(())).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_add_through_menu() {
        let (_dir, mut ledger) = test_ledger();
        let out = drive(&mut ledger, "1\nfood\n12.5\n2024-01-01\n\n5\n");
        assert!(out.contains("Transaction added successfully."));
        assert!(out.contains("Exiting.."));

        let store = storage::load(ledger.path()).unwrap();
        let t = &store.get("food").unwrap()[0];
        assert_eq!(t.amount, 12.5);
        assert_eq!(t.kind.as_deref(), Some("expense"));
    }

    #[test]
    fn test_update_through_menu_drops_type() {
        let (_dir, mut ledger) = test_ledger();
        drive(&mut ledger, "1\nfood\n12.5\n2024-01-01\nincome\n2\nfood\n1\n20\n2024-02-02\n5\n");
        let t = &ledger.store().get("food").unwrap()[0];
        assert_eq!(t.amount, 20.0);
        assert_eq!(t.date, "2024-02-02");
        assert!(t.kind.is_none());
    }

    #[test]
    fn test_update_bad_index_stops_before_amount() {
        let (_dir, mut ledger) = test_ledger();
        // After the failed reference the menu is shown again, so "5" exits.
        let out = drive(&mut ledger, "1\nfood\n1\n2024-01-01\n\n2\nfood\n2\n5\n");
        assert!(out.contains("Invalid category or transaction index"));
        assert!(!out.contains("Enter the new amount"));
        assert_eq!(ledger.store().get("food").unwrap()[0].amount, 1.0);
    }

    #[test]
    fn test_delete_through_menu() {
        let (_dir, mut ledger) = test_ledger();
        let out = drive(&mut ledger, "1\nfood\n1\n2024-01-01\n\n3\nfood\n1\n5\n");
        assert!(out.contains("Transaction deleted successfully."));
        assert!(ledger.store().get("food").unwrap().is_empty());
    }

    #[test]
    fn test_bad_amount_is_reported_and_loop_continues() {
        let (_dir, mut ledger) = test_ledger();
        let out = drive(&mut ledger, "1\nfood\nabc\n5\n");
        assert!(out.contains("Invalid amount"));
        assert!(out.contains("Exiting.."));
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn test_non_finite_amount_is_rejected_and_ledger_reloads() {
        let (_dir, mut ledger) = test_ledger();
        drive(&mut ledger, "1\nfood\n12.5\n2024-01-01\n\n5\n");
        for bad in ["nan", "inf", "1e400"] {
            let out = drive(&mut ledger, &format!("1\nfood\n{bad}\n2\nfood\n1\n{bad}\n5\n"));
            assert_eq!(out.matches("Invalid amount").count(), 2, "accepted {bad}");
        }
        let reopened = Ledger::open(ledger.path()).unwrap();
        let txns = reopened.store().get("food").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, 12.5);
    }

    #[test]
    fn test_bad_type_is_reported() {
        let (_dir, mut ledger) = test_ledger();
        let out = drive(&mut ledger, "1\nfood\n3\n2024-01-01\ngift\n5\n");
        assert!(out.contains("Invalid transaction type"));
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn test_invalid_choice() {
        let (_dir, mut ledger) = test_ledger();
        let out = drive(&mut ledger, "9\nabc\n5\n");
        assert_eq!(out.matches("Invalid choice!").count(), 2);
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_dir, mut ledger) = test_ledger();
        let out = drive(&mut ledger, "1\nfood\n");
        assert!(!out.contains("Transaction added"));
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn test_browse_choice_sees_current_store() {
        let (_dir, mut ledger) = test_ledger();
        let mut seen = Vec::new();
        let mut input = "1\nfood\n1\n2024-01-01\n\n4\n5\n".as_bytes();
        let mut out = Vec::new();
        run_with(&mut ledger, &mut input, &mut out, |store| {
            seen.push(store.transaction_count());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![1]);
    }
}
