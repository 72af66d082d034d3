use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn tally(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn food_ledger(dir: &Path) -> std::path::PathBuf {
    let file = dir.join("transactions.json");
    std::fs::write(
        &file,
        r#"{"food": [{"amount": 12.5, "date": "2024-01-01", "type": "expense"}]}"#,
    )
    .unwrap();
    file
}

#[test]
fn add_creates_ledger_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("transactions.json");
    tally(dir.path())
        .arg("--file")
        .arg(&file)
        .args(["add", "food", "12.5", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added food #1"));

    let content = std::fs::read_to_string(&file).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["food"][0]["amount"], 12.5);
    assert_eq!(json["food"][0]["type"], "expense");
}

#[test]
fn update_without_type_drops_it() {
    let dir = tempfile::tempdir().unwrap();
    let file = food_ledger(dir.path());
    tally(dir.path())
        .arg("--file")
        .arg(&file)
        .args(["update", "food", "1", "20.0", "2024-02-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type was cleared"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"food": [{"amount": 20.0, "date": "2024-02-02"}]})
    );
}

#[test]
fn update_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = food_ledger(dir.path());
    let before = std::fs::read_to_string(&file).unwrap();
    tally(dir.path())
        .arg("--file")
        .arg(&file)
        .args(["update", "food", "2", "20.0", "2024-02-02"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid category or transaction index"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn list_by_type() {
    let dir = tempfile::tempdir().unwrap();
    let file = food_ledger(dir.path());
    tally(dir.path())
        .arg("--file")
        .arg(&file)
        .args(["list", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));

    tally(dir.path())
        .arg("--file")
        .arg(&file)
        .args(["list", "--type", "EXPENSE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("food").and(predicate::str::contains("12.5")));
}

#[test]
fn list_rejects_bad_date_query() {
    let dir = tempfile::tempdir().unwrap();
    let file = food_ledger(dir.path());
    tally(dir.path())
        .arg("--file")
        .arg(&file)
        .args(["list", "--date", "01/01/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn add_rejects_non_finite_amount() {
    let dir = tempfile::tempdir().unwrap();
    let file = food_ledger(dir.path());
    let before = std::fs::read_to_string(&file).unwrap();
    for bad in ["nan", "inf", "1e400"] {
        tally(dir.path())
            .arg("--file")
            .arg(&file)
            .args(["add", "food", bad, "2024-01-02"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid amount"));
    }
    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn missing_ledger_is_logged_by_default() {
    let dir = tempfile::tempdir().unwrap();
    tally(dir.path())
        .arg("--file")
        .arg(dir.path().join("absent.json"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."))
        .stderr(predicate::str::contains("not found, starting empty"));
}

#[test]
fn menu_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("transactions.json");
    tally(dir.path())
        .arg("--file")
        .arg(&file)
        .write_stdin("1\nrent\n900\n2024-03-01\n\n5\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Transaction added successfully.")
                .and(predicate::str::contains("Exiting..")),
        );

    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.contains("rent"));
}

#[test]
fn status_without_ledger() {
    let dir = tempfile::tempdir().unwrap();
    tally(dir.path())
        .arg("--file")
        .arg(dir.path().join("missing.json"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ledger file not found"));
}

#[test]
fn load_switches_configured_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let file = food_ledger(dir.path());
    tally(dir.path())
        .arg("load")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to"));

    assert!(dir.path().join(".config/tally/settings.json").exists());

    tally(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("food"));
}

#[test]
fn load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    tally(dir.path())
        .arg("load")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No ledger found"));
}
