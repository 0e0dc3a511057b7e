// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::db;
use famledger::ledger::LedgerStore;
use famledger::mirror::{MirrorError, MirrorRow, MirrorSink, SheetMirrorSink};
use famledger::models::TransactionDraft;
use famledger::sync::{SyncError, TransactionSynchronizer};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn store() -> LedgerStore {
    LedgerStore::new(db::open_in_memory().unwrap())
}

fn draft(date: &str, description: &str, amount: i64) -> TransactionDraft {
    TransactionDraft {
        date: date.to_string(),
        description: description.to_string(),
        category: "Groceries".to_string(),
        amount: Decimal::from(amount),
    }
}

/// A mirror whose endpoints are down.
struct BrokenSink;

impl MirrorSink for BrokenSink {
    fn append(&self, _row: &MirrorRow) -> Result<(), MirrorError> {
        Err(MirrorError::Status(500))
    }
    fn update(&self, _id: &str, _row: &MirrorRow) -> Result<(), MirrorError> {
        Err(MirrorError::Status(500))
    }
    fn delete(&self, _id: &str) -> Result<(), MirrorError> {
        Err(MirrorError::Status(500))
    }
}

#[test]
fn create_flows_into_ledger_and_sheet() {
    let store = store();
    let dir = tempdir().unwrap();
    let sheet = SheetMirrorSink::new(dir.path().join("mirror.csv"));
    let syncer = TransactionSynchronizer::new(&store, &sheet);

    let id = syncer.create("Nova", &draft("2025-03-01", "market", 120)).unwrap();

    let txs = store.transactions("Nova").unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].id, id);

    let rows = sheet.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].transaction_id, id.to_string());
    assert_eq!(rows[0].user, "Nova");
    assert_eq!(rows[0].amount, Decimal::from(120));
}

#[test]
fn failed_append_keeps_the_ledger_record() {
    let store = store();
    let syncer = TransactionSynchronizer::new(&store, &BrokenSink);

    let err = syncer
        .create("Nova", &draft("2025-03-01", "market", 120))
        .unwrap_err();
    // One generic failure; the error never says which store it died in.
    assert!(matches!(err, SyncError::Failed(_)));
    assert_eq!(err.to_string(), "transaction sync failed");

    // The ledger write stands; the record is never rolled back.
    let txs = store.transactions("Nova").unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].description, "market");
}

#[test]
fn update_rewrites_the_matching_row_in_place() {
    let store = store();
    let dir = tempdir().unwrap();
    let sheet = SheetMirrorSink::new(dir.path().join("mirror.csv"));
    let syncer = TransactionSynchronizer::new(&store, &sheet);

    let a = syncer.create("Nova", &draft("2025-03-01", "market", 120)).unwrap();
    let b = syncer.create("Nova", &draft("2025-03-02", "fuel", 80)).unwrap();

    syncer.update("Nova", a, &draft("2025-03-01", "weekly market", 150)).unwrap();

    let rows = sheet.rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].description, "weekly market");
    assert_eq!(rows[0].amount, Decimal::from(150));
    assert_eq!(rows[0].transaction_id, a.to_string());
    assert_eq!(rows[1].transaction_id, b.to_string());

    let updated = store.transaction("Nova", a).unwrap();
    assert_eq!(updated.description, "weekly market");
}

#[test]
fn delete_shifts_subsequent_rows_up() {
    let store = store();
    let dir = tempdir().unwrap();
    let sheet = SheetMirrorSink::new(dir.path().join("mirror.csv"));
    let syncer = TransactionSynchronizer::new(&store, &sheet);

    let a = syncer.create("Nova", &draft("2025-03-01", "market", 120)).unwrap();
    let b = syncer.create("Nova", &draft("2025-03-02", "fuel", 80)).unwrap();
    let c = syncer.create("Nova", &draft("2025-03-03", "school", 60)).unwrap();

    syncer.delete("Nova", b).unwrap();

    let rows = sheet.rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].transaction_id, a.to_string());
    assert_eq!(rows[1].transaction_id, c.to_string());
    assert_eq!(store.transactions("Nova").unwrap().len(), 2);
}

#[test]
fn update_without_a_mirror_row_is_not_found() {
    let store = store();
    let dir = tempdir().unwrap();
    let sheet = SheetMirrorSink::new(dir.path().join("mirror.csv"));

    // Divergence: the record exists only in the ledger.
    let id = store.create_transaction("Nova", &draft("2025-03-01", "market", 120)).unwrap();

    let syncer = TransactionSynchronizer::new(&store, &sheet);
    let err = syncer
        .update("Nova", id, &draft("2025-03-01", "market", 99))
        .unwrap_err();
    assert!(matches!(err, SyncError::MirrorRowMissing(_)));
    assert!(sheet.rows().unwrap().is_empty());
}

#[test]
fn delete_without_a_mirror_row_leaves_other_rows_alone() {
    let store = store();
    let dir = tempdir().unwrap();
    let sheet = SheetMirrorSink::new(dir.path().join("mirror.csv"));
    let syncer = TransactionSynchronizer::new(&store, &sheet);

    let a = syncer.create("Nova", &draft("2025-03-01", "market", 120)).unwrap();
    let orphan = store.create_transaction("Nova", &draft("2025-03-02", "fuel", 80)).unwrap();

    let err = syncer.delete("Nova", orphan).unwrap_err();
    assert!(matches!(err, SyncError::MirrorRowMissing(_)));

    let rows = sheet.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].transaction_id, a.to_string());
}
