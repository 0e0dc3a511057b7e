// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::db;
use famledger::ledger::LedgerStore;
use famledger::models::TransactionDraft;
use rust_decimal::Decimal;

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

#[test]
fn transactions_are_scoped_to_their_profile() {
    let store = store();
    store.create_transaction("Nova", &draft("2025-03-01", "market", 100)).unwrap();
    store.create_transaction("Nia", &draft("2025-03-02", "pharmacy", 30)).unwrap();

    let nova = store.transactions("Nova").unwrap();
    assert_eq!(nova.len(), 1);
    assert_eq!(nova[0].owner, "Nova");
    assert_eq!(store.transactions("Nia").unwrap().len(), 1);
}

#[test]
fn updating_a_missing_transaction_fails() {
    let store = store();
    let id = store.create_transaction("Nova", &draft("2025-03-01", "market", 100)).unwrap();
    assert!(store.update_transaction("Nova", id + 1, &draft("2025-03-01", "x", 1)).is_err());
    // Same id under the other profile is just as missing.
    assert!(store.update_transaction("Nia", id, &draft("2025-03-01", "x", 1)).is_err());
}

#[test]
fn subscription_delivers_the_current_snapshot_immediately() {
    let store = store();
    store.create_transaction("Nova", &draft("2025-03-01", "market", 100)).unwrap();

    let stream = store.subscribe("Nova").unwrap();
    let snap = stream.latest().unwrap();
    assert_eq!(snap.transactions.len(), 1);
}

#[test]
fn latest_snapshot_wins_after_several_mutations() {
    let store = store();
    let stream = store.subscribe("Nova").unwrap();

    store.create_transaction("Nova", &draft("2025-03-01", "market", 100)).unwrap();
    store.create_transaction("Nova", &draft("2025-03-02", "fuel", 50)).unwrap();
    let id = store.create_transaction("Nova", &draft("2025-03-03", "school", 25)).unwrap();
    store.delete_transaction("Nova", id).unwrap();

    // Intermediate snapshots are discarded; only the newest state matters.
    let snap = stream.latest().unwrap();
    assert_eq!(snap.transactions.len(), 2);
    assert!(stream.latest().is_none());
}

#[test]
fn subscriptions_do_not_cross_profiles() {
    let store = store();
    let stream = store.subscribe("Nova").unwrap();
    stream.latest(); // drain the initial snapshot

    store.create_transaction("Nia", &draft("2025-03-01", "pharmacy", 30)).unwrap();
    assert!(stream.latest().is_none());
}

#[test]
fn plan_mutations_also_publish_snapshots() {
    let store = store();
    let stream = store.subscribe("Nova").unwrap();
    stream.latest();

    store
        .upsert_plan("Nova", "2025-03", &famledger::models::BudgetPlan::default())
        .unwrap();
    let snap = stream.latest().unwrap();
    assert!(snap.plans.contains_key("2025-03"));
}
