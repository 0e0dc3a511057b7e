// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::models::{BudgetPlan, IncomeSource, Transaction};
use famledger::reconcile::{balance_carried_into, month_of, monthly_balances, previous_month};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

fn tx(id: i64, date: &str, amount: i64) -> Transaction {
    Transaction {
        id,
        date: date.to_string(),
        description: format!("expense {}", id),
        category: "Groceries".to_string(),
        amount: Decimal::from(amount),
        owner: "Nova".to_string(),
    }
}

fn plan_with_income(amount: i64) -> BudgetPlan {
    BudgetPlan {
        incomes: vec![IncomeSource {
            source: "Salary".to_string(),
            amount: Decimal::from(amount),
        }],
        ..Default::default()
    }
}

fn two_month_history() -> (Vec<Transaction>, BTreeMap<String, BudgetPlan>) {
    let mut plans = BTreeMap::new();
    plans.insert("2025-01".to_string(), plan_with_income(500));
    plans.insert("2025-02".to_string(), plan_with_income(500));
    let txs = vec![tx(1, "2025-01-10", 200), tx(2, "2025-02-05", 100)];
    (txs, plans)
}

#[test]
fn balance_carried_into_third_month() {
    let (txs, plans) = two_month_history();
    // (500-200) + (500-100) = 700
    assert_eq!(
        balance_carried_into(&txs, &plans, "2025-03"),
        Decimal::from(700)
    );
}

#[test]
fn fold_runs_chronologically() {
    let (txs, plans) = two_month_history();
    let balances = monthly_balances(&txs, &plans);
    assert_eq!(balances["2025-01"], Decimal::from(300));
    assert_eq!(balances["2025-02"], Decimal::from(700));
}

#[test]
fn insertion_order_within_a_month_is_irrelevant() {
    let (mut txs, plans) = two_month_history();
    txs.push(tx(3, "2025-01-02", 50));
    let forward = monthly_balances(&txs, &plans);
    txs.reverse();
    let backward = monthly_balances(&txs, &plans);
    assert_eq!(forward, backward);
}

#[test]
fn reconcile_is_idempotent() {
    let (txs, plans) = two_month_history();
    assert_eq!(monthly_balances(&txs, &plans), monthly_balances(&txs, &plans));
    assert_eq!(
        balance_carried_into(&txs, &plans, "2025-03"),
        balance_carried_into(&txs, &plans, "2025-03")
    );
}

#[test]
fn months_without_evidence_get_no_entry() {
    let (txs, plans) = two_month_history();
    let balances = monthly_balances(&txs, &plans);
    assert_eq!(balances.len(), 2);
    assert!(!balances.contains_key("2025-03"));
}

#[test]
fn plan_only_month_contributes_income() {
    let mut plans = BTreeMap::new();
    plans.insert("2025-04".to_string(), plan_with_income(800));
    let balances = monthly_balances(&[], &plans);
    assert_eq!(balances["2025-04"], Decimal::from(800));
}

#[test]
fn transaction_only_month_counts_spending() {
    let txs = vec![tx(1, "2025-06-15", 40)];
    let balances = monthly_balances(&txs, &BTreeMap::new());
    assert_eq!(balances["2025-06"], Decimal::from(-40));
}

#[test]
fn carried_balance_is_zero_without_history() {
    assert_eq!(
        balance_carried_into(&[], &BTreeMap::new(), "2025-03"),
        Decimal::ZERO
    );
}

#[test]
fn a_gap_month_carries_nothing_forward() {
    // Activity in January only; the month immediately before March (February)
    // has no entry, so nothing is carried into March.
    let mut plans = BTreeMap::new();
    plans.insert("2025-01".to_string(), plan_with_income(500));
    assert_eq!(
        balance_carried_into(&[], &plans, "2025-02"),
        Decimal::from(500)
    );
    assert_eq!(balance_carried_into(&[], &plans, "2025-03"), Decimal::ZERO);
}

#[test]
fn malformed_dates_are_excluded_everywhere() {
    let (mut txs, plans) = two_month_history();
    txs.push(tx(10, "", 999));
    txs.push(tx(11, "not-a-date", 999));
    txs.push(tx(12, "2025-13-40", 999));
    txs.push(tx(13, "2025-02-30", 999)); // well-shaped but not a real day
    txs.push(tx(14, "5-1-1", 999)); // parses leniently, far too short to slice
    txs.push(tx(15, "2025-1-5", 999)); // parses leniently, unpadded

    let balances = monthly_balances(&txs, &plans);
    assert_eq!(balances.len(), 2);
    assert_eq!(balances["2025-02"], Decimal::from(700));
    assert!(!balances.contains_key("2025-1-"));
    assert_eq!(
        balance_carried_into(&txs, &plans, "2025-03"),
        Decimal::from(700)
    );
}

#[test]
fn only_canonical_dates_get_a_month_key() {
    assert_eq!(month_of("2025-01-05").as_deref(), Some("2025-01"));
    assert_eq!(month_of("2025-1-5"), None);
    assert_eq!(month_of("2025-01-5"), None);
    assert_eq!(month_of("5-1-1"), None);
    assert_eq!(month_of(""), None);
    assert_eq!(month_of("2025-02-30"), None);
}

#[test]
fn previous_month_rolls_over_year_boundaries() {
    assert_eq!(previous_month("2025-03").as_deref(), Some("2025-02"));
    assert_eq!(previous_month("2025-01").as_deref(), Some("2024-12"));
    assert_eq!(previous_month("garbage"), None);
}
