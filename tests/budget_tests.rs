// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::db;
use famledger::ledger::LedgerStore;
use famledger::models::{BudgetCategory, BudgetPlan, CategoryKind, IncomeSource, SavingsGoal};
use famledger::reconcile::previous_month;
use rust_decimal::Decimal;

fn store() -> LedgerStore {
    LedgerStore::new(db::open_in_memory().unwrap())
}

fn sample_plan() -> BudgetPlan {
    BudgetPlan {
        incomes: vec![IncomeSource {
            source: "Salary".to_string(),
            amount: Decimal::from(5_000_000),
        }],
        savings: vec![SavingsGoal {
            name: "Emergency fund".to_string(),
            amount: Decimal::from(500_000),
        }],
        budget_categories: vec![BudgetCategory {
            name: "Groceries".to_string(),
            allocation: Decimal::from(1_500_000),
            kind: CategoryKind::Need,
        }],
    }
}

#[test]
fn at_most_one_plan_per_profile_and_month() {
    let store = store();
    store.upsert_plan("Nova", "2025-03", &sample_plan()).unwrap();

    let mut replacement = sample_plan();
    replacement.incomes[0].amount = Decimal::from(6_000_000);
    store.upsert_plan("Nova", "2025-03", &replacement).unwrap();

    let plans = store.plans("Nova").unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(
        plans["2025-03"].planned_income(),
        Decimal::from(6_000_000)
    );
}

#[test]
fn missing_plan_reads_as_empty() {
    let store = store();
    assert!(store.plan("Nova", "2025-07").unwrap().is_none());
    let plan = store.plan("Nova", "2025-07").unwrap().unwrap_or_default();
    assert!(plan.incomes.is_empty());
    assert!(plan.savings.is_empty());
    assert!(plan.budget_categories.is_empty());
    assert_eq!(plan.planned_income(), Decimal::ZERO);
}

#[test]
fn plans_are_scoped_to_their_profile() {
    let store = store();
    store.upsert_plan("Nova", "2025-03", &sample_plan()).unwrap();
    assert!(store.plan("Nia", "2025-03").unwrap().is_none());
}

#[test]
fn copying_the_previous_plan_forward() {
    let store = store();
    store.upsert_plan("Nova", "2025-02", &sample_plan()).unwrap();

    let prev = previous_month("2025-03").unwrap();
    let plan = store.plan("Nova", &prev).unwrap().expect("previous plan");
    store.upsert_plan("Nova", "2025-03", &plan).unwrap();

    let copied = store.plan("Nova", "2025-03").unwrap().unwrap();
    assert_eq!(copied.planned_income(), Decimal::from(5_000_000));
    assert_eq!(copied.budget_categories[0].name, "Groceries");
}

#[test]
fn copy_previous_without_a_prior_plan_creates_nothing() {
    let store = store();
    famledger::auth::login(store.conn(), "Nova", "SayangNia").unwrap();

    let matches = famledger::cli::build_cli().get_matches_from([
        "famledger",
        "budget",
        "copy-previous",
        "--month",
        "2025-03",
    ]);
    let Some(("budget", sub)) = matches.subcommand() else {
        panic!("no budget subcommand");
    };
    famledger::commands::budgets::handle(&store, sub).unwrap();

    // The missing predecessor is reported, not materialized.
    assert!(store.plan("Nova", "2025-03").unwrap().is_none());
    assert!(store.plan("Nova", "2025-02").unwrap().is_none());
}

#[test]
fn plan_documents_keep_their_stored_field_names() {
    let doc = serde_json::to_value(sample_plan()).unwrap();
    assert!(doc.get("budgetCategories").is_some());
    assert_eq!(doc["incomes"][0]["source"], "Salary");
    assert_eq!(doc["budgetCategories"][0]["kind"], "Need");

    // Documents written without some sequence still load.
    let sparse: BudgetPlan = serde_json::from_str(r#"{"incomes":[]}"#).unwrap();
    assert!(sparse.savings.is_empty());
}
