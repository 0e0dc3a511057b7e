// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::require_login;
use crate::ledger::LedgerStore;
use crate::models::{BudgetCategory, BudgetPlan, CategoryKind, IncomeSource, SavingsGoal};
use crate::reconcile::previous_month;
use crate::utils::{current_month, parse_amount, parse_month, pretty_table};
use anyhow::Result;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("add-income", sub)) => add_income(store, sub)?,
        Some(("rm-income", sub)) => rm_income(store, sub)?,
        Some(("add-saving", sub)) => add_saving(store, sub)?,
        Some(("rm-saving", sub)) => rm_saving(store, sub)?,
        Some(("add-category", sub)) => add_category(store, sub)?,
        Some(("rm-category", sub)) => rm_category(store, sub)?,
        Some(("copy-previous", sub)) => copy_previous(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_of(sub: &clap::ArgMatches) -> Result<String> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(current_month()),
    }
}

/// The plan document for a month; a missing document reads as empty.
fn load(store: &LedgerStore, profile: &str, month: &str) -> Result<BudgetPlan> {
    Ok(store.plan(profile, month)?.unwrap_or_default())
}

fn show(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let plan = load(store, &profile, &month)?;

    let incomes: Vec<Vec<String>> = plan
        .incomes
        .iter()
        .map(|i| vec![i.source.clone(), i.amount.to_string()])
        .collect();
    println!("{}", pretty_table(&["Income source", "Amount"], incomes));

    let savings: Vec<Vec<String>> = plan
        .savings
        .iter()
        .map(|s| vec![s.name.clone(), s.amount.to_string()])
        .collect();
    println!("{}", pretty_table(&["Savings goal", "Amount"], savings));

    let cats: Vec<Vec<String>> = plan
        .budget_categories
        .iter()
        .map(|c| vec![c.name.clone(), c.allocation.to_string(), c.kind.to_string()])
        .collect();
    println!("{}", pretty_table(&["Category", "Allocation", "Kind"], cats));

    println!(
        "{}: planned income {}, planned savings {}, allocated {}",
        month,
        plan.planned_income(),
        plan.planned_savings(),
        plan.planned_allocation()
    );
    Ok(())
}

fn add_income(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let source = sub.get_one::<String>("source").unwrap().clone();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;

    let mut plan = load(store, &profile, &month)?;
    plan.incomes.push(IncomeSource {
        source: source.clone(),
        amount,
    });
    store.upsert_plan(&profile, &month, &plan)?;
    println!("Added income '{}' ({}) to {}", source, amount, month);
    Ok(())
}

fn rm_income(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let source = sub.get_one::<String>("source").unwrap();

    let mut plan = load(store, &profile, &month)?;
    let before = plan.incomes.len();
    plan.incomes.retain(|i| &i.source != source);
    if plan.incomes.len() == before {
        println!("No income source '{}' in {}", source, month);
        return Ok(());
    }
    store.upsert_plan(&profile, &month, &plan)?;
    println!("Removed income '{}' from {}", source, month);
    Ok(())
}

fn add_saving(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let name = sub.get_one::<String>("name").unwrap().clone();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;

    let mut plan = load(store, &profile, &month)?;
    plan.savings.push(SavingsGoal {
        name: name.clone(),
        amount,
    });
    store.upsert_plan(&profile, &month, &plan)?;
    println!("Added savings goal '{}' ({}) to {}", name, amount, month);
    Ok(())
}

fn rm_saving(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let name = sub.get_one::<String>("name").unwrap();

    let mut plan = load(store, &profile, &month)?;
    let before = plan.savings.len();
    plan.savings.retain(|s| &s.name != name);
    if plan.savings.len() == before {
        println!("No savings goal '{}' in {}", name, month);
        return Ok(());
    }
    store.upsert_plan(&profile, &month, &plan)?;
    println!("Removed savings goal '{}' from {}", name, month);
    Ok(())
}

fn add_category(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let name = sub.get_one::<String>("name").unwrap().clone();
    let allocation = parse_amount(sub.get_one::<String>("allocation").unwrap())?;
    let kind = match sub.get_one::<String>("kind").unwrap().as_str() {
        "want" => CategoryKind::Want,
        _ => CategoryKind::Need,
    };

    let mut plan = load(store, &profile, &month)?;
    plan.budget_categories.push(BudgetCategory {
        name: name.clone(),
        allocation,
        kind,
    });
    store.upsert_plan(&profile, &month, &plan)?;
    println!("Added category '{}' ({}, {}) to {}", name, allocation, kind, month);
    Ok(())
}

fn rm_category(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let name = sub.get_one::<String>("name").unwrap();

    let mut plan = load(store, &profile, &month)?;
    let before = plan.budget_categories.len();
    plan.budget_categories.retain(|c| &c.name != name);
    if plan.budget_categories.len() == before {
        println!("No category '{}' in {}", name, month);
        return Ok(());
    }
    store.upsert_plan(&profile, &month, &plan)?;
    println!("Removed category '{}' from {}", name, month);
    Ok(())
}

/// Reuse last month's plan document as this month's. A no-op with a message
/// when last month has no plan.
fn copy_previous(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let Some(prev) = previous_month(&month) else {
        anyhow::bail!("Invalid month '{}'", month);
    };
    match store.plan(&profile, &prev)? {
        Some(plan) => {
            store.upsert_plan(&profile, &month, &plan)?;
            println!("Copied plan from {} to {}", prev, month);
        }
        None => println!("No budget plan found for {}", prev),
    }
    Ok(())
}
