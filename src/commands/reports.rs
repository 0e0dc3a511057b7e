// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::require_login;
use crate::ledger::{LedgerSnapshot, LedgerStore};
use crate::reconcile::{balance_carried_into, balance_series, spending_in_month};
use crate::utils::{current_month, maybe_print_json, parse_month, pretty_table};
use anyhow::{Context, Result};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        Some(("daily", sub)) => daily(store, sub)?,
        Some(("trend", sub)) => trend(store, sub)?,
        Some(("balances", sub)) => balances(store, sub)?,
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

/// Dashboard reads go through the collection subscription: take the most
/// recent snapshot and fold over it.
fn latest_snapshot(store: &LedgerStore, profile: &str) -> Result<LedgerSnapshot> {
    store
        .subscribe(profile)?
        .latest()
        .context("No snapshot delivered for subscription")
}

#[derive(Serialize)]
struct Summary {
    month: String,
    carried_over: Decimal,
    planned_income: Decimal,
    planned_savings: Decimal,
    total_spent: Decimal,
    remaining: Decimal,
}

fn summary(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let snap = latest_snapshot(store, &profile)?;

    let carried_over = balance_carried_into(&snap.transactions, &snap.plans, &month);
    let plan = snap.plans.get(&month).cloned().unwrap_or_default();
    let total_spent = spending_in_month(&snap.transactions, &month);
    let s = Summary {
        month: month.clone(),
        carried_over,
        planned_income: plan.planned_income(),
        planned_savings: plan.planned_savings(),
        total_spent,
        remaining: carried_over + plan.planned_income() - total_spent,
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec!["Carried over".into(), s.carried_over.to_string()],
            vec!["Planned income".into(), s.planned_income.to_string()],
            vec!["Planned savings".into(), s.planned_savings.to_string()],
            vec!["Total spent".into(), s.total_spent.to_string()],
            vec!["Remaining".into(), s.remaining.to_string()],
        ];
        println!("{}", pretty_table(&[&month, "Amount"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryUsage {
    name: String,
    kind: String,
    allocation: Decimal,
    realization: Decimal,
    usage_pct: Decimal,
}

fn categories(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let snap = latest_snapshot(store, &profile)?;
    let plan = snap.plans.get(&month).cloned().unwrap_or_default();

    let data: Vec<CategoryUsage> = plan
        .budget_categories
        .iter()
        .map(|cat| {
            let spent: Decimal = snap
                .transactions
                .iter()
                .filter(|t| t.date.starts_with(&month) && t.category == cat.name)
                .map(|t| t.amount)
                .sum();
            let usage = if cat.allocation > Decimal::ZERO {
                (spent * Decimal::from(100) / cat.allocation).round_dp(0)
            } else {
                Decimal::ZERO
            };
            CategoryUsage {
                name: cat.name.clone(),
                kind: cat.kind.to_string(),
                allocation: cat.allocation,
                realization: spent,
                usage_pct: usage,
            }
        })
        .collect();

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.kind.clone(),
                    c.allocation.to_string(),
                    c.realization.to_string(),
                    format!("{}%", c.usage_pct),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Kind", "Allocation", "Realization", "Usage"],
                rows
            )
        );
    }
    Ok(())
}

fn daily(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = month_of(sub)?;
    let snap = latest_snapshot(store, &profile)?;

    let mut per_day: BTreeMap<u32, Decimal> = BTreeMap::new();
    for t in &snap.transactions {
        if crate::reconcile::month_of(&t.date).as_deref() != Some(month.as_str()) {
            continue;
        }
        let Ok(date) = chrono::NaiveDate::parse_from_str(&t.date, "%Y-%m-%d") else {
            continue;
        };
        *per_day.entry(date.day()).or_insert(Decimal::ZERO) += t.amount;
    }

    let data: Vec<Vec<String>> = per_day
        .iter()
        .map(|(day, spent)| vec![format!("{}-{:02}", month, day), spent.to_string()])
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Day", "Spent"], data));
    }
    Ok(())
}

fn trend(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&6);
    let snap = latest_snapshot(store, &profile)?;

    let mut per_month: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in &snap.transactions {
        let Some(month) = crate::reconcile::month_of(&t.date) else {
            continue;
        };
        *per_month.entry(month).or_insert(Decimal::ZERO) += t.amount;
    }

    let skip = per_month.len().saturating_sub(months);
    let data: Vec<Vec<String>> = per_month
        .iter()
        .skip(skip)
        .map(|(m, spent)| vec![m.clone(), spent.to_string()])
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Month", "Spent"], data));
    }
    Ok(())
}

fn balances(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let snap = latest_snapshot(store, &profile)?;
    let series = balance_series(&snap.transactions, &snap.plans);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        let rows: Vec<Vec<String>> = series
            .iter()
            .map(|b| vec![b.month.clone(), b.cumulative_balance.to_string()])
            .collect();
        println!("{}", pretty_table(&["Month", "Cumulative balance"], rows));
    }
    Ok(())
}
