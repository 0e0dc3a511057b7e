// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::require_login;
use crate::ledger::LedgerStore;
use crate::reconcile::{balance_carried_into, month_of, spending_in_month};
use crate::utils::{current_month, parse_month};
use anyhow::Result;
use serde_json::json;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => export_month(store, sub),
        _ => Ok(()),
    }
}

/// One month's report: a summary block followed by the month's transactions,
/// newest first.
fn export_month(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => current_month(),
    };
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let snap = store.snapshot(&profile)?;
    let carried_over = balance_carried_into(&snap.transactions, &snap.plans, &month);
    let plan = snap.plans.get(&month).cloned().unwrap_or_default();
    let total_income = plan.planned_income();
    let total_spent = spending_in_month(&snap.transactions, &month);
    let remaining = carried_over + total_income - total_spent;

    let mut txs: Vec<_> = snap
        .transactions
        .into_iter()
        .filter(|t| month_of(&t.date).as_deref() == Some(month.as_str()))
        .collect();
    txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(out)?;
            wtr.write_record(["Monthly report", &month])?;
            wtr.write_record(["Carried over", &carried_over.to_string()])?;
            wtr.write_record(["Total income", &total_income.to_string()])?;
            wtr.write_record(["Total spent", &total_spent.to_string()])?;
            wtr.write_record(["Remaining balance", &remaining.to_string()])?;
            wtr.write_record([""])?;
            wtr.write_record(["date", "description", "category", "amount"])?;
            for t in &txs {
                wtr.write_record([
                    t.date.as_str(),
                    t.description.as_str(),
                    t.category.as_str(),
                    &t.amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let doc = json!({
                "month": month,
                "carriedOver": carried_over,
                "totalIncome": total_income,
                "totalSpent": total_spent,
                "remainingBalance": remaining,
                "transactions": txs,
            });
            std::fs::write(out, serde_json::to_string_pretty(&doc)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} report for {} to {}", month, profile, out);
    Ok(())
}
