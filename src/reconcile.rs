// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-month balance reconciliation: a pure fold of
//! (planned income − actual spending) over every month with recorded
//! activity, in chronological order. Recomputed from the full history on
//! every read; nothing here is persisted.

use crate::models::{BudgetPlan, MonthlyBalance, Transaction};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Month key of a transaction date, only if the date is a canonical
/// `YYYY-MM-DD`. Malformed or missing dates belong to no month: they are
/// excluded from every spending bucket rather than attributed to a default.
/// The parser alone is not enough here, it accepts unpadded digits
/// ("2025-1-5"), so the key is rebuilt from the parsed value and the input
/// must match it back.
pub fn month_of(date: &str) -> Option<String> {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let month = format!("{:04}-{:02}", d.year(), d.month());
    if date.len() == 10 && date.starts_with(&month) {
        Some(month)
    } else {
        None
    }
}

/// The calendar month immediately before `month` (`YYYY-MM`), or None when
/// `month` is not a valid month key.
pub fn previous_month(month: &str) -> Option<String> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()?;
    let (y, m) = if first.month() == 1 {
        (first.year() - 1, 12)
    } else {
        (first.year(), first.month() - 1)
    };
    Some(format!("{:04}-{:02}", y, m))
}

/// Cumulative balance per month: for each month with either a plan or at
/// least one transaction, in ascending (= chronological, the keys are
/// zero-padded) order, `running += planned_income − actual_spending`.
/// Months with no evidence on either side get no entry.
pub fn monthly_balances(
    transactions: &[Transaction],
    plans: &BTreeMap<String, BudgetPlan>,
) -> BTreeMap<String, Decimal> {
    let mut spending: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions {
        if let Some(month) = month_of(&t.date) {
            *spending.entry(month).or_insert(Decimal::ZERO) += t.amount;
        }
    }

    let mut months: Vec<&String> = plans.keys().chain(spending.keys()).collect();
    months.sort();
    months.dedup();

    let mut running = Decimal::ZERO;
    let mut balances = BTreeMap::new();
    for month in months {
        let income = plans.get(month).map(BudgetPlan::planned_income).unwrap_or(Decimal::ZERO);
        let spent = spending.get(month).copied().unwrap_or(Decimal::ZERO);
        running += income - spent;
        balances.insert(month.clone(), running);
    }
    balances
}

/// Same fold, as a chronological series for display.
pub fn balance_series(
    transactions: &[Transaction],
    plans: &BTreeMap<String, BudgetPlan>,
) -> Vec<MonthlyBalance> {
    monthly_balances(transactions, plans)
        .into_iter()
        .map(|(month, cumulative_balance)| MonthlyBalance {
            month,
            cumulative_balance,
        })
        .collect()
}

/// Balance carried into `target_month`: the fold value at exactly the
/// preceding calendar month, or zero when that month has no entry. A
/// predecessor with no recorded activity carries nothing forward even when
/// older months do have entries.
pub fn balance_carried_into(
    transactions: &[Transaction],
    plans: &BTreeMap<String, BudgetPlan>,
    target_month: &str,
) -> Decimal {
    let Some(prev) = previous_month(target_month) else {
        return Decimal::ZERO;
    };
    monthly_balances(transactions, plans)
        .get(&prev)
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// Actual spending inside one month (valid-dated transactions only).
pub fn spending_in_month(transactions: &[Transaction], month: &str) -> Decimal {
    transactions
        .iter()
        .filter(|t| month_of(&t.date).as_deref() == Some(month))
        .map(|t| t.amount)
        .sum()
}
