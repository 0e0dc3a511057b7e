// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One expense record. Dates stay strings (`YYYY-MM-DD`): a malformed date
/// already at rest is excluded from month bucketing, never a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub owner: String,
}

/// Fields of a transaction the user supplies; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSource {
    pub source: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    Need,
    Want,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKind::Need => write!(f, "Need"),
            CategoryKind::Want => write!(f, "Want"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub name: String,
    pub allocation: Decimal,
    pub kind: CategoryKind,
}

/// Per-month budget-plan document, keyed by `YYYY-MM`. Field names follow the
/// stored document format. A missing plan is equivalent to the default: all
/// three sequences empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetPlan {
    #[serde(default)]
    pub incomes: Vec<IncomeSource>,
    #[serde(default)]
    pub savings: Vec<SavingsGoal>,
    #[serde(default, rename = "budgetCategories")]
    pub budget_categories: Vec<BudgetCategory>,
}

impl BudgetPlan {
    pub fn planned_income(&self) -> Decimal {
        self.incomes.iter().map(|i| i.amount).sum()
    }

    pub fn planned_savings(&self) -> Decimal {
        self.savings.iter().map(|s| s.amount).sum()
    }

    pub fn planned_allocation(&self) -> Decimal {
        self.budget_categories.iter().map(|c| c.allocation).sum()
    }
}

/// Derived cross-month running balance; computed fresh on every read and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBalance {
    pub month: String,
    pub cumulative_balance: Decimal,
}
