// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BudgetPlan, Transaction, TransactionDraft};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// Snapshot of one profile's collections at a point in time.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub transactions: Vec<Transaction>,
    pub plans: BTreeMap<String, BudgetPlan>,
}

/// Receiving end of a collection subscription. Snapshots accumulate until the
/// consumer drains them; only the most recent one matters.
pub struct SnapshotStream {
    rx: Receiver<LedgerSnapshot>,
}

impl SnapshotStream {
    /// Drain pending snapshots and return the newest, if any arrived since
    /// the last call. Most recent snapshot wins; intermediate states are
    /// discarded.
    pub fn latest(&self) -> Option<LedgerSnapshot> {
        let mut last = None;
        while let Ok(s) = self.rx.try_recv() {
            last = Some(s);
        }
        last
    }
}

/// The primary document store: per-profile transaction and budget-plan
/// collections over SQLite. Constructed once at process start and passed to
/// whichever component needs store access; the transaction side is
/// authoritative relative to the spreadsheet mirror.
pub struct LedgerStore {
    conn: Connection,
    subscribers: Mutex<Vec<(String, Sender<LedgerSnapshot>)>>,
}

impl LedgerStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Raw connection, for settings access.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create a transaction; the store assigns the identifier.
    pub fn create_transaction(&self, profile: &str, draft: &TransactionDraft) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions(profile, date, description, category, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                profile,
                draft.date,
                draft.description,
                draft.category,
                draft.amount.to_string()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.publish(profile)?;
        Ok(id)
    }

    pub fn update_transaction(&self, profile: &str, id: i64, draft: &TransactionDraft) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE transactions SET date=?1, description=?2, category=?3, amount=?4
             WHERE id=?5 AND profile=?6",
            params![
                draft.date,
                draft.description,
                draft.category,
                draft.amount.to_string(),
                id,
                profile
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Transaction {} not found for profile '{}'", id, profile);
        }
        self.publish(profile)?;
        Ok(())
    }

    pub fn delete_transaction(&self, profile: &str, id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND profile=?2",
            params![id, profile],
        )?;
        if changed == 0 {
            anyhow::bail!("Transaction {} not found for profile '{}'", id, profile);
        }
        self.publish(profile)?;
        Ok(())
    }

    pub fn transaction(&self, profile: &str, id: i64) -> Result<Transaction> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, category, amount, profile
             FROM transactions WHERE id=?1 AND profile=?2",
        )?;
        let tx = stmt
            .query_row(params![id, profile], row_to_transaction)
            .optional()?
            .with_context(|| format!("Transaction {} not found for profile '{}'", id, profile))?;
        Ok(tx)
    }

    pub fn transactions(&self, profile: &str) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, category, amount, profile
             FROM transactions WHERE profile=?1 ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![profile], row_to_transaction)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Write the whole plan document for (profile, month). At most one plan
    /// exists per key; last writer wins.
    pub fn upsert_plan(&self, profile: &str, month: &str, plan: &BudgetPlan) -> Result<()> {
        let doc = serde_json::to_string(plan)?;
        self.conn.execute(
            "INSERT INTO budgets(profile, month, plan) VALUES (?1, ?2, ?3)
             ON CONFLICT(profile, month) DO UPDATE SET plan=excluded.plan",
            params![profile, month, doc],
        )?;
        self.publish(profile)?;
        Ok(())
    }

    pub fn plan(&self, profile: &str, month: &str) -> Result<Option<BudgetPlan>> {
        let doc: Option<String> = self
            .conn
            .query_row(
                "SELECT plan FROM budgets WHERE profile=?1 AND month=?2",
                params![profile, month],
                |r| r.get(0),
            )
            .optional()?;
        match doc {
            Some(s) => {
                let plan = serde_json::from_str(&s)
                    .with_context(|| format!("Invalid plan document for {}/{}", profile, month))?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    pub fn plans(&self, profile: &str) -> Result<BTreeMap<String, BudgetPlan>> {
        let mut stmt = self
            .conn
            .prepare("SELECT month, plan FROM budgets WHERE profile=?1")?;
        let rows = stmt.query_map(params![profile], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut out = BTreeMap::new();
        for row in rows {
            let (month, doc) = row?;
            let plan: BudgetPlan = serde_json::from_str(&doc)
                .with_context(|| format!("Invalid plan document for {}/{}", profile, month))?;
            out.insert(month, plan);
        }
        Ok(out)
    }

    /// Subscribe to one profile's collections. The current snapshot is
    /// delivered immediately, then a fresh one after every mutation of that
    /// profile's data. Consumers that care about a different profile drop the
    /// stream and subscribe again.
    pub fn subscribe(&self, profile: &str) -> Result<SnapshotStream> {
        let (tx, rx) = channel();
        tx.send(self.snapshot(profile)?).ok();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((profile.to_string(), tx));
        Ok(SnapshotStream { rx })
    }

    pub fn snapshot(&self, profile: &str) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            transactions: self.transactions(profile)?,
            plans: self.plans(profile)?,
        })
    }

    fn publish(&self, profile: &str) -> Result<()> {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        if !subs.iter().any(|(p, _)| p == profile) {
            return Ok(());
        }
        let snapshot = self.snapshot(profile)?;
        // Drop subscribers whose receiving end is gone.
        subs.retain(|(p, tx)| p != profile || tx.send(snapshot.clone()).is_ok());
        Ok(())
    }
}

fn row_to_transaction(r: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let amount_s: String = r.get(4)?;
    let amount = amount_s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        description: r.get(2)?,
        category: r.get(3)?,
        amount,
        owner: r.get(5)?,
    })
}
