// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::require_login;
use crate::ledger::LedgerStore;
use crate::mirror;
use crate::models::TransactionDraft;
use crate::sync::TransactionSynchronizer;
use crate::utils::{maybe_print_json, parse_amount, parse_date, parse_month, pretty_table};
use anyhow::Result;
use regex::Regex;
use serde::Serialize;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?.to_string(),
        None => chrono::Local::now().date_naive().to_string(),
    };
    let draft = TransactionDraft {
        date,
        description: sub.get_one::<String>("description").unwrap().clone(),
        category: sub.get_one::<String>("category").unwrap().clone(),
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
    };

    let sink = mirror::open_sink(store.conn())?;
    let syncer = TransactionSynchronizer::new(store, sink.as_ref());
    let id = syncer.create(&profile, &draft)?;
    println!(
        "Recorded expense {}: {} on {} ({} / {})",
        id, draft.description, draft.date, draft.category, draft.amount
    );
    Ok(())
}

fn edit(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = store.transaction(&profile, id)?;

    let draft = TransactionDraft {
        date: match sub.get_one::<String>("date") {
            Some(s) => parse_date(s)?.to_string(),
            None => existing.date,
        },
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or(existing.description),
        category: sub
            .get_one::<String>("category")
            .cloned()
            .unwrap_or(existing.category),
        amount: match sub.get_one::<String>("amount") {
            Some(s) => parse_amount(s)?,
            None => existing.amount,
        },
    };

    let sink = mirror::open_sink(store.conn())?;
    let syncer = TransactionSynchronizer::new(store, sink.as_ref());
    syncer.update(&profile, id, &draft)?;
    println!("Updated expense {}", id);
    Ok(())
}

fn rm(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let sink = mirror::open_sink(store.conn())?;
    let syncer = TransactionSynchronizer::new(store, sink.as_ref());
    syncer.delete(&profile, id)?;
    println!("Removed expense {}", id);
    Ok(())
}

#[derive(Serialize)]
struct TransactionRow {
    id: i64,
    date: String,
    description: String,
    category: String,
    amount: String,
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let profile = require_login(store.conn())?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let category = sub.get_one::<String>("category");
    let search = sub
        .get_one::<String>("search")
        .map(|p| Regex::new(p))
        .transpose()?;

    let mut txs = store.transactions(&profile)?;
    txs.retain(|t| {
        month.as_deref().is_none_or(|m| t.date.starts_with(m))
            && category.is_none_or(|c| &t.category == c)
            && search.as_ref().is_none_or(|re| re.is_match(&t.description))
    });
    // Newest first, matching the tracker view.
    txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    let data: Vec<TransactionRow> = txs
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date,
            description: t.description,
            category: t.category,
            amount: t.amount.to_string(),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Description", "Category", "Amount"], rows)
        );
    }
    Ok(())
}
