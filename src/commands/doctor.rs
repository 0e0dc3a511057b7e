// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::PROFILES;
use crate::ledger::LedgerStore;
use crate::mirror::{MirrorConfig, SheetMirrorSink};
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::HashSet;

/// Report ledger/mirror divergence. The mirror is best-effort, so a ledger
/// entry can sit without a mirror row indefinitely; this surfaces those
/// entries (and orphaned rows) without repairing anything.
pub fn handle(store: &LedgerStore) -> Result<()> {
    let sheet = match crate::mirror::configured(store.conn())? {
        MirrorConfig::Sheet(path) => SheetMirrorSink::new(path),
        MirrorConfig::Http(url) => {
            println!("Mirror at {} is remote; rows cannot be inspected from here.", url);
            return Ok(());
        }
    };

    let mut rows = Vec::new();
    let mirror_ids: HashSet<String> = sheet
        .rows()?
        .into_iter()
        .map(|r| r.transaction_id)
        .collect();

    let mut ledger_ids = HashSet::new();
    for profile in PROFILES {
        for t in store.transactions(profile.name)? {
            let id = t.id.to_string();
            if !mirror_ids.contains(&id) {
                rows.push(vec![
                    "missing_mirror_row".into(),
                    format!("{} {} '{}' ({})", id, t.date, t.description, t.owner),
                ]);
            }
            ledger_ids.insert(id);
        }
    }

    for id in &mirror_ids {
        if !ledger_ids.contains(id) {
            rows.push(vec!["orphaned_mirror_row".into(), id.clone()]);
        }
    }

    if rows.is_empty() {
        println!("doctor: ledger and mirror ({}) agree", sheet.path().display());
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
