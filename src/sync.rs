// Copyright (c) 2025 Famledger.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dual-write coordination of a single logical transaction mutation across
//! the ledger store and the spreadsheet mirror: two sequential,
//! independently-failable steps. The ledger write happens first and is
//! authoritative; the mirror call is best-effort. There is no two-phase
//! commit, no compensation, no retry queue, and a ledger write is never
//! rolled back. Once the ledger step succeeds the operation is committed
//! regardless of what happens to the mirror.

use crate::ledger::LedgerStore;
use crate::mirror::{MirrorError, MirrorRow, MirrorSink};
use crate::models::TransactionDraft;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The mirror has no row whose correlation key matches this transaction
    /// id. Nothing was overwritten or removed on the mirror side; the miss
    /// indicates prior divergence and is never reconciled automatically.
    #[error("no mirror row for transaction {0}")]
    MirrorRowMissing(String),
    /// One of the two steps failed. Deliberately unclassified: the caller is
    /// not told which store is now authoritative.
    #[error("transaction sync failed")]
    Failed(#[source] anyhow::Error),
}

pub struct TransactionSynchronizer<'a> {
    store: &'a LedgerStore,
    mirror: &'a dyn MirrorSink,
}

impl<'a> TransactionSynchronizer<'a> {
    pub fn new(store: &'a LedgerStore, mirror: &'a dyn MirrorSink) -> Self {
        Self { store, mirror }
    }

    fn row(profile: &str, id: i64, draft: &TransactionDraft) -> MirrorRow {
        MirrorRow {
            date: draft.date.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            amount: draft.amount,
            user: profile.to_string(),
            transaction_id: id.to_string(),
        }
    }

    /// Create in the ledger, then append a mirror row carrying the assigned
    /// id as the correlation key. A failed append leaves a ledger entry with
    /// no mirror row; the divergence is logged and the entry stands.
    pub fn create(&self, profile: &str, draft: &TransactionDraft) -> Result<i64, SyncError> {
        let id = self
            .store
            .create_transaction(profile, draft)
            .map_err(SyncError::Failed)?;
        if let Err(e) = self.mirror.append(&Self::row(profile, id, draft)) {
            warn!(
                "mirror append failed for transaction {}: {}; ledger entry kept without a mirror row",
                id, e
            );
            return Err(SyncError::Failed(e.into()));
        }
        Ok(id)
    }

    /// Update the ledger document, then overwrite the matching mirror row.
    pub fn update(&self, profile: &str, id: i64, draft: &TransactionDraft) -> Result<(), SyncError> {
        self.store
            .update_transaction(profile, id, draft)
            .map_err(SyncError::Failed)?;
        match self.mirror.update(&id.to_string(), &Self::row(profile, id, draft)) {
            Ok(()) => Ok(()),
            Err(MirrorError::RowNotFound) => {
                warn!("mirror row for transaction {} not found on update", id);
                Err(SyncError::MirrorRowMissing(id.to_string()))
            }
            Err(e) => {
                warn!("mirror update failed for transaction {}: {}", id, e);
                Err(SyncError::Failed(e.into()))
            }
        }
    }

    /// Remove the ledger document, then the matching mirror row.
    pub fn delete(&self, profile: &str, id: i64) -> Result<(), SyncError> {
        self.store
            .delete_transaction(profile, id)
            .map_err(SyncError::Failed)?;
        match self.mirror.delete(&id.to_string()) {
            Ok(()) => Ok(()),
            Err(MirrorError::RowNotFound) => {
                warn!("mirror row for transaction {} not found on delete", id);
                Err(SyncError::MirrorRowMissing(id.to_string()))
            }
            Err(e) => {
                warn!("mirror delete failed for transaction {}: {}", id, e);
                Err(SyncError::Failed(e.into()))
            }
        }
    }
}
