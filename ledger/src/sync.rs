// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The sync view: a snapshot of "latest milestone" state, assembled once and memoized for the
//! process lifetime, since this is a read-only node with no consensus to track.

use archive_model::Hash;
use archive_store::Store;

use crate::error::LedgerError;
use crate::loaders;

/// Mirrors the legacy node's sync-status surface, specialized to the invariants of a read-only
/// archive: it never falls behind, never has peers, and never has anything in flight.
#[derive(Debug, Clone)]
pub struct LatestSyncState {
    pub ledger_index: u32,
    pub latest_milestone: Hash,
    pub latest_milestone_index: u32,
    pub pruning_index: u32,
    pub coordinator_address: Hash,
}

impl LatestSyncState {
    /// `latestMilestone == latestSolidSubtangleMilestone` always holds for this service, since
    /// it never tracks unconfirmed milestones ahead of the ledger index.
    pub fn latest_solid_subtangle_milestone(&self) -> Hash {
        self.latest_milestone
    }

    pub fn latest_solid_subtangle_milestone_index(&self) -> u32 {
        self.latest_milestone_index
    }

    pub const fn is_synced(&self) -> bool {
        true
    }

    pub const fn is_healthy(&self) -> bool {
        true
    }

    pub const fn neighbor_count(&self) -> u32 {
        0
    }

    pub const fn tip_count(&self) -> u32 {
        0
    }

    pub const fn transactions_to_request(&self) -> u32 {
        0
    }
}

/// Builds the sync view once: the ledger index, the latest solid milestone bundle's tail hash,
/// and the snapshot's pruning index and coordinator address.
pub fn build_latest_sync_state(store: &Store) -> Result<LatestSyncState, LedgerError> {
    let ledger_index = loaders::load_ledger_index(store)?;
    let milestone = loaders::load_milestone(store, ledger_index)?
        .ok_or_else(|| LedgerError::Internal(format!("ledger index names missing milestone {ledger_index}")))?;
    let snapshot_info = loaders::load_snapshot_info(store)?;

    Ok(LatestSyncState {
        ledger_index,
        latest_milestone: milestone.tail_hash(),
        latest_milestone_index: milestone.index(),
        pruning_index: snapshot_info.pruning_index(),
        coordinator_address: snapshot_info.coordinator(),
    })
}
