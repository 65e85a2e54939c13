// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The ledger engine: index queries, tangle traversal, backward ledger-state replay, the search
//! composer, and the sync view, all built over [`archive_store::Store`]. A single [`Engine`]
//! wraps one open store and the handful of values computed once at startup and frozen for the
//! process lifetime (snapshot info, solid entry points, sync state) — the same
//! initialize-once-then-freeze shape `archive_model` uses per entity field, applied here at the
//! whole-node scope.

pub mod cancellation;
pub mod error;
pub mod indexes;
pub mod ledger_state;
pub mod loaders;
pub mod search;
pub mod state_diff;
pub mod sync;

use archive_model::{Hash, SnapshotInfo, SolidEntryPoints};
use archive_store::Store;
use once_cell::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use error::LedgerError;
use sync::LatestSyncState;

pub struct Engine {
    store: Store,
    snapshot_info: OnceCell<SnapshotInfo>,
    solid_entry_points: OnceCell<SolidEntryPoints>,
    sync_state: OnceCell<LatestSyncState>,
}

impl Engine {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            snapshot_info: OnceCell::new(),
            solid_entry_points: OnceCell::new(),
            sync_state: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot_info(&self) -> Result<&SnapshotInfo, LedgerError> {
        self.snapshot_info.get_or_try_init(|| loaders::load_snapshot_info(&self.store))
    }

    pub fn solid_entry_points(&self) -> Result<&SolidEntryPoints, LedgerError> {
        self.solid_entry_points.get_or_try_init(|| loaders::load_solid_entry_points(&self.store))
    }

    /// Memoized for the process lifetime: this is a read-only node, so "latest milestone" never
    /// changes after startup.
    pub fn sync_state(&self) -> Result<&LatestSyncState, LedgerError> {
        self.sync_state.get_or_try_init(|| sync::build_latest_sync_state(&self.store))
    }

    /// Used by `getLedgerDiffExt`/`GET /ledger/diff-extended/by-index/{i}`, which additionally
    /// require `milestone_index` to be in range — see [`ledger_state::validate_milestone_index`].
    pub fn get_milestone_state_diff(&self, milestone_index: u32, cancellation: &CancellationToken) -> Result<state_diff::MilestoneStateDiff, LedgerError> {
        let sync_state = self.sync_state()?;
        let snapshot_info = self.snapshot_info()?;
        ledger_state::validate_milestone_index(milestone_index, sync_state.latest_milestone_index, snapshot_info.pruning_index())?;
        let solid_entry_points = self.solid_entry_points()?;
        state_diff::get_milestone_state_diff(&self.store, solid_entry_points, milestone_index, cancellation)
    }

    pub fn get_ledger_state_for_milestone(&self, target: u32, cancellation: &CancellationToken) -> Result<(std::collections::HashMap<Hash, u64>, u32), LedgerError> {
        let sync_state = self.sync_state()?;
        let snapshot_info = self.snapshot_info()?;
        ledger_state::get_ledger_state_for_milestone(&self.store, target, sync_state.latest_milestone_index, snapshot_info.pruning_index(), cancellation)
    }

    /// Used by `getLedgerDiff`/`GET /ledger/diff/by-index/{i}`. Unlike
    /// `get_ledger_state_for_milestone`, `milestone_index` has no "0 means latest" shorthand: a
    /// diff names exactly one milestone, so it is range-checked against
    /// `(pruning_index, latest_solid_milestone_index]` unconditionally.
    pub fn get_ledger_diff_for_milestone(&self, milestone_index: u32) -> Result<Vec<(Hash, i64)>, LedgerError> {
        let sync_state = self.sync_state()?;
        let snapshot_info = self.snapshot_info()?;
        ledger_state::validate_milestone_index(milestone_index, sync_state.latest_milestone_index, snapshot_info.pruning_index())?;
        ledger_state::get_ledger_diff_for_milestone(&self.store, milestone_index)
    }

    pub fn find_transactions(&self, query: &search::SearchQuery) -> Result<Vec<Hash>, LedgerError> {
        search::find_transactions(&self.store, query)
    }

    /// Raw 2673-tryte transaction payload for `getTrytes`/`GET /transactions/{hash}/trytes`.
    /// `None` if the hash is unknown, which callers turn into a `NotFound`.
    pub fn get_transaction_trytes(&self, hash: &Hash) -> Result<Option<String>, LedgerError> {
        loaders::load_transaction_trytes(&self.store, hash)
    }

    /// Confirmation state for `getInclusionStates`/`GET /transactions/{hash}/inclusion-state`.
    /// An unknown transaction is reported as unconfirmed rather than `NotFound`, matching the
    /// legacy API's behavior of answering every hash in the batch. A confirmed-but-conflicting
    /// transaction is reported as not included, matching the legacy reader's
    /// `confirmed && !conflicting` check.
    pub fn is_transaction_confirmed(&self, hash: &Hash) -> Result<bool, LedgerError> {
        Ok(loaders::load_transaction_metadata(&self.store, hash)?
            .map(|metadata| metadata.is_confirmed() && !metadata.is_conflicting())
            .unwrap_or(false))
    }

    /// Whether `address` has ever been spent from, for `wereAddressesSpentFrom`/
    /// `GET /addresses/{address}/was-spent`.
    pub fn was_address_spent_from(&self, address: &Hash) -> Result<bool, LedgerError> {
        indexes::was_address_spent_from(&self.store, address.as_bytes())
    }

    /// Current ledger index: the latest milestone the `ledger_balance` realm is consistent with.
    /// Used to stamp `wereAddressesSpentFrom` and any other response that reports against "now"
    /// rather than a caller-chosen milestone.
    pub fn ledger_index(&self) -> Result<u32, LedgerError> {
        loaders::load_ledger_index(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_store::StoreConfig;

    fn open_test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            tangle_path: dir.path().join("tangle"),
            snapshot_path: dir.path().join("snapshot"),
            spent_path: dir.path().join("spent"),
            bypass_health_check: true,
            use_cache: true,
        };
        let store = Store::open(&config).unwrap();
        (dir, store)
    }

    #[test]
    fn find_transactions_rejects_empty_criteria() {
        let (_dir, store) = open_test_store();
        let engine = Engine::new(store);
        let query = search::SearchQuery { max_results: 10, ..Default::default() };
        let err = engine.find_transactions(&query).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParameter(_)));
    }

    #[test]
    fn snapshot_info_lookup_fails_cleanly_on_empty_store() {
        let (_dir, store) = open_test_store();
        let engine = Engine::new(store);
        assert!(engine.snapshot_info().is_err());
    }
}
