// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Store Facade over the three independent embedded databases (`tangle`, `snapshot`, `spent`).
//! Callers never touch a [`backend::Backend`] directly; they ask the facade for a [`Realm`] by
//! prefix byte and the facade routes it to whichever database actually owns that realm.

pub mod backend;
pub mod error;
pub mod health;
pub mod realm;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use archive_codec::realms::{self, Database};
use log::{info, warn};

use backend::{rocksdb_backend::RocksDbBackend, sled_backend::SledBackend, Backend, EngineKind};
use error::StoreError;
use realm::Realm;

/// Where the three databases live on disk, and the two startup toggles that mirror the legacy
/// service's debug flags.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub tangle_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub spent_path: PathBuf,
    /// Skip the health-record check instead of refusing to start on a corrupted/tainted database.
    pub bypass_health_check: bool,
    /// Whether a freshly-created RocksDB database should configure a block cache. Ignored for
    /// directories that already exist; the on-disk engine choice is never changed after the fact.
    pub use_cache: bool,
}

/// The Store Facade. Holds one backend handle per physical database and dispatches realm access
/// to the right one via [`archive_codec::realms::database_of`]. Cheap to clone: each field is an
/// `Arc` to the same backend, so a clone shares the open database handles rather than reopening
/// them — used to keep a flush-on-shutdown handle alongside the one moved into `Engine`.
#[derive(Clone)]
pub struct Store {
    tangle: Arc<dyn Backend>,
    snapshot: Arc<dyn Backend>,
    spent: Arc<dyn Backend>,
}

impl Store {
    /// Opens all three databases, runs the startup health check against each, and deletes every
    /// decommissioned realm. Fails closed: any database failing its health check aborts the open
    /// of all three, matching the legacy writer's all-or-nothing startup behavior.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let tangle = open_backend(&config.tangle_path, config.use_cache)?;
        let snapshot = open_backend(&config.snapshot_path, config.use_cache)?;
        let spent = open_backend(&config.spent_path, config.use_cache)?;

        let store = Self { tangle, snapshot, spent };

        // Each of the three databases carries its own independent realm-0 health record; the
        // facade's usual `realm(prefix)` routing would send all three lookups to whichever
        // single database `database_of(HEALTH)` maps realm 0 to, so the per-database backend
        // handles are used directly here instead.
        health::check(&Realm::new(Arc::clone(&store.tangle), realms::HEALTH), &config.tangle_path.display().to_string(), config.bypass_health_check)?;
        health::check(&Realm::new(Arc::clone(&store.snapshot), realms::HEALTH), &config.snapshot_path.display().to_string(), config.bypass_health_check)?;
        health::check(&Realm::new(Arc::clone(&store.spent), realms::HEALTH), &config.spent_path.display().to_string(), config.bypass_health_check)?;

        store.delete_decommissioned_realms()?;

        Ok(store)
    }

    /// Returns the realm view for `prefix`, routed to whichever database owns it.
    pub fn realm(&self, prefix: u8) -> Realm {
        let backend = match realms::database_of(prefix) {
            Database::Tangle => &self.tangle,
            Database::Snapshot => &self.snapshot,
            Database::Spent => &self.spent,
        };
        Realm::new(Arc::clone(backend), prefix)
    }

    fn delete_decommissioned_realms(&self) -> Result<(), StoreError> {
        for &prefix in realms::DECOMMISSIONED.iter() {
            let realm = self.realm(prefix);
            info!("deleting decommissioned realm {prefix}");
            realm.delete_all()?;
        }
        Ok(())
    }

    /// Flushes all three databases. Called before a graceful shutdown commits to exiting.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.tangle.flush()?;
        self.snapshot.flush()?;
        self.spent.flush()?;
        Ok(())
    }
}

fn open_backend(path: &Path, use_cache: bool) -> Result<Arc<dyn Backend>, StoreError> {
    std::fs::create_dir_all(path).map_err(|_| StoreError::UnrecognizedEngine(path.display().to_string()))?;

    match backend::detect_engine(path) {
        EngineKind::BPlusTree => {
            info!("opening {} as sled (B+tree)", path.display());
            Ok(Arc::new(SledBackend::open(path)?))
        }
        EngineKind::LsmWithCache => {
            info!("opening {} as rocksdb (LSM, cache={use_cache})", path.display());
            Ok(Arc::new(RocksDbBackend::open(path, use_cache)?))
        }
        EngineKind::LsmNoCache => {
            warn!("opening {} as rocksdb without a block cache", path.display());
            Ok(Arc::new(RocksDbBackend::open(path, false)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &tempfile::TempDir) -> StoreConfig {
        StoreConfig {
            tangle_path: dir.path().join("tangle"),
            snapshot_path: dir.path().join("snapshot"),
            spent_path: dir.path().join("spent"),
            bypass_health_check: false,
            use_cache: true,
        }
    }

    #[test]
    fn opens_fresh_databases_and_routes_realms() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&config(&dir)).unwrap();

        let tag_realm = store.realm(realms::TAG);
        tag_realm.get(b"nonexistent").unwrap();

        let snapshot_realm = store.realm(realms::SNAPSHOT_INFO);
        assert!(snapshot_realm.get(realms::SNAPSHOT_INFO_KEY).unwrap().is_none());
    }

    #[test]
    fn decommissioned_realms_are_empty_after_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&config(&dir)).unwrap();

        for &prefix in realms::DECOMMISSIONED.iter() {
            let realm = store.realm(prefix);
            let mut saw_any = false;
            realm
                .iterate_keys(&[], |_| {
                    saw_any = true;
                    false
                })
                .unwrap();
            assert!(!saw_any);
        }
    }

    #[test]
    fn realm_round_trips_through_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&config(&dir)).unwrap();

        let realm = store.realm(realms::SNAPSHOT_INFO);
        assert!(realm.get(realms::SNAPSHOT_INFO_KEY).unwrap().is_none());
    }

    /// Each of the three databases carries its own independent realm-0 health record.
    /// `database_of(HEALTH)` maps realm 0 to the `tangle` database alone, so `Store::open` must
    /// check `store.snapshot`/`store.spent` directly by backend handle rather than through the
    /// facade's usual prefix-routed `realm(HEALTH)` accessor — otherwise a corrupted snapshot or
    /// spent database would never be noticed. This test pins that each backend's own health
    /// realm is actually reachable and independent of the other two, on a fresh open where all
    /// three are absent (and therefore trivially healthy).
    #[test]
    fn health_check_targets_each_backends_own_realm() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&config(&dir)).unwrap();

        for backend in [&store.tangle, &store.snapshot, &store.spent] {
            let realm = Realm::new(Arc::clone(backend), realms::HEALTH);
            assert!(realm.get(realms::HEALTH_KEY).unwrap().is_none());
        }
    }
}
