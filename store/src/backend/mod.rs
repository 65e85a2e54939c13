// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

pub mod rocksdb_backend;
pub mod sled_backend;

use crate::error::StoreError;

/// The adapter contract the rest of this crate depends on. A backend operates on whole
/// composite keys (realm-prefix byte already included); the [`crate::facade`] layer is what
/// understands realms.
///
/// Iteration callbacks hand out borrowed slices good only for the duration of one callback
/// invocation; nothing here hands out a long-lived reference into the underlying engine.
pub trait Backend: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Visits every `(key, value)` pair whose key starts with `prefix`, in implementation-defined
    /// order, until `visit` returns `false` or the prefix is exhausted.
    fn iterate_prefix(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8]) -> bool) -> Result<(), StoreError>;

    /// As [`Backend::iterate_prefix`], but values are never materialized.
    fn iterate_keys_prefix(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8]) -> bool) -> Result<(), StoreError>;

    fn delete_prefix(&self, prefix: &[u8]) -> Result<(), StoreError>;

    fn flush(&self) -> Result<(), StoreError>;
}

/// Which physical engine backs a directory, auto-detected from its contents. All three speak
/// the same [`Backend`] contract; the service never branches on which one it got past startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Sled, a B+tree-based embedded engine.
    BPlusTree,
    /// RocksDB with a configured block cache.
    LsmWithCache,
    /// RocksDB opened with caching disabled, for constrained deployments.
    LsmNoCache,
}

/// Inspects a directory's contents to decide which engine already lives there. RocksDB always
/// writes a `CURRENT` file pointing at its active manifest; sled keeps its own `conf` file.
/// An empty or nonexistent directory defaults to the LSM-with-cache engine, the common case for
/// a fresh open.
pub fn detect_engine(path: &std::path::Path) -> EngineKind {
    if path.join("CURRENT").is_file() {
        EngineKind::LsmWithCache
    } else if path.join("conf").is_file() {
        EngineKind::BPlusTree
    } else {
        EngineKind::LsmWithCache
    }
}
