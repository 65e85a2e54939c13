// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use rocksdb::{Options, DB};

use crate::backend::Backend;
use crate::error::StoreError;

/// Adapter over a single RocksDB column family-less instance. One [`RocksDbBackend`] per on-disk
/// database (`tangle`, `snapshot`, `spent`); realm separation lives entirely in the key prefix
/// byte, not in column families, matching how the existing databases were laid out on disk.
pub struct RocksDbBackend {
    db: DB,
}

impl RocksDbBackend {
    pub fn open(path: &Path, with_cache: bool) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.increase_parallelism(num_cpus());
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        if with_cache {
            block_opts.set_lru_cache(64 * 1024 * 1024);
            block_opts.set_cache_index_and_filter_blocks(true);
        } else {
            block_opts.disable_cache();
        }
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }
}

fn num_cpus() -> i32 {
    std::thread::available_parallelism().map(|n| n.get() as i32).unwrap_or(1)
}

impl Backend for RocksDbBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?)
    }

    fn iterate_prefix(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8]) -> bool) -> Result<(), StoreError> {
        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            if !visit(&key, &value) {
                break;
            }
        }
        Ok(())
    }

    fn iterate_keys_prefix(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8]) -> bool) -> Result<(), StoreError> {
        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            if !visit(&key) {
                break;
            }
        }
        Ok(())
    }

    fn delete_prefix(&self, prefix: &[u8]) -> Result<(), StoreError> {
        let mut batch = rocksdb::WriteBatch::default();
        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            batch.delete(key);
        }
        self.db.write(batch)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}
