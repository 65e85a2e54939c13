// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use crate::backend::Backend;
use crate::error::StoreError;

/// Adapter over a single sled tree opened at its database's directory. Like the RocksDB adapter,
/// realm separation is carried entirely in the key prefix byte.
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = sled::Config::default().path(path).open()?;
        Ok(Self { db })
    }
}

impl Backend for SledBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|ivec| ivec.to_vec()))
    }

    fn iterate_prefix(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8]) -> bool) -> Result<(), StoreError> {
        for item in self.db.scan_prefix(prefix) {
            let (key, value) = item?;
            if !visit(&key, &value) {
                break;
            }
        }
        Ok(())
    }

    fn iterate_keys_prefix(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8]) -> bool) -> Result<(), StoreError> {
        for item in self.db.scan_prefix(prefix) {
            let (key, _) = item?;
            if !visit(&key) {
                break;
            }
        }
        Ok(())
    }

    fn delete_prefix(&self, prefix: &[u8]) -> Result<(), StoreError> {
        let keys: Vec<_> = self.db.scan_prefix(prefix).keys().collect::<Result<_, _>>()?;
        let mut batch = sled::Batch::default();
        for key in keys {
            batch.remove(key);
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}
