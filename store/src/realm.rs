// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use crate::backend::Backend;
use crate::error::StoreError;

/// A single realm, i.e. every key sharing one prefix byte within a database. The facade hands
/// these out instead of exposing the raw [`Backend`]; callers never compose keys by hand.
#[derive(Clone)]
pub struct Realm {
    backend: Arc<dyn Backend>,
    prefix: u8,
}

impl Realm {
    pub(crate) fn new(backend: Arc<dyn Backend>, prefix: u8) -> Self {
        Self { backend, prefix }
    }

    fn full_key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + suffix.len());
        key.push(self.prefix);
        key.extend_from_slice(suffix);
        key
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.backend.get(&self.full_key(key))
    }

    pub fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        self.backend.has(&self.full_key(key))
    }

    /// Visits every `(key-suffix, value)` pair under `key_prefix`, with the realm's own prefix
    /// byte already stripped back off before the callback runs.
    pub fn iterate(&self, key_prefix: &[u8], mut visit: impl FnMut(&[u8], &[u8]) -> bool) -> Result<(), StoreError> {
        let full_prefix = self.full_key(key_prefix);
        self.backend.iterate_prefix(&full_prefix, &mut |key, value| visit(&key[1..], value))
    }

    pub fn iterate_keys(&self, key_prefix: &[u8], mut visit: impl FnMut(&[u8]) -> bool) -> Result<(), StoreError> {
        let full_prefix = self.full_key(key_prefix);
        self.backend.iterate_keys_prefix(&full_prefix, &mut |key| visit(&key[1..]))
    }

    /// Deletes every key in this realm. Used once at startup to drop decommissioned realms.
    pub fn delete_all(&self) -> Result<(), StoreError> {
        self.backend.delete_prefix(&[self.prefix])
    }
}
