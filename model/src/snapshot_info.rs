// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use archive_codec::{bitmask::SnapshotFlags, error::DecodeError, records::SnapshotInfoRecord};

use crate::hash::Hash;

/// The snapshot-info singleton: coordinator identity and the pruning/entry-point/index
/// boundaries that bound valid queries. Decoded exactly once at startup and frozen for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    coordinator: Hash,
    snapshot_hash: Hash,
    snapshot_index: u32,
    entry_point_index: u32,
    pruning_index: u32,
    timestamp: i64,
    flags: SnapshotFlags,
}

impl SnapshotInfo {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let record = SnapshotInfoRecord::decode(data)?;
        Ok(Self {
            coordinator: Hash::from_bytes(record.coordinator),
            snapshot_hash: Hash::from_bytes(record.snapshot_hash),
            snapshot_index: record.snapshot_index,
            entry_point_index: record.entry_point_index,
            pruning_index: record.pruning_index,
            timestamp: record.timestamp,
            flags: record.flags,
        })
    }

    pub fn coordinator(&self) -> Hash {
        self.coordinator
    }

    pub fn snapshot_hash(&self) -> Hash {
        self.snapshot_hash
    }

    pub fn snapshot_index(&self) -> u32 {
        self.snapshot_index
    }

    pub fn entry_point_index(&self) -> u32 {
        self.entry_point_index
    }

    pub fn pruning_index(&self) -> u32 {
        self.pruning_index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn spent_addresses_enabled(&self) -> bool {
        self.flags.spent_addresses_enabled()
    }
}
