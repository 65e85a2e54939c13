// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use archive_codec::{bitmask::TransactionFlags, error::DecodeError, records::TransactionMetadataRecord};

use crate::hash::Hash;

/// Transaction metadata, decoded once. `trunk`/`branch`/`bundle` are `None` when the underlying
/// record used the short (or any non-full-length) form; callers that need them fall back to
/// loading the transaction itself and copying its hashes — that fallback lives in the ledger
/// engine, which is the only caller that ever needs it, rather than here.
#[derive(Debug, Clone)]
pub struct TransactionMetadata {
    flags: TransactionFlags,
    confirmation_index: u32,
    trunk: Option<Hash>,
    branch: Option<Hash>,
    bundle: Option<Hash>,
}

impl TransactionMetadata {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let record = TransactionMetadataRecord::decode(data)?;
        Ok(Self {
            flags: record.flags,
            confirmation_index: record.confirmation_index,
            trunk: record.trunk.map(Hash::from_bytes),
            branch: record.branch.map(Hash::from_bytes),
            bundle: record.bundle.map(Hash::from_bytes),
        })
    }

    pub fn is_solid(&self) -> bool {
        self.flags.solid()
    }

    pub fn is_confirmed(&self) -> bool {
        self.flags.confirmed()
    }

    pub fn is_conflicting(&self) -> bool {
        self.flags.conflicting()
    }

    pub fn is_tail(&self) -> bool {
        self.flags.is_tail()
    }

    pub fn is_head(&self) -> bool {
        self.flags.is_head()
    }

    pub fn is_value(&self) -> bool {
        self.flags.is_value()
    }

    pub fn confirmation_index(&self) -> u32 {
        self.confirmation_index
    }

    pub fn trunk(&self) -> Option<Hash> {
        self.trunk
    }

    pub fn branch(&self) -> Option<Hash> {
        self.branch
    }

    pub fn bundle(&self) -> Option<Hash> {
        self.bundle
    }

    /// Whether this record carries its own denormalized trunk/branch/bundle, or needs the
    /// ledger engine's fallback rehydration.
    pub fn has_denormalized_hashes(&self) -> bool {
        self.trunk.is_some() && self.branch.is_some() && self.bundle.is_some()
    }
}
