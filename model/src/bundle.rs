// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use archive_codec::{bitmask::BundleFlags, error::DecodeError, records::BundleRecord, trinary};
use once_cell::sync::OnceCell;

use crate::hash::Hash;

/// A bundle, decoded once from its tail-keyed record. `milestone_index` is derived lazily from
/// the tail transaction's obsoleteTag field, since deriving it requires decoding the tail
/// transaction's trytes — work skipped entirely for bundles nobody asks "is this a milestone"
/// about.
#[derive(Debug)]
pub struct Bundle {
    flags: BundleFlags,
    last_index: u64,
    bundle_hash: Hash,
    head_tx: Hash,
    tx_hashes: Vec<Hash>,
    ledger_changes: Vec<(Hash, i64)>,
    milestone_index: OnceCell<Option<u32>>,
}

impl Bundle {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let record = BundleRecord::decode(data)?;
        Ok(Self {
            flags: record.flags,
            last_index: record.last_index,
            bundle_hash: Hash::from_bytes(record.bundle_hash),
            head_tx: Hash::from_bytes(record.head_tx),
            tx_hashes: record.tx_hashes.into_iter().map(Hash::from_bytes).collect(),
            ledger_changes: record
                .ledger_changes
                .into_iter()
                .map(|(addr, change)| (Hash::from_bytes(addr), change))
                .collect(),
            milestone_index: OnceCell::new(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.flags.valid()
    }

    pub fn is_value_spam(&self) -> bool {
        self.ledger_changes.is_empty()
    }

    pub fn last_index(&self) -> u64 {
        self.last_index
    }

    pub fn bundle_hash(&self) -> Hash {
        self.bundle_hash
    }

    pub fn head_tx(&self) -> Hash {
        self.head_tx
    }

    pub fn tx_hashes(&self) -> &[Hash] {
        &self.tx_hashes
    }

    pub fn ledger_changes(&self) -> &[(Hash, i64)] {
        &self.ledger_changes
    }

    pub fn ledger_changes_sum(&self) -> i64 {
        self.ledger_changes.iter().map(|(_, change)| change).sum()
    }

    /// Lazily decodes the milestone index out of the tail transaction's obsoleteTag field, given
    /// that field's trytes. Returns `None` if the obsoleteTag does not hold a valid index
    /// (i.e. this bundle is not a milestone bundle).
    pub fn milestone_index(&self, tail_obsolete_tag_trytes: &str) -> Option<u32> {
        *self.milestone_index.get_or_init(|| {
            let trits = trinary::trytes_to_trits(tail_obsolete_tag_trytes).ok()?;
            let values: Vec<bee_ternary::Btrit> = trits.iter().collect();
            let raw = trinary::trits_to_i64(&values).ok()?;
            u32::try_from(raw).ok()
        })
    }
}
