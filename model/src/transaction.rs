// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use archive_codec::{error::DecodeError, transaction::TransactionRecord};
use once_cell::sync::OnceCell;

use crate::hash::Hash;

/// A transaction, decoded once from its raw compressed payload. `trunk`/`branch`/`bundle`
/// convert from trytes to the binary hash surface lazily and memoize the result: the first
/// caller pays the conversion cost, every later caller (including concurrent ones, since
/// `OnceCell::get_or_init` serializes first access) reads the cached value.
#[derive(Debug)]
pub struct Transaction {
    hash: Hash,
    record: TransactionRecord,
    trunk_hash: OnceCell<Hash>,
    branch_hash: OnceCell<Hash>,
    bundle_hash: OnceCell<Hash>,
}

impl Transaction {
    pub fn decode(hash: Hash, trytes: &str) -> Result<Self, DecodeError> {
        let record = TransactionRecord::decode_from_trytes(trytes)?;
        Ok(Self {
            hash,
            record,
            trunk_hash: OnceCell::new(),
            branch_hash: OnceCell::new(),
            bundle_hash: OnceCell::new(),
        })
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn address(&self) -> Hash {
        Hash::from_bytes(self.record.address)
    }

    pub fn value(&self) -> i64 {
        self.record.value
    }

    pub fn current_index(&self) -> u64 {
        self.record.current_index
    }

    pub fn last_index(&self) -> u64 {
        self.record.last_index
    }

    pub fn is_tail(&self) -> bool {
        self.record.is_tail()
    }

    pub fn is_head(&self) -> bool {
        self.record.is_head()
    }

    pub fn is_value(&self) -> bool {
        self.record.is_value()
    }

    pub fn tag(&self) -> &str {
        &self.record.tag
    }

    pub fn effective_timestamp_secs(&self) -> i64 {
        self.record.effective_timestamp_secs()
    }

    /// The raw 2673-tryte encoding is not reconstructed here; callers needing trytes back out
    /// (e.g. `getTrytes`) decode once and hold onto the string themselves — this entity only
    /// ever exposes the typed fields extracted at construction.
    pub fn trunk_hash(&self) -> Result<Hash, DecodeError> {
        self.trunk_hash.get_or_try_init(|| self.record.trunk.parse::<Hash>()).copied()
    }

    pub fn branch_hash(&self) -> Result<Hash, DecodeError> {
        self.branch_hash
            .get_or_try_init(|| self.record.branch.parse::<Hash>())
            .copied()
    }

    pub fn bundle_hash(&self) -> Result<Hash, DecodeError> {
        self.bundle_hash
            .get_or_try_init(|| self.record.bundle.parse::<Hash>())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_trytes() -> String {
        "9".repeat(archive_codec::trinary::TRANSACTION_TRYTE_LEN)
    }

    #[test]
    fn lazily_derived_hashes_memoize() {
        let hash: Hash = "A".repeat(81).parse().unwrap();
        let tx = Transaction::decode(hash, &empty_trytes()).unwrap();
        let first = tx.trunk_hash().unwrap();
        let second = tx.trunk_hash().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn flags_derive_from_indices_and_value() {
        let hash: Hash = "A".repeat(81).parse().unwrap();
        let tx = Transaction::decode(hash, &empty_trytes()).unwrap();
        assert!(tx.is_tail());
        assert!(tx.is_head());
        assert!(!tx.is_value());
    }
}
