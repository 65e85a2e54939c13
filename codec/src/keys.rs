// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Composite key layouts for the secondary indexes and the ledger diff realm. Every function
//! here is a pure byte-slicing/composing helper; none touch the store.

use crate::trinary::HASH_BYTE_LEN;

/// Width of the tag-hash prefix used by the tag index, distinct from the 49-byte transaction
/// hash width used everywhere else. Kept as its own constant (rather than reusing
/// `HASH_BYTE_LEN`) so the type system, not a comment, is what remembers the two widths differ.
pub const TAG_HASH_BYTE_LEN: usize = 17;

/// Byte appended to an address key to mark the entry as belonging to a value transaction.
pub const VALUE_FLAG_BYTE: u8 = 0x01;
pub const NON_VALUE_FLAG_BYTE: u8 = 0x00;

/// `address ‖ isValueByte ‖ tx_hash`.
pub fn address_index_key(address: &[u8; HASH_BYTE_LEN], is_value: bool, tx_hash: &[u8; HASH_BYTE_LEN]) -> Vec<u8> {
    let mut key = Vec::with_capacity(HASH_BYTE_LEN * 2 + 1);
    key.extend_from_slice(address);
    key.push(if is_value { VALUE_FLAG_BYTE } else { NON_VALUE_FLAG_BYTE });
    key.extend_from_slice(tx_hash);
    key
}

/// Extracts the transaction hash from an address-index key (bytes `[50..99)`).
pub fn tx_hash_from_address_key(key: &[u8]) -> Option<[u8; HASH_BYTE_LEN]> {
    slice_hash(key, HASH_BYTE_LEN + 1)
}

/// `referenced_tx ‖ approver_tx`.
pub fn approver_index_key(referenced_tx: &[u8; HASH_BYTE_LEN], approver_tx: &[u8; HASH_BYTE_LEN]) -> Vec<u8> {
    let mut key = Vec::with_capacity(HASH_BYTE_LEN * 2);
    key.extend_from_slice(referenced_tx);
    key.extend_from_slice(approver_tx);
    key
}

/// Extracts the approver hash from an approver-index key (bytes `[49..98)`).
pub fn approver_from_approver_key(key: &[u8]) -> Option<[u8; HASH_BYTE_LEN]> {
    slice_hash(key, HASH_BYTE_LEN)
}

/// `bundle_hash ‖ isTailByte ‖ tx_hash`.
pub fn bundle_tx_index_key(bundle_hash: &[u8; HASH_BYTE_LEN], is_tail: bool, tx_hash: &[u8; HASH_BYTE_LEN]) -> Vec<u8> {
    let mut key = Vec::with_capacity(HASH_BYTE_LEN * 2 + 1);
    key.extend_from_slice(bundle_hash);
    key.push(if is_tail { 0x01 } else { 0x00 });
    key.extend_from_slice(tx_hash);
    key
}

/// Extracts the transaction hash from a bundle-tx-index key (bytes `[50..99)`).
pub fn tx_hash_from_bundle_key(key: &[u8]) -> Option<[u8; HASH_BYTE_LEN]> {
    slice_hash(key, HASH_BYTE_LEN + 1)
}

/// `tag_hash(17B) ‖ tx_hash`.
pub fn tag_index_key(tag_hash: &[u8; TAG_HASH_BYTE_LEN], tx_hash: &[u8; HASH_BYTE_LEN]) -> Vec<u8> {
    let mut key = Vec::with_capacity(TAG_HASH_BYTE_LEN + HASH_BYTE_LEN);
    key.extend_from_slice(tag_hash);
    key.extend_from_slice(tx_hash);
    key
}

/// Extracts the transaction hash from a tag-index key (bytes `[17..66)`).
pub fn tx_hash_from_tag_key(key: &[u8]) -> Option<[u8; HASH_BYTE_LEN]> {
    slice_hash(key, TAG_HASH_BYTE_LEN)
}

/// `u32_le(msIndex) ‖ address`, the ledger-diff realm key.
pub fn ledger_diff_key(milestone_index: u32, address: &[u8; HASH_BYTE_LEN]) -> Vec<u8> {
    let mut key = Vec::with_capacity(4 + HASH_BYTE_LEN);
    key.extend_from_slice(&milestone_index.to_le_bytes());
    key.extend_from_slice(address);
    key
}

/// Just the `u32_le(msIndex)` prefix, for iterating all diffs of one milestone.
pub fn ledger_diff_prefix(milestone_index: u32) -> Vec<u8> {
    milestone_index.to_le_bytes().to_vec()
}

/// Extracts the address from a ledger-diff key (bytes `[4..53)`).
pub fn address_from_ledger_diff_key(key: &[u8]) -> Option<[u8; HASH_BYTE_LEN]> {
    slice_hash(key, 4)
}

/// `u32_le(msIndex)`, the milestone realm key.
pub fn milestone_key(milestone_index: u32) -> [u8; 4] {
    milestone_index.to_le_bytes()
}

fn slice_hash(key: &[u8], offset: usize) -> Option<[u8; HASH_BYTE_LEN]> {
    let end = offset + HASH_BYTE_LEN;
    if key.len() < end {
        return None;
    }
    let mut hash = [0u8; HASH_BYTE_LEN];
    hash.copy_from_slice(&key[offset..end]);
    Some(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_key_slices_back_to_tx_hash() {
        let addr = [1u8; HASH_BYTE_LEN];
        let tx = [2u8; HASH_BYTE_LEN];
        let key = address_index_key(&addr, true, &tx);
        assert_eq!(key.len(), HASH_BYTE_LEN * 2 + 1);
        assert_eq!(key[HASH_BYTE_LEN], VALUE_FLAG_BYTE);
        assert_eq!(tx_hash_from_address_key(&key).unwrap(), tx);
    }

    #[test]
    fn tag_key_slices_back_to_tx_hash() {
        let tag = [3u8; TAG_HASH_BYTE_LEN];
        let tx = [4u8; HASH_BYTE_LEN];
        let key = tag_index_key(&tag, &tx);
        assert_eq!(tx_hash_from_tag_key(&key).unwrap(), tx);
    }

    #[test]
    fn ledger_diff_key_slices_back_to_address() {
        let addr = [9u8; HASH_BYTE_LEN];
        let key = ledger_diff_key(42, &addr);
        assert!(key.starts_with(&42u32.to_le_bytes()));
        assert_eq!(address_from_ledger_diff_key(&key).unwrap(), addr);
    }
}
