// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Point and prefix lookups on the four secondary indexes plus the spent-addresses database.
//! Every function here takes already-decoded binary keys; tryte parsing happens one layer up,
//! in the search composer and the request dispatcher.

use archive_codec::keys;
use archive_codec::realms;
use archive_codec::trinary::HASH_BYTE_LEN;
use archive_store::Store;

use crate::error::LedgerError;

/// `GetTransactionHashesForAddress`. `value_only` selects only entries recorded against a
/// value-carrying transaction.
pub fn transaction_hashes_for_address(
    store: &Store,
    address: &[u8; HASH_BYTE_LEN],
    value_only: bool,
    max_find: usize,
) -> Result<Vec<[u8; HASH_BYTE_LEN]>, LedgerError> {
    let realm = store.realm(realms::ADDRESS);
    let mut prefix = address.to_vec();
    if value_only {
        prefix.push(keys::VALUE_FLAG_BYTE);
    }

    let mut out = Vec::new();
    realm.iterate_keys(&prefix, |key| {
        if let Some(hash) = keys::tx_hash_from_address_key(key) {
            out.push(hash);
        }
        out.len() < max_find
    })?;
    Ok(out)
}

/// `ContainsAddress`. With `value_only = false`, true if either the value or non-value entry
/// exists.
pub fn contains_address(
    store: &Store,
    address: &[u8; HASH_BYTE_LEN],
    tx_hash: &[u8; HASH_BYTE_LEN],
    value_only: bool,
) -> Result<bool, LedgerError> {
    let realm = store.realm(realms::ADDRESS);
    if value_only {
        return Ok(realm.has(&keys::address_index_key(address, true, tx_hash))?);
    }
    Ok(realm.has(&keys::address_index_key(address, true, tx_hash))? || realm.has(&keys::address_index_key(address, false, tx_hash))?)
}

/// `GetApproverHashes`.
pub fn approver_hashes(store: &Store, referenced_tx: &[u8; HASH_BYTE_LEN], max_find: usize) -> Result<Vec<[u8; HASH_BYTE_LEN]>, LedgerError> {
    let realm = store.realm(realms::APPROVER);
    let mut out = Vec::new();
    realm.iterate_keys(referenced_tx, |key| {
        if let Some(hash) = keys::approver_from_approver_key(key) {
            out.push(hash);
        }
        out.len() < max_find
    })?;
    Ok(out)
}

pub fn contains_approver(store: &Store, referenced_tx: &[u8; HASH_BYTE_LEN], approver_tx: &[u8; HASH_BYTE_LEN]) -> Result<bool, LedgerError> {
    let realm = store.realm(realms::APPROVER);
    Ok(realm.has(&keys::approver_index_key(referenced_tx, approver_tx))?)
}

/// `GetBundleTransactionHashes`.
pub fn bundle_transaction_hashes(store: &Store, bundle_hash: &[u8; HASH_BYTE_LEN], max_find: usize) -> Result<Vec<[u8; HASH_BYTE_LEN]>, LedgerError> {
    let realm = store.realm(realms::BUNDLE_TRANSACTION);
    let mut out = Vec::new();
    realm.iterate_keys(bundle_hash, |key| {
        if let Some(hash) = keys::tx_hash_from_bundle_key(key) {
            out.push(hash);
        }
        out.len() < max_find
    })?;
    Ok(out)
}

pub fn contains_bundle_transaction(store: &Store, bundle_hash: &[u8; HASH_BYTE_LEN], tx_hash: &[u8; HASH_BYTE_LEN]) -> Result<bool, LedgerError> {
    let realm = store.realm(realms::BUNDLE_TRANSACTION);
    Ok(realm.has(&keys::bundle_tx_index_key(bundle_hash, true, tx_hash))? || realm.has(&keys::bundle_tx_index_key(bundle_hash, false, tx_hash))?)
}

/// `GetTagHashes`. `tag_hash` is the 17-byte packed form produced by
/// `archive_codec::trinary::tag_hash_from_trytes`.
pub fn tag_hashes(store: &Store, tag_hash: &[u8; keys::TAG_HASH_BYTE_LEN], max_find: usize) -> Result<Vec<[u8; HASH_BYTE_LEN]>, LedgerError> {
    let realm = store.realm(realms::TAG);
    let mut out = Vec::new();
    realm.iterate_keys(tag_hash, |key| {
        if let Some(hash) = keys::tx_hash_from_tag_key(key) {
            out.push(hash);
        }
        out.len() < max_find
    })?;
    Ok(out)
}

pub fn contains_tag(store: &Store, tag_hash: &[u8; keys::TAG_HASH_BYTE_LEN], tx_hash: &[u8; HASH_BYTE_LEN]) -> Result<bool, LedgerError> {
    let realm = store.realm(realms::TAG);
    Ok(realm.has(&keys::tag_index_key(tag_hash, tx_hash))?)
}

/// `WasAddressSpentFrom`: a point lookup in the `spent` database.
pub fn was_address_spent_from(store: &Store, address: &[u8; HASH_BYTE_LEN]) -> Result<bool, LedgerError> {
    let realm = store.realm(realms::SPENT_ADDRESS);
    Ok(realm.has(address)?)
}
