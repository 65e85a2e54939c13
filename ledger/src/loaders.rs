// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Thin store-to-entity loaders. Each function is a single `get` plus a decode; callers decide
//! whether a missing record is `not_found` or `fatal` (a bundle referencing a missing member
//! transaction is corruption, a client asking for an unknown hash is not).

use archive_codec::realms;
use archive_model::{Bundle, Hash, Milestone, SnapshotInfo, SolidEntryPoints, Transaction, TransactionMetadata};
use archive_store::Store;

use crate::error::LedgerError;

pub fn load_transaction(store: &Store, hash: Hash) -> Result<Option<Transaction>, LedgerError> {
    let Some(trytes) = load_transaction_trytes(store, &hash)? else {
        return Ok(None);
    };
    Ok(Some(Transaction::decode(hash, &trytes)?))
}

/// Reads a transaction's raw 2673-tryte payload without decoding it into a [`Transaction`].
/// Used by `getTrytes`, which hands the trytes straight back to the client rather than needing
/// any of the decoded fields.
pub fn load_transaction_trytes(store: &Store, hash: &Hash) -> Result<Option<String>, LedgerError> {
    let realm = store.realm(realms::TRANSACTION);
    let Some(bytes) = realm.get(hash.as_bytes())? else {
        return Ok(None);
    };
    Ok(Some(std::str::from_utf8(&bytes).map_err(|e| LedgerError::Internal(e.to_string()))?.to_string()))
}

pub fn load_transaction_metadata(store: &Store, hash: &Hash) -> Result<Option<TransactionMetadata>, LedgerError> {
    let realm = store.realm(realms::TRANSACTION_METADATA);
    let Some(bytes) = realm.get(hash.as_bytes())? else {
        return Ok(None);
    };
    Ok(Some(TransactionMetadata::decode(&bytes)?))
}

/// Bundles are keyed by tail transaction hash.
pub fn load_bundle(store: &Store, tail_hash: &Hash) -> Result<Option<Bundle>, LedgerError> {
    let realm = store.realm(realms::BUNDLE);
    let Some(bytes) = realm.get(tail_hash.as_bytes())? else {
        return Ok(None);
    };
    Ok(Some(Bundle::decode(&bytes)?))
}

pub fn load_milestone(store: &Store, index: u32) -> Result<Option<Milestone>, LedgerError> {
    let realm = store.realm(realms::MILESTONE);
    let key = archive_codec::keys::milestone_key(index);
    let Some(bytes) = realm.get(&key)? else {
        return Ok(None);
    };
    Ok(Some(Milestone::decode(index, &bytes)?))
}

pub fn load_snapshot_info(store: &Store) -> Result<SnapshotInfo, LedgerError> {
    let realm = store.realm(realms::SNAPSHOT_INFO);
    let bytes = realm
        .get(realms::SNAPSHOT_INFO_KEY)?
        .ok_or_else(|| LedgerError::Internal("missing snapshotInfo record".to_string()))?;
    Ok(SnapshotInfo::decode(&bytes)?)
}

pub fn load_solid_entry_points(store: &Store) -> Result<SolidEntryPoints, LedgerError> {
    let realm = store.realm(realms::SOLID_ENTRY_POINTS);
    let bytes = realm
        .get(realms::SOLID_ENTRY_POINTS_KEY)?
        .ok_or_else(|| LedgerError::Internal("missing solidEntryPoints record".to_string()))?;
    Ok(SolidEntryPoints::decode(&bytes)?)
}

/// The current ledger index: the latest solid milestone index the `ledger_balance` realm is
/// consistent with.
pub fn load_ledger_index(store: &Store) -> Result<u32, LedgerError> {
    let realm = store.realm(realms::LEDGER_INDEX);
    let bytes = realm
        .get(realms::LEDGER_INDEX_KEY)?
        .ok_or_else(|| LedgerError::Internal("missing ledgerIndex record".to_string()))?;
    if bytes.len() != 4 {
        return Err(LedgerError::Internal("ledgerIndex record is not 4 bytes".to_string()));
    }
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}
