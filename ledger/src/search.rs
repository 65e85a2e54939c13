// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! `findTransactions`: AND-semantics intersection across up to four secondary-index criteria.

use archive_codec::{keys::TAG_HASH_BYTE_LEN, trinary::HASH_BYTE_LEN};
use archive_model::Hash;
use archive_store::Store;

use crate::error::LedgerError;
use crate::indexes;

/// One query criterion, already decoded to its binary key form. Empty vectors mean "criterion
/// not supplied".
#[derive(Debug, Default)]
pub struct SearchQuery {
    pub bundles: Vec<[u8; HASH_BYTE_LEN]>,
    pub approvees: Vec<[u8; HASH_BYTE_LEN]>,
    pub addresses: Vec<[u8; HASH_BYTE_LEN]>,
    pub tags: Vec<[u8; TAG_HASH_BYTE_LEN]>,
    pub value_only: bool,
    pub max_results: usize,
}

/// Evaluation order is fixed (bundles → approvees → addresses → tags): the first non-empty
/// criterion seeds the result set, every later non-empty criterion filters it. This ordering is
/// part of the observable contract, not an implementation detail, since it determines which
/// criterion pays the iteration cost and which only pays point-lookup cost.
pub fn find_transactions(store: &Store, query: &SearchQuery) -> Result<Vec<Hash>, LedgerError> {
    if query.bundles.is_empty() && query.approvees.is_empty() && query.addresses.is_empty() && query.tags.is_empty() {
        return Err(LedgerError::InvalidParameter("no search criteria".to_string()));
    }

    let mut results: Option<Vec<[u8; HASH_BYTE_LEN]>> = None;

    seed_or_filter(&mut results, &query.bundles, query.max_results, |cap| {
        let mut found = Vec::new();
        for bundle_hash in &query.bundles {
            for hash in indexes::bundle_transaction_hashes(store, bundle_hash, cap - found.len())? {
                found.push(hash);
                if found.len() >= cap {
                    return Ok(found);
                }
            }
        }
        Ok(found)
    }, |tx_hash| {
        query.bundles.iter().any(|bundle_hash| indexes::contains_bundle_transaction(store, bundle_hash, tx_hash).unwrap_or(false))
    })?;

    seed_or_filter(&mut results, &query.approvees, query.max_results, |cap| {
        let mut found = Vec::new();
        for referenced_tx in &query.approvees {
            for hash in indexes::approver_hashes(store, referenced_tx, cap - found.len())? {
                found.push(hash);
                if found.len() >= cap {
                    return Ok(found);
                }
            }
        }
        Ok(found)
    }, |tx_hash| {
        query.approvees.iter().any(|referenced_tx| indexes::contains_approver(store, referenced_tx, tx_hash).unwrap_or(false))
    })?;

    seed_or_filter(&mut results, &query.addresses, query.max_results, |cap| {
        let mut found = Vec::new();
        for address in &query.addresses {
            for hash in indexes::transaction_hashes_for_address(store, address, query.value_only, cap - found.len())? {
                found.push(hash);
                if found.len() >= cap {
                    return Ok(found);
                }
            }
        }
        Ok(found)
    }, |tx_hash| {
        query.addresses.iter().any(|address| indexes::contains_address(store, address, tx_hash, query.value_only).unwrap_or(false))
    })?;

    seed_or_filter(&mut results, &query.tags, query.max_results, |cap| {
        let mut found = Vec::new();
        for tag_hash in &query.tags {
            for hash in indexes::tag_hashes(store, tag_hash, cap - found.len())? {
                found.push(hash);
                if found.len() >= cap {
                    return Ok(found);
                }
            }
        }
        Ok(found)
    }, |tx_hash| {
        query.tags.iter().any(|tag_hash| indexes::contains_tag(store, tag_hash, tx_hash).unwrap_or(false))
    })?;

    Ok(results.unwrap_or_default().into_iter().map(Hash::from_bytes).collect())
}

/// If `criterion` is non-empty and `results` hasn't been seeded yet, seeds it via `seed`. If
/// `results` has already been seeded, filters it in place via `keep`. A no-op if `criterion` is
/// empty.
fn seed_or_filter<S>(
    results: &mut Option<Vec<[u8; HASH_BYTE_LEN]>>,
    criterion: &[S],
    max_results: usize,
    seed: impl FnOnce(usize) -> Result<Vec<[u8; HASH_BYTE_LEN]>, LedgerError>,
    keep: impl Fn(&[u8; HASH_BYTE_LEN]) -> bool,
) -> Result<(), LedgerError> {
    if criterion.is_empty() {
        return Ok(());
    }
    match results {
        None => {
            *results = Some(seed(max_results)?);
        }
        Some(current) => {
            current.retain(|tx_hash| keep(tx_hash));
        }
    }
    Ok(())
}
