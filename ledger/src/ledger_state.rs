// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Backward replay of stored per-milestone diffs to reconstruct the balance map at any target
//! milestone index between the snapshot's pruning index (exclusive) and the latest solid
//! milestone index (inclusive).

use std::collections::HashMap;

use archive_codec::{keys, realms, TOTAL_SUPPLY};
use archive_model::Hash;
use archive_store::Store;
use tokio_util::sync::CancellationToken;

use crate::cancellation;
use crate::error::{fatal, LedgerError};

/// Reads the full current balance map by iterating the `ledger_balance` realm. Fails hard if the
/// balances don't sum to [`TOTAL_SUPPLY`]: that invariant holding is what makes every subsequent
/// backward-replayed balance trustworthy.
pub fn get_ledger_state_for_lsmi(store: &Store) -> Result<HashMap<Hash, u64>, LedgerError> {
    let realm = store.realm(realms::LEDGER_BALANCE);
    let mut balances = HashMap::new();
    let mut sum: u128 = 0;

    realm.iterate(&[], |key, value| {
        if key.len() != 49 || value.len() != 8 {
            fatal("ledger_balance record has an unexpected key or value width");
        }
        let mut address = [0u8; 49];
        address.copy_from_slice(key);
        let balance = u64::from_le_bytes(value.try_into().unwrap());
        sum += balance as u128;
        balances.insert(Hash::from_bytes(address), balance);
        true
    })?;

    if sum != TOTAL_SUPPLY as u128 {
        fatal(format!("ledger balances sum to {sum}, expected total supply {TOTAL_SUPPLY}"));
    }

    Ok(balances)
}

/// Rejects a milestone index outside `(pruning_index, latest_solid_milestone_index]`, the same
/// bounds [`get_ledger_state_for_milestone`] enforces for its `target` argument. Callers that
/// accept a milestone index directly from a client (`getLedgerDiff`/`getLedgerDiffExt` and their
/// REST equivalents) must run this before touching the store, rather than silently answering
/// with an empty diff for an out-of-range index.
pub fn validate_milestone_index(milestone_index: u32, latest_solid_milestone_index: u32, pruning_index: u32) -> Result<(), LedgerError> {
    if milestone_index > latest_solid_milestone_index {
        return Err(LedgerError::InvalidParameter(format!(
            "milestone {milestone_index} is newer than the latest solid milestone {latest_solid_milestone_index}"
        )));
    }
    if milestone_index <= pruning_index {
        return Err(LedgerError::InvalidParameter(format!(
            "milestone {milestone_index} is older than the snapshot's pruning index {pruning_index}"
        )));
    }
    Ok(())
}

/// Reads the stored diff for milestone `m`: every `(address, signed change)` pair under that
/// milestone's prefix in the `ledger_diff` realm. Asserts the diff's net sum is zero — this is a
/// corruption signal, not a user error, hence the hard abort rather than a returned error.
///
/// Does not itself validate that `milestone_index` is in range: callers that take the index from
/// a client must call [`validate_milestone_index`] first (see [`crate::Engine`]'s wrappers).
pub fn get_ledger_diff_for_milestone(store: &Store, milestone_index: u32) -> Result<Vec<(Hash, i64)>, LedgerError> {
    let realm = store.realm(realms::LEDGER_DIFF);
    let prefix = keys::ledger_diff_prefix(milestone_index);

    let mut diff = Vec::new();
    let mut sum: i128 = 0;

    realm.iterate(&prefix, |key, value| {
        let Some(address) = keys::address_from_ledger_diff_key(key) else {
            fatal(format!("ledger_diff record for milestone {milestone_index} has a malformed key"));
        };
        if value.len() != 8 {
            fatal(format!("ledger_diff record for milestone {milestone_index} has a malformed value"));
        }
        let change = i64::from_le_bytes(value.try_into().unwrap());
        sum += change as i128;
        diff.push((Hash::from_bytes(address), change));
        true
    })?;

    if sum != 0 {
        fatal(format!("ledger diff for milestone {milestone_index} sums to {sum}, expected zero"));
    }

    Ok(diff)
}

/// Reconstructs the balance map at milestone `target`, replaying stored diffs backward from
/// `latest_solid_milestone_index`. `target == 0` means "use the latest". Returns the balance map
/// together with the milestone index it is actually valid for.
pub fn get_ledger_state_for_milestone(
    store: &Store,
    target: u32,
    latest_solid_milestone_index: u32,
    pruning_index: u32,
    cancellation: &CancellationToken,
) -> Result<(HashMap<Hash, u64>, u32), LedgerError> {
    if target != 0 {
        validate_milestone_index(target, latest_solid_milestone_index, pruning_index)?;
    }

    let mut balances = get_ledger_state_for_lsmi(store)?;
    let resolved_target = if target == 0 { latest_solid_milestone_index } else { target };

    if resolved_target == latest_solid_milestone_index {
        return Ok((balances, resolved_target));
    }

    for m in ((resolved_target + 1)..=latest_solid_milestone_index).rev() {
        cancellation::check(cancellation)?;

        let diff = get_ledger_diff_for_milestone(store, m)?;
        for (address, change) in diff {
            let current = balances.get(&address).copied().unwrap_or(0);
            let new_balance = current as i64 - change;
            if new_balance < 0 {
                fatal(format!(
                    "replaying milestone {m} would drive address {address} negative: balance {current}, change {change}"
                ));
            }
            if new_balance == 0 {
                balances.remove(&address);
            } else {
                balances.insert(address, new_balance as u64);
            }
        }
    }

    Ok((balances, resolved_target))
}
