// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Per-milestone state diff reconstruction by tangle traversal from a milestone bundle's tail.

use std::collections::{HashMap, HashSet, VecDeque};

use archive_model::{Hash, SolidEntryPoints, TransactionMetadata};
use archive_store::Store;
use tokio_util::sync::CancellationToken;

use crate::cancellation;
use crate::error::{fatal, LedgerError};
use crate::loaders;

/// A value-carrying transaction confirmed by the milestone, with its tail and bundle context —
/// what the ledger-diff-extended REST response wraps a plain balance change with.
#[derive(Debug, Clone)]
pub struct ConfirmedTransaction {
    pub tx_hash: Hash,
    pub tail_tx_hash: Hash,
    pub bundle_hash: Hash,
    pub address: Hash,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct BundleTransaction {
    pub tx_hash: Hash,
    pub address: Hash,
    pub current_index: u64,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct ConfirmedBundle {
    pub bundle_hash: Hash,
    pub tail_tx_hash: Hash,
    pub txs: Vec<BundleTransaction>,
    pub last_index: u64,
}

/// The three accumulators [`getMilestoneStateDiff`](state_diff) produces, named after the
/// original RPC fields they feed.
#[derive(Debug, Clone)]
pub struct MilestoneStateDiff {
    pub confirmed_tx_with_value: Vec<ConfirmedTransaction>,
    pub confirmed_bundles_with_value: Vec<ConfirmedBundle>,
    pub ledger_delta: HashMap<Hash, i64>,
}

/// Reconstructs everything milestone `milestone_index` confirmed by traversing backward from its
/// bundle's tail transaction. Visitation order is unspecified; callers must not depend on output
/// ordering of `confirmed_tx_with_value`/`confirmed_bundles_with_value`.
pub fn get_milestone_state_diff(
    store: &Store,
    solid_entry_points: &SolidEntryPoints,
    milestone_index: u32,
    cancellation: &CancellationToken,
) -> Result<MilestoneStateDiff, LedgerError> {
    let milestone = loaders::load_milestone(store, milestone_index)?
        .ok_or_else(|| LedgerError::NotFound(format!("milestone {milestone_index}")))?;
    // Existence of the milestone's own bundle is part of step 1's "fail if absent"; the
    // traversal below reaches and validates it again once it pops the tail hash, so the result
    // is discarded here.
    if loaders::load_bundle(store, &milestone.tail_hash())?.is_none() {
        fatal(format!("milestone {milestone_index} bundle {} is missing", milestone.tail_hash()));
    }

    let mut frontier: VecDeque<Hash> = VecDeque::new();
    frontier.push_back(milestone.tail_hash());

    let mut visited: HashSet<Hash> = HashSet::new();
    let mut ledger_delta: HashMap<Hash, i64> = HashMap::new();
    let mut confirmed_tx_with_value = Vec::new();
    let mut confirmed_bundles_with_value = Vec::new();

    while let Some(h) = frontier.pop_front() {
        cancellation::check(cancellation)?;

        if visited.contains(&h) {
            continue;
        }
        if solid_entry_points.contains(&h) {
            visited.insert(h);
            continue;
        }

        let metadata = loaders::load_transaction_metadata(store, &h)?
            .ok_or_else(|| LedgerError::Internal(format!("transaction {h} referenced from milestone {milestone_index} traversal has no metadata")))?;

        if !metadata.is_confirmed() {
            return Err(LedgerError::Internal(format!(
                "transaction {h} reached while traversing milestone {milestone_index} is not confirmed"
            )));
        }
        if metadata.confirmation_index() != milestone_index {
            visited.insert(h);
            continue;
        }

        let (trunk, branch) = resolve_trunk_branch(store, &h, &metadata)?;
        if !visited.contains(&trunk) {
            frontier.push_back(trunk);
        }
        if !visited.contains(&branch) {
            frontier.push_back(branch);
        }

        if !metadata.is_tail() {
            visited.insert(h);
            continue;
        }

        let bundle = loaders::load_bundle(store, &h)?
            .ok_or_else(|| LedgerError::Internal(format!("tail transaction {h} confirmed by milestone {milestone_index} has no bundle record")))?;
        if !bundle.is_valid() {
            return Err(LedgerError::Internal(format!("bundle tailed at {h} confirmed by milestone {milestone_index} is not valid")));
        }

        if !bundle.is_value_spam() {
            let mut txs = Vec::with_capacity(bundle.tx_hashes().len());
            for &tx_hash in bundle.tx_hashes() {
                let tx = loaders::load_transaction(store, tx_hash)?
                    .unwrap_or_else(|| fatal(format!("bundle member {tx_hash} of bundle tailed at {h} is missing")));
                if tx.is_value() {
                    confirmed_tx_with_value.push(ConfirmedTransaction {
                        tx_hash,
                        tail_tx_hash: h,
                        bundle_hash: bundle.bundle_hash(),
                        address: tx.address(),
                        value: tx.value(),
                    });
                    txs.push(BundleTransaction {
                        tx_hash,
                        address: tx.address(),
                        current_index: tx.current_index(),
                        value: tx.value(),
                    });
                }
            }

            for &(address, change) in bundle.ledger_changes() {
                *ledger_delta.entry(address).or_insert(0) += change;
            }

            confirmed_bundles_with_value.push(ConfirmedBundle {
                bundle_hash: bundle.bundle_hash(),
                tail_tx_hash: h,
                txs,
                last_index: bundle.last_index(),
            });
        }

        visited.insert(h);
    }

    Ok(MilestoneStateDiff { confirmed_tx_with_value, confirmed_bundles_with_value, ledger_delta })
}

/// Resolves a transaction's trunk/branch, using the metadata's denormalized hashes when present
/// and falling back to loading the transaction itself otherwise.
fn resolve_trunk_branch(store: &Store, hash: &Hash, metadata: &TransactionMetadata) -> Result<(Hash, Hash), LedgerError> {
    if let (Some(trunk), Some(branch)) = (metadata.trunk(), metadata.branch()) {
        return Ok((trunk, branch));
    }
    let tx = loaders::load_transaction(store, *hash)?.unwrap_or_else(|| fatal(format!("transaction {hash} has metadata but no record")));
    Ok((tx.trunk_hash()?, tx.branch_hash()?))
}
