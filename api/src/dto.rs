// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Response shapes. RPC and REST responses for the same computation get their own struct each —
//! field naming/casing and hash representation differ between the two surfaces, mirroring the
//! Go original's separate RPC and REST DTO sets rather than one shape reused verbatim.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Node info, shared verbatim between `getNodeInfo` (RPC) and `/info` (REST) since the original
/// exposes the same fields on both surfaces.
#[derive(Debug, Serialize)]
pub struct NodeInfoResponse {
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(rename = "appVersion")]
    pub app_version: String,
    #[serde(rename = "latestMilestone")]
    pub latest_milestone: String,
    #[serde(rename = "latestMilestoneIndex")]
    pub latest_milestone_index: u32,
    #[serde(rename = "latestSolidSubtangleMilestone")]
    pub latest_solid_subtangle_milestone: String,
    #[serde(rename = "latestSolidSubtangleMilestoneIndex")]
    pub latest_solid_subtangle_milestone_index: u32,
    #[serde(rename = "isSynced")]
    pub is_synced: bool,
    #[serde(rename = "isHealthy")]
    pub is_healthy: bool,
    #[serde(rename = "milestoneStartIndex")]
    pub milestone_start_index: u32,
    #[serde(rename = "lastSnapshottedMilestoneIndex")]
    pub last_snapshotted_milestone_index: u32,
    pub neighbors: u32,
    pub time: i64,
    pub tips: u32,
    #[serde(rename = "transactionsToRequest")]
    pub transactions_to_request: u32,
    pub features: Vec<String>,
    #[serde(rename = "coordinatorAddress")]
    pub coordinator_address: String,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct FindTransactionsResponse {
    pub hashes: Vec<String>,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct GetTrytesResponse {
    pub trytes: Vec<String>,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct GetInclusionStatesResponse {
    pub states: Vec<bool>,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct GetBalancesResponse {
    pub balances: Vec<String>,
    /// Single-element list carrying the milestone hash the balances were read against, mirroring
    /// the legacy API's `references` field (plural for historical reasons; this node only ever
    /// answers against one milestone per request).
    pub references: Vec<String>,
    #[serde(rename = "milestoneIndex")]
    pub milestone_index: u32,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct WereAddressesSpentFromResponse {
    pub states: Vec<bool>,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct GetLedgerStateResponse {
    pub balances: HashMap<String, u64>,
    #[serde(rename = "milestoneIndex")]
    pub milestone_index: u32,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct GetLedgerDiffResponse {
    pub diff: HashMap<String, i64>,
    #[serde(rename = "milestoneIndex")]
    pub milestone_index: u32,
    pub duration: u64,
}

/// One address's change, extended with the confirming bundle/tail-tx context. Built by extending
/// the base diff map rather than querying a second time.
#[derive(Debug, Serialize)]
pub struct LedgerDiffExtEntry {
    pub address: String,
    pub change: i64,
    #[serde(rename = "tailTxHash")]
    pub tail_tx_hash: String,
    #[serde(rename = "bundleHash")]
    pub bundle_hash: String,
}

#[derive(Debug, Serialize)]
pub struct GetLedgerDiffExtResponse {
    pub diff: Vec<LedgerDiffExtEntry>,
    #[serde(rename = "milestoneIndex")]
    pub milestone_index: u32,
    pub duration: u64,
}

// REST-surface DTOs. Field casing follows the REST convention of this service (snake_case over
// the RPC surface's camelCase) and hashes are returned already in their printable tryte form,
// same as RPC, but under REST-idiomatic field names.

#[derive(Debug, Serialize)]
pub struct RestTransactionResponse {
    pub hash: String,
    pub trytes: String,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct RestInclusionStateResponse {
    pub confirmed: bool,
    pub duration: u64,
}

#[derive(Debug, Serialize)]
pub struct RestBalanceResponse {
    pub balance: u64,
    pub milestone_index: u32,
    pub duration: u64,
}

/// Deviates from the snake_case REST convention above: `wasSpent`/`ledgerIndex` are kept
/// camelCase to match this endpoint's documented response shape verbatim.
#[derive(Debug, Serialize)]
pub struct RestWasSpentResponse {
    pub address: String,
    #[serde(rename = "wasSpent")]
    pub was_spent: bool,
    #[serde(rename = "ledgerIndex")]
    pub ledger_index: u32,
    pub duration: u64,
}

// RPC request bodies. Deserialized from the same raw JSON value the dispatcher already pulled
// `command` out of; unknown/extra fields (like `command` itself) are ignored rather than
// rejected, since every command body shares the one POST `/` envelope.

#[derive(Debug, Deserialize, Default)]
pub struct FindTransactionsRequest {
    #[serde(default)]
    pub bundles: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub approvees: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "maxResults")]
    pub maxresults: Option<usize>,
    #[serde(default, rename = "valueOnly")]
    pub value_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct GetTrytesRequest {
    pub hashes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetInclusionStatesRequest {
    pub transactions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetBalancesRequest {
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WereAddressesSpentFromRequest {
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GetLedgerStateRequest {
    #[serde(default, rename = "milestoneIndex", alias = "milestone_index")]
    pub milestone_index: u32,
}

#[derive(Debug, Deserialize)]
pub struct GetLedgerDiffRequest {
    #[serde(rename = "milestoneIndex", alias = "milestone_index")]
    pub milestone_index: u32,
}
