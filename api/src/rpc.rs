// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The legacy POST `/` command dispatcher. One `serde_json::Value` is parsed from the request
//! body, `command` is pulled off it case-insensitively, and the same `Value` is re-deserialized
//! into whichever request DTO that command expects — the body is read once but decoded twice,
//! matching the documented contract that dispatch and payload decoding share the same bytes.

use std::time::Instant;

use archive_codec::keys::TAG_HASH_BYTE_LEN;
use archive_codec::trinary::{self, HASH_BYTE_LEN};
use archive_ledger::search::SearchQuery;
use axum::extract::{Extension, Json};
use axum::response::IntoResponse;
use serde_json::Value;

use crate::dto::{
    FindTransactionsRequest, FindTransactionsResponse, GetBalancesRequest, GetBalancesResponse, GetInclusionStatesRequest, GetInclusionStatesResponse,
    GetLedgerDiffExtResponse, GetLedgerDiffRequest, GetLedgerDiffResponse, GetLedgerStateRequest, GetLedgerStateResponse, GetTrytesRequest, GetTrytesResponse,
    LedgerDiffExtEntry, WereAddressesSpentFromRequest, WereAddressesSpentFromResponse,
};
use crate::error::ApiError;
use crate::node_info::build_node_info_response;
use crate::state::AppState;
use crate::validate;

/// Legacy write/network commands this read-only service deliberately does not implement.
/// Recognized by name so a caller gets "not supported by this service" rather than a generic
/// "unknown command", distinguishing a protocol typo from an intentionally-unsupported command.
const UNSUPPORTED_COMMANDS: &[&str] = &[
    "storetransactions",
    "broadcasttransactions",
    "attachtotangle",
    "interruptattachingtotangle",
    "addneighbors",
    "removeneighbors",
    "getneighbors",
    "checkconsistency",
    "gettips",
    "gettipinfo",
];

pub async fn dispatch(Extension(state): Extension<AppState>, Json(body): Json<Value>) -> axum::response::Response {
    let start = Instant::now();
    let command = body.get("command").and_then(Value::as_str).map(str::to_lowercase);

    let result = match command.as_deref() {
        Some("getnodeinfo") => get_node_info(&state, start).await,
        Some("findtransactions") => find_transactions(&state, body, start).await,
        Some("gettrytes") => get_trytes(&state, body, start).await,
        Some("getinclusionstates") => get_inclusion_states(&state, body, start).await,
        Some("getbalances") => get_balances(&state, body, start).await,
        Some("wereaddressesspentfrom") => were_addresses_spent_from(&state, body, start).await,
        Some("getledgerstate") => get_ledger_state(&state, body, start).await,
        Some("getledgerdiff") => get_ledger_diff(&state, body, start, false).await,
        Some("getledgerdiffext") => get_ledger_diff(&state, body, start, true).await,
        Some(other) if UNSUPPORTED_COMMANDS.contains(&other) => {
            Err(ApiError::InvalidParameter(format!("{other} is not supported by this read-only service")))
        }
        _ => Err(ApiError::InvalidParameter(format!("unknown command: {:?}", command.unwrap_or_default()))),
    };

    match result {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

fn duration_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

async fn get_node_info(state: &AppState, start: Instant) -> Result<axum::response::Response, ApiError> {
    let response = build_node_info_response(state, duration_ms(start))?;
    Ok(Json(response).into_response())
}

fn parse_hash_list(items: &[String]) -> Result<Vec<[u8; HASH_BYTE_LEN]>, ApiError> {
    Ok(validate::parse_list(items, validate::parse_transaction_hash)?.into_iter().map(|hash| *hash.as_bytes()).collect())
}

fn parse_address_list(items: &[String]) -> Result<Vec<[u8; HASH_BYTE_LEN]>, ApiError> {
    Ok(validate::parse_list(items, validate::parse_address)?.into_iter().map(|hash| *hash.as_bytes()).collect())
}

async fn find_transactions(state: &AppState, body: Value, start: Instant) -> Result<axum::response::Response, ApiError> {
    let request: FindTransactionsRequest = serde_json::from_value(body).map_err(|e| ApiError::InvalidParameter(e.to_string()))?;

    let tags: Vec<[u8; TAG_HASH_BYTE_LEN]> = request.tags.iter().map(|tag| validate::parse_tag(tag)).collect::<Result<_, _>>()?;

    let max_results = request.maxresults.unwrap_or(state.max_find_transactions).min(state.max_find_transactions);

    let query = SearchQuery {
        bundles: parse_hash_list(&request.bundles)?,
        approvees: parse_hash_list(&request.approvees)?,
        addresses: parse_address_list(&request.addresses)?,
        tags,
        value_only: request.value_only,
        max_results,
    };

    let hashes = state.engine.find_transactions(&query)?;
    let response = FindTransactionsResponse { hashes: hashes.iter().map(|h| h.to_trytes()).collect(), duration: duration_ms(start) };
    Ok(Json(response).into_response())
}

async fn get_trytes(state: &AppState, body: Value, start: Instant) -> Result<axum::response::Response, ApiError> {
    let request: GetTrytesRequest = serde_json::from_value(body).map_err(|e| ApiError::InvalidParameter(e.to_string()))?;
    let hashes = validate::parse_list(&request.hashes, validate::parse_transaction_hash)?;

    let mut trytes = Vec::with_capacity(hashes.len());
    for hash in &hashes {
        match state.engine.get_transaction_trytes(hash)? {
            Some(t) => trytes.push(t),
            None => trytes.push(trinary::empty_transaction_trytes()),
        }
    }

    let response = GetTrytesResponse { trytes, duration: duration_ms(start) };
    Ok(Json(response).into_response())
}

async fn get_inclusion_states(state: &AppState, body: Value, start: Instant) -> Result<axum::response::Response, ApiError> {
    let request: GetInclusionStatesRequest = serde_json::from_value(body).map_err(|e| ApiError::InvalidParameter(e.to_string()))?;
    let hashes = validate::parse_list(&request.transactions, validate::parse_transaction_hash)?;

    let mut states = Vec::with_capacity(hashes.len());
    for hash in &hashes {
        states.push(state.engine.is_transaction_confirmed(hash)?);
    }

    let response = GetInclusionStatesResponse { states, duration: duration_ms(start) };
    Ok(Json(response).into_response())
}

async fn get_balances(state: &AppState, body: Value, start: Instant) -> Result<axum::response::Response, ApiError> {
    let request: GetBalancesRequest = serde_json::from_value(body).map_err(|e| ApiError::InvalidParameter(e.to_string()))?;
    let addresses = validate::parse_list(&request.addresses, validate::parse_address)?;

    let (ledger_map, milestone_index) = state.engine.get_ledger_state_for_milestone(0, &state.shutdown)?;
    let sync_state = state.engine.sync_state()?;

    let balances = addresses.iter().map(|address| ledger_map.get(address).copied().unwrap_or(0).to_string()).collect();

    let response = GetBalancesResponse {
        balances,
        references: vec![sync_state.latest_milestone.to_trytes()],
        milestone_index,
        duration: duration_ms(start),
    };
    Ok(Json(response).into_response())
}

async fn were_addresses_spent_from(state: &AppState, body: Value, start: Instant) -> Result<axum::response::Response, ApiError> {
    let request: WereAddressesSpentFromRequest = serde_json::from_value(body).map_err(|e| ApiError::InvalidParameter(e.to_string()))?;
    let addresses = validate::parse_list(&request.addresses, validate::parse_address)?;

    let mut states = Vec::with_capacity(addresses.len());
    for address in &addresses {
        states.push(state.engine.was_address_spent_from(address)?);
    }

    let response = WereAddressesSpentFromResponse { states, duration: duration_ms(start) };
    Ok(Json(response).into_response())
}

async fn get_ledger_state(state: &AppState, body: Value, start: Instant) -> Result<axum::response::Response, ApiError> {
    let request: GetLedgerStateRequest = serde_json::from_value(body).map_err(|e| ApiError::InvalidParameter(e.to_string()))?;

    let (ledger_map, milestone_index) = state.engine.get_ledger_state_for_milestone(request.milestone_index, &state.shutdown)?;
    let balances = ledger_map.into_iter().map(|(address, balance)| (address.to_trytes(), balance)).collect();

    let response = GetLedgerStateResponse { balances, milestone_index, duration: duration_ms(start) };
    Ok(Json(response).into_response())
}

async fn get_ledger_diff(state: &AppState, body: Value, start: Instant, extended: bool) -> Result<axum::response::Response, ApiError> {
    let request: GetLedgerDiffRequest = serde_json::from_value(body).map_err(|e| ApiError::InvalidParameter(e.to_string()))?;
    let milestone_index = request.milestone_index;

    let diff = state.engine.get_ledger_diff_for_milestone(milestone_index)?;

    if !extended {
        let response = GetLedgerDiffResponse {
            diff: diff.into_iter().map(|(address, change)| (address.to_trytes(), change)).collect(),
            milestone_index,
            duration: duration_ms(start),
        };
        return Ok(Json(response).into_response());
    }

    let state_diff = state.engine.get_milestone_state_diff(milestone_index, &state.shutdown)?;
    let entries = state_diff
        .confirmed_tx_with_value
        .iter()
        .map(|tx| LedgerDiffExtEntry {
            address: tx.address.to_trytes(),
            change: tx.value,
            tail_tx_hash: tx.tail_tx_hash.to_trytes(),
            bundle_hash: tx.bundle_hash.to_trytes(),
        })
        .collect();

    let response = GetLedgerDiffExtResponse { diff: entries, milestone_index, duration: duration_ms(start) };
    Ok(Json(response).into_response())
}
