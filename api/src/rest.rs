// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! REST routes. The teacher splits one file per endpoint because its surface runs to dozens of
//! routes; this service's ten fit comfortably in one module, each still following the same
//! `Router::new().route(path, get(handler))` + `Extension<AppState>` shape.

use std::collections::HashMap;
use std::time::Instant;

use axum::extract::{Extension, Json, Path, Query};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::dto::{
    GetLedgerDiffExtResponse, GetLedgerDiffResponse, GetLedgerStateResponse, LedgerDiffExtEntry, RestBalanceResponse, RestInclusionStateResponse,
    RestTransactionResponse, RestWasSpentResponse,
};
use crate::error::ApiError;
use crate::node_info::build_node_info_response;
use crate::state::AppState;
use crate::validate;

pub fn router() -> Router {
    Router::new()
        .route("/info", get(info))
        .route("/transactions", get(find_transactions))
        .route("/transactions/:hash/trytes", get(transaction_trytes))
        .route("/transactions/:hash/inclusion-state", get(transaction_inclusion_state))
        .route("/addresses/:address/balance", get(address_balance))
        .route("/addresses/:address/was-spent", get(address_was_spent))
        .route("/ledger/state", get(ledger_state_latest))
        .route("/ledger/state/by-index/:index", get(ledger_state_by_index))
        .route("/ledger/diff/by-index/:index", get(ledger_diff_by_index))
        .route("/ledger/diff-extended/by-index/:index", get(ledger_diff_extended_by_index))
}

fn duration_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

async fn info(Extension(state): Extension<AppState>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let response = build_node_info_response(&state, duration_ms(start))?;
    Ok(Json(response))
}

/// `GET /transactions?bundles=..&addresses=..&approvees=..&tags=..&valueOnly=true&maxResults=100`.
/// Each query parameter is a comma-separated list; a missing parameter means that criterion is
/// not supplied, same as an empty array on the RPC surface.
async fn find_transactions(Extension(state): Extension<AppState>, Query(params): Query<HashMap<String, String>>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();

    let bundles = validate::parse_list(&csv_param(&params, "bundles"), validate::parse_transaction_hash)?;
    let approvees = validate::parse_list(&csv_param(&params, "approvees"), validate::parse_transaction_hash)?;
    let addresses = validate::parse_list(&csv_param(&params, "addresses"), validate::parse_address)?;
    let tags = csv_param(&params, "tags").iter().map(|t| validate::parse_tag(t)).collect::<Result<Vec<_>, _>>()?;

    let value_only = params.get("valueOnly").map(|v| v == "true").unwrap_or(false);
    let max_results = params
        .get("maxResults")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(state.max_find_transactions)
        .min(state.max_find_transactions);

    let query = archive_ledger::search::SearchQuery {
        bundles: bundles.iter().map(|h| *h.as_bytes()).collect(),
        approvees: approvees.iter().map(|h| *h.as_bytes()).collect(),
        addresses: addresses.iter().map(|h| *h.as_bytes()).collect(),
        tags,
        value_only,
        max_results,
    };

    let hashes = state.engine.find_transactions(&query)?;
    Ok(Json(crate::dto::FindTransactionsResponse { hashes: hashes.iter().map(|h| h.to_trytes()).collect(), duration: duration_ms(start) }))
}

fn csv_param(params: &HashMap<String, String>, key: &str) -> Vec<String> {
    params.get(key).map(|v| validate::split_csv(v)).unwrap_or_default()
}

async fn transaction_trytes(Extension(state): Extension<AppState>, Path(hash): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let hash = validate::parse_transaction_hash(&hash)?;
    let trytes = state
        .engine
        .get_transaction_trytes(&hash)?
        .ok_or_else(|| ApiError::NotFound(format!("transaction {hash}")))?;
    Ok(Json(RestTransactionResponse { hash: hash.to_trytes(), trytes, duration: duration_ms(start) }))
}

async fn transaction_inclusion_state(Extension(state): Extension<AppState>, Path(hash): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let hash = validate::parse_transaction_hash(&hash)?;
    let confirmed = state.engine.is_transaction_confirmed(&hash)?;
    Ok(Json(RestInclusionStateResponse { confirmed, duration: duration_ms(start) }))
}

async fn address_balance(Extension(state): Extension<AppState>, Path(address): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let address = validate::parse_address(&address)?;
    let (ledger_map, milestone_index) = state.engine.get_ledger_state_for_milestone(0, &state.shutdown)?;
    let balance = ledger_map.get(&address).copied().unwrap_or(0);
    Ok(Json(RestBalanceResponse { balance, milestone_index, duration: duration_ms(start) }))
}

async fn address_was_spent(Extension(state): Extension<AppState>, Path(address): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let address = validate::parse_address(&address)?;
    let was_spent = state.engine.was_address_spent_from(&address)?;
    let ledger_index = state.engine.ledger_index()?;
    Ok(Json(RestWasSpentResponse { address: address.to_trytes(), was_spent, ledger_index, duration: duration_ms(start) }))
}

async fn ledger_state_latest(Extension(state): Extension<AppState>) -> Result<impl IntoResponse, ApiError> {
    ledger_state_for(state, 0).await
}

async fn ledger_state_by_index(Extension(state): Extension<AppState>, Path(index): Path<u32>) -> Result<impl IntoResponse, ApiError> {
    ledger_state_for(state, index).await
}

async fn ledger_state_for(state: AppState, index: u32) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let (ledger_map, milestone_index) = state.engine.get_ledger_state_for_milestone(index, &state.shutdown)?;
    let balances = ledger_map.into_iter().map(|(address, balance)| (address.to_trytes(), balance)).collect();
    Ok(Json(GetLedgerStateResponse { balances, milestone_index, duration: duration_ms(start) }))
}

async fn ledger_diff_by_index(Extension(state): Extension<AppState>, Path(index): Path<u32>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let diff = state.engine.get_ledger_diff_for_milestone(index)?;
    let diff = diff.into_iter().map(|(address, change)| (address.to_trytes(), change)).collect();
    Ok(Json(GetLedgerDiffResponse { diff, milestone_index: index, duration: duration_ms(start) }))
}

async fn ledger_diff_extended_by_index(Extension(state): Extension<AppState>, Path(index): Path<u32>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let state_diff = state.engine.get_milestone_state_diff(index, &state.shutdown)?;
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
    Ok(Json(GetLedgerDiffExtResponse { diff: entries, milestone_index: index, duration: duration_ms(start) }))
}

