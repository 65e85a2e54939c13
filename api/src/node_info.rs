// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Builds the node-info response shared verbatim between `getNodeInfo` (RPC) and `/info` (REST).

use crate::dto::NodeInfoResponse;
use crate::error::ApiError;
use crate::state::{now_ms, AppState};

pub fn build_node_info_response(state: &AppState, duration: u64) -> Result<NodeInfoResponse, ApiError> {
    let sync_state = state.engine.sync_state()?;
    let snapshot_info = state.engine.snapshot_info()?;

    Ok(NodeInfoResponse {
        app_name: state.app_name.clone(),
        app_version: state.app_version.clone(),
        latest_milestone: sync_state.latest_milestone.to_trytes(),
        latest_milestone_index: sync_state.latest_milestone_index,
        latest_solid_subtangle_milestone: sync_state.latest_solid_subtangle_milestone().to_trytes(),
        latest_solid_subtangle_milestone_index: sync_state.latest_solid_subtangle_milestone_index(),
        is_synced: sync_state.is_synced(),
        is_healthy: sync_state.is_healthy(),
        // The original sets both `MilestoneStartIndex` and `LastSnapshottedMilestoneIndex` to
        // the snapshot's pruning index, not its (distinct) snapshot index or a config value.
        milestone_start_index: snapshot_info.pruning_index(),
        last_snapshotted_milestone_index: snapshot_info.pruning_index(),
        neighbors: sync_state.neighbor_count(),
        time: now_ms(),
        tips: sync_state.tip_count(),
        transactions_to_request: sync_state.transactions_to_request(),
        features: Vec::new(),
        coordinator_address: sync_state.coordinator_address.to_trytes(),
        duration,
    })
}
