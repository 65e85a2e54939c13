// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use archive_ledger::Engine;
use tokio_util::sync::CancellationToken;

/// Shared, immutable state every handler reads from. Cheap to clone (one `Arc` each); axum hands
/// a fresh clone to every request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub app_name: String,
    pub app_version: String,
    pub milestone_start_index: u32,
    pub max_find_transactions: usize,
    /// Cancelled once when the process begins its graceful shutdown. Handlers pass a child
    /// token derived from this into every long-running ledger traversal, so an in-flight
    /// `getLedgerState`/`getLedgerDiff` aborts rather than racing the databases closing under
    /// it. There is no per-connection disconnect signal at this layer, so a dropped client
    /// still runs to completion; only a process-wide shutdown cancels in-flight work.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        engine: Engine,
        app_name: impl Into<String>,
        app_version: impl Into<String>,
        milestone_start_index: u32,
        max_find_transactions: usize,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            app_name: app_name.into(),
            app_version: app_version.into(),
            milestone_start_index,
            max_find_transactions,
            shutdown,
        }
    }
}

/// Milliseconds since the Unix epoch, for the node-info `time` field.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
