// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Assembles the axum [`Router`]: the legacy POST `/` command dispatcher plus the REST surface,
//! both reading from one shared [`AppState`].

pub mod dto;
pub mod error;
mod node_info;
pub mod rest;
pub mod rpc;
pub mod state;
pub mod validate;

use axum::routing::post;
use axum::{Extension, Router};

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().route("/", post(rpc::dispatch)).merge(rest::router()).layer(Extension(state))
}

#[cfg(test)]
mod tests {
    use archive_codec::trinary::HASH_TRYTE_LEN;
    use archive_ledger::Engine;
    use archive_store::{Store, StoreConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;

    fn open_test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            tangle_path: dir.path().join("tangle"),
            snapshot_path: dir.path().join("snapshot"),
            spent_path: dir.path().join("spent"),
            bypass_health_check: true,
            use_cache: true,
        };
        let store = Store::open(&config).unwrap();
        (dir, store)
    }

    fn test_app() -> Router {
        let (_dir, store) = open_test_store();
        let engine = Engine::new(store);
        let state = AppState::new(engine, "archive-node", "0.1.0", 0, 1000, CancellationToken::new());
        router(state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder().method("POST").uri(uri).header("content-type", "application/json").body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn unknown_rpc_command_is_invalid_parameter() {
        let app = test_app();
        let response = app.oneshot(post_json("/", serde_json::json!({"command": "notACommand"}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn find_transactions_without_criteria_is_invalid_parameter() {
        let app = test_app();
        let response = app.oneshot(post_json("/", serde_json::json!({"command": "findTransactions"}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rest_unknown_transaction_trytes_is_not_found() {
        let app = test_app();
        let hash = "A".repeat(HASH_TRYTE_LEN);
        let response = app.oneshot(get(&format!("/transactions/{hash}/trytes"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rest_invalid_address_is_invalid_parameter() {
        let app = test_app();
        let response = app.oneshot(get("/addresses/not-an-address/balance")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn node_info_fails_cleanly_before_a_snapshot_is_loaded() {
        // An empty test store has no snapshotInfo record yet, so this documents the current
        // startup-ordering contract: node info is only answerable once a real snapshot has been
        // loaded, surfaced as a 500 rather than a panic.
        let app = test_app();
        let response = app.oneshot(post_json("/", serde_json::json!({"command": "getNodeInfo"}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
