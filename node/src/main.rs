// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Process entry point: CLI → config → logger → database bring-up → serve → graceful shutdown.

mod cli;
mod config;
mod logger;
mod shutdown;

use std::net::SocketAddr;

use archive_api::AppState;
use archive_ledger::Engine;
use archive_store::{Store, StoreConfig};
use axum::routing::get;
use axum::Router;
use log::info;
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;

use cli::Cli;
use config::NodeConfig;
use shutdown::Shutdown;

const APP_NAME: &str = "archive-node";
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Static OpenAPI description served verbatim when `enable_swagger` is set. Hand-written rather
/// than generated: no OpenAPI-generation crate appears anywhere in the dependency pack, and this
/// service's ten routes don't warrant introducing one.
const SWAGGER_DOC: &str = include_str!("../openapi.yaml");

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::new();

    let config = match config::NodeConfigBuilder::from_file(cli.config_path()).and_then(|builder| builder.with_log_level_override(cli.log_level())) {
        Ok(builder) => builder.finish(),
        Err(e) => {
            eprintln!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logger::init(config.logger.clone()) {
        eprintln!("failed to initialize logger: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Store(#[from] archive_store::error::StoreError),
    #[error(transparent)]
    Ledger(#[from] archive_ledger::error::LedgerError),
    #[error("server error: {0}")]
    Server(#[from] hyper::Error),
}

async fn run(config: NodeConfig) -> Result<(), RunError> {
    info!("opening databases");
    let store_config = StoreConfig {
        tangle_path: config.tangle_path.clone(),
        snapshot_path: config.snapshot_path.clone(),
        spent_path: config.spent_path.clone(),
        bypass_health_check: config.bypass_health_check,
        use_cache: config.use_cache,
    };
    let store = Store::open(&store_config)?;

    let mut shutdown = Shutdown::new();
    {
        let store_for_flush = store.clone();
        shutdown.add_action(move || store_for_flush.flush().map_err(|e| e.to_string()));
    }

    let engine = Engine::new(store);

    // Touch the process-lifetime singletons now so a broken snapshot fails startup loudly
    // instead of on the first incoming request.
    engine.snapshot_info()?;
    engine.solid_entry_points()?;
    engine.sync_state()?;

    info!(
        "archive covers milestones {}..={}",
        config.milestone_start_index,
        engine.sync_state()?.latest_milestone_index
    );

    let cancellation = CancellationToken::new();
    let state = AppState::new(engine, APP_NAME, APP_VERSION, config.milestone_start_index, config.max_find_transactions, cancellation.clone());

    let mut app = archive_api::router(state).layer(RequestBodyLimitLayer::new(config.rest_max_body_len));
    if config.enable_swagger {
        app = app.merge(swagger_router());
    }

    let addr: SocketAddr = config.bind_socket_addr;
    if let Some(advertised) = config.advertised_socket_addr {
        info!("binding {addr}, advertising {advertised}");
    } else {
        info!("binding {addr}");
    }

    // `with_graceful_shutdown` stops accepting new connections on the signal and waits for
    // in-flight requests to finish; cancelling the token at the same moment lets a long-running
    // traversal inside one of those requests abort instead of running to completion.
    let signal = async {
        shutdown_signal().await;
        info!("shutdown signal received, draining in-flight requests");
        cancellation.cancel();
    };
    axum::Server::bind(&addr).serve(app.into_make_service()).with_graceful_shutdown(signal).await?;
    info!("server stopped, tearing down");

    if let Err(e) = shutdown.execute() {
        log::error!("error during shutdown: {e}");
    }

    Ok(())
}

fn swagger_router() -> Router {
    Router::new().route("/swagger.yaml", get(|| async { SWAGGER_DOC }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
