// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failures from the Store Facade. A `get`/`has`/`iterate` call only ever fails on genuine I/O
/// corruption; "key not present" is `Ok(None)`/`Ok(false)`, never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rocksdb I/O failure: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("sled I/O failure: {0}")]
    Sled(#[from] sled::Error),

    #[error("database at {path} failed its startup health check: {reason}")]
    HealthCheckFailed { path: String, reason: &'static str },

    #[error("database at {path} has schema version {found}, expected {expected}")]
    SchemaMismatch { path: String, expected: u8, found: u8 },

    #[error("could not determine an on-disk engine for directory {0}")]
    UnrecognizedEngine(String),
}
