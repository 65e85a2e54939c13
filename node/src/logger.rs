// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Thin wrapper around `fern_logger::logger_init`. The `--log-level` override is folded into the
//! `LoggerConfigBuilder` before it reaches here; see [`crate::config::NodeConfigBuilder::with_log_level_override`].

use fern_logger::LoggerConfig;

pub fn init(config: LoggerConfig) -> Result<(), fern_logger::Error> {
    fern_logger::logger_init(config)
}
