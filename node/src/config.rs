// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! TOML-backed node configuration, built the way `bee-ledger`'s config structs are: an
//! `Option`-field builder deserialized straight off the file, defaults filled in by `finish()`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use fern_logger::{LoggerConfig, LoggerConfigBuilder, LOGGER_STDOUT_NAME};
use log::LevelFilter;
use serde::Deserialize;

const DEFAULT_TANGLE_PATH: &str = "storage/tangle";
const DEFAULT_SNAPSHOT_PATH: &str = "storage/snapshot";
const DEFAULT_SPENT_PATH: &str = "storage/spent";
const DEFAULT_BINDING_PORT: u16 = 14266;
const DEFAULT_BINDING_IP_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0));
/// Matches the legacy service's `DEFAULT_REST_API_MAX_BODY_LENGTH`-style constant naming.
const DEFAULT_REST_MAX_BODY_LEN: usize = 2 * 1024 * 1024;
const DEFAULT_MAX_FIND_TRANSACTIONS: usize = 1000;
const DEFAULT_MILESTONE_START_INDEX: u32 = 0;
const DEFAULT_BYPASS_HEALTH_CHECK: bool = false;
const DEFAULT_USE_CACHE: bool = true;
const DEFAULT_ENABLE_SWAGGER: bool = false;

/// Which RPC commands and REST routes are reachable without an allow-listed caller, grounded on
/// `RestApiConfig`'s `public_routes`/`allowed_ips` split.
#[derive(Default, Deserialize)]
pub struct PublicApiConfigBuilder {
    commands: Option<Vec<String>>,
    routes: Option<Vec<String>>,
}

impl PublicApiConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> PublicApiConfig {
        PublicApiConfig {
            commands: self.commands.unwrap_or_else(default_public_commands),
            routes: self.routes.unwrap_or_else(default_public_routes),
        }
    }
}

#[derive(Clone)]
pub struct PublicApiConfig {
    commands: Vec<String>,
    routes: Vec<String>,
}

impl PublicApiConfig {
    pub fn build() -> PublicApiConfigBuilder {
        PublicApiConfigBuilder::new()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }
}

fn default_public_commands() -> Vec<String> {
    [
        "getNodeInfo",
        "findTransactions",
        "getTrytes",
        "getInclusionStates",
        "getBalances",
        "wereAddressesSpentFrom",
        "getLedgerState",
        "getLedgerDiff",
        "getLedgerDiffExt",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_public_routes() -> Vec<String> {
    [
        "/info",
        "/transactions",
        "/transactions/:hash/trytes",
        "/transactions/:hash/inclusion-state",
        "/addresses/:address/balance",
        "/addresses/:address/was-spent",
        "/ledger/state",
        "/ledger/state/by-index/:index",
        "/ledger/diff/by-index/:index",
        "/ledger/diff-extended/by-index/:index",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Default, Deserialize)]
pub struct NodeConfigBuilder {
    tangle_path: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    spent_path: Option<PathBuf>,
    binding_port: Option<u16>,
    binding_ip_addr: Option<IpAddr>,
    advertised_socket_addr: Option<SocketAddr>,
    rest_max_body_len: Option<usize>,
    max_find_transactions: Option<usize>,
    milestone_start_index: Option<u32>,
    bypass_health_check: Option<bool>,
    use_cache: Option<bool>,
    enable_swagger: Option<bool>,
    logger: Option<LoggerConfigBuilder>,
    public_api: Option<PublicApiConfigBuilder>,
}

impl NodeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and deserializes `path`, falling back to an all-defaults config if it doesn't exist.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(ConfigError::Deserialize),
            Err(_) => Ok(Self::new()),
        }
    }

    /// Overrides the stdout logger output's level with `--log-level`, seeding a default stdout
    /// output first if the config file didn't declare any.
    pub fn with_log_level_override(mut self, level: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(level) = level {
            let level = LevelFilter::from_str(level).map_err(|_| ConfigError::InvalidLogLevel(level.to_owned()))?;
            let mut logger = self.logger.unwrap_or_else(default_logger_builder);
            logger.level(LOGGER_STDOUT_NAME, level);
            self.logger = Some(logger);
        }
        Ok(self)
    }

    pub fn finish(self) -> NodeConfig {
        let bind_socket_addr = SocketAddr::new(self.binding_ip_addr.unwrap_or(DEFAULT_BINDING_IP_ADDR), self.binding_port.unwrap_or(DEFAULT_BINDING_PORT));

        NodeConfig {
            tangle_path: self.tangle_path.unwrap_or_else(|| PathBuf::from(DEFAULT_TANGLE_PATH)),
            snapshot_path: self.snapshot_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            spent_path: self.spent_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SPENT_PATH)),
            bind_socket_addr,
            advertised_socket_addr: self.advertised_socket_addr,
            rest_max_body_len: self.rest_max_body_len.unwrap_or(DEFAULT_REST_MAX_BODY_LEN),
            max_find_transactions: self.max_find_transactions.unwrap_or(DEFAULT_MAX_FIND_TRANSACTIONS),
            milestone_start_index: self.milestone_start_index.unwrap_or(DEFAULT_MILESTONE_START_INDEX),
            bypass_health_check: self.bypass_health_check.unwrap_or(DEFAULT_BYPASS_HEALTH_CHECK),
            use_cache: self.use_cache.unwrap_or(DEFAULT_USE_CACHE),
            enable_swagger: self.enable_swagger.unwrap_or(DEFAULT_ENABLE_SWAGGER),
            logger: self.logger.unwrap_or_else(default_logger_builder).finish(),
            public_api: self.public_api.unwrap_or_default().finish(),
        }
    }
}

const DEFAULT_LOGGER_TOML: &str = "color_enabled = true\n\n[[outputs]]\nname = \"stdout\"\nlevel_filter = \"info\"\n";

fn default_logger_builder() -> LoggerConfigBuilder {
    toml::from_str(DEFAULT_LOGGER_TOML).unwrap_or_default()
}

#[derive(Clone)]
pub struct NodeConfig {
    pub tangle_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub spent_path: PathBuf,
    pub bind_socket_addr: SocketAddr,
    pub advertised_socket_addr: Option<SocketAddr>,
    pub rest_max_body_len: usize,
    pub max_find_transactions: usize,
    pub milestone_start_index: u32,
    pub bypass_health_check: bool,
    pub use_cache: bool,
    pub enable_swagger: bool,
    pub logger: LoggerConfig,
    pub public_api: PublicApiConfig,
}

impl NodeConfig {
    pub fn build() -> NodeConfigBuilder {
        NodeConfigBuilder::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config file: {0}")]
    Deserialize(#[from] toml::de::Error),
    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = NodeConfigBuilder::from_file("/nonexistent/path/config.toml").unwrap().finish();
        assert_eq!(config.max_find_transactions, DEFAULT_MAX_FIND_TRANSACTIONS);
        assert_eq!(config.bind_socket_addr.port(), DEFAULT_BINDING_PORT);
        assert!(!config.enable_swagger);
    }

    #[test]
    fn log_level_override_rejects_garbage() {
        let builder = NodeConfigBuilder::new();
        assert!(builder.with_log_level_override(Some("not-a-level")).is_err());
    }

    #[test]
    fn log_level_override_builds_cleanly_with_no_configured_logger() {
        let builder = NodeConfigBuilder::new().with_log_level_override(Some("debug")).unwrap();
        let _config = builder.finish();
    }

    #[test]
    fn default_public_api_lists_every_rpc_command() {
        let public_api = PublicApiConfigBuilder::new().finish();
        assert_eq!(public_api.commands().len(), 9);
    }
}
