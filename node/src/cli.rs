// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Command-line arguments.

use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "archive-node", about = "Read-only query service over a legacy tangle archive.")]
pub struct Args {
    #[structopt(short, long, name = "config", default_value = "config.toml")]
    config: String,
    #[structopt(long, name = "log_level")]
    log_level: Option<String>,
}

pub struct Cli {
    args: Args,
}

impl Cli {
    pub fn new() -> Self {
        Self { args: Args::from_args() }
    }

    pub fn config_path(&self) -> &str {
        &self.args.config
    }

    pub fn log_level(&self) -> Option<&str> {
        self.args.log_level.as_deref()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
