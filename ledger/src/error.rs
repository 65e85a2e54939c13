// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors surfaced by the ledger engine. `Fatal` is never constructed to be returned to a
/// caller that might recover from it; [`fatal`] logs and aborts the process directly, since an
/// invariant violation here means the on-disk data is corrupt and continuing would only produce
/// more corrupt output.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation aborted")]
    OperationAborted,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<archive_store::error::StoreError> for LedgerError {
    fn from(err: archive_store::error::StoreError) -> Self {
        LedgerError::Internal(err.to_string())
    }
}

impl From<archive_codec::error::DecodeError> for LedgerError {
    fn from(err: archive_codec::error::DecodeError) -> Self {
        LedgerError::Internal(err.to_string())
    }
}

/// Logs `message` at error level and aborts the process. Used for the handful of checks that are
/// not user errors but corruption signals: a diff realm whose net sum isn't zero, a balance map
/// that doesn't sum to total supply, a milestone bundle or a bundle member transaction missing
/// from a database that claims to hold it.
pub fn fatal(message: impl AsRef<str>) -> ! {
    log::error!("fatal invariant violation: {}", message.as_ref());
    std::process::abort()
}
