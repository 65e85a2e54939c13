// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use tokio_util::sync::CancellationToken;

use crate::error::LedgerError;

/// Checked at each outer iteration step of a long-running traversal. Returns
/// [`LedgerError::OperationAborted`] once `token` is cancelled, e.g. because the client
/// connection dropped mid-request.
pub fn check(token: &CancellationToken) -> Result<(), LedgerError> {
    if token.is_cancelled() {
        Err(LedgerError::OperationAborted)
    } else {
        Ok(())
    }
}
