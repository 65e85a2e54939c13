// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

use archive_ledger::error::LedgerError;

/// The dispatcher's own error taxonomy, a thin reclassification of [`LedgerError`] plus the
/// request-shape failures the ledger engine never sees (malformed JSON, unknown RPC command).
/// Maps 1:1 onto the HTTP status table: 400 invalid parameter, 404 not found, 500 internal/
/// aborted.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation aborted")]
    OperationAborted,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidParameter(msg) => ApiError::InvalidParameter(msg),
            LedgerError::NotFound(msg) => ApiError::NotFound(msg),
            LedgerError::OperationAborted => ApiError::OperationAborted,
            LedgerError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::OperationAborted => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::debug!("request failed: {self}");
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
