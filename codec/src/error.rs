// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failures that can occur while decoding a persisted record or converting between the trinary
/// and binary hash surfaces.
///
/// All variants here are "this byte buffer did not have the shape the schema promises" failures;
/// callers decide whether that is a user-facing `invalid_parameter` or a `fatal` corruption
/// signal, since the codec layer itself has no notion of request context.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected a record of exactly {expected} bytes, found {found}")]
    UnexpectedLength { expected: usize, found: usize },

    #[error("transaction metadata record had length {found}, which is neither the short (17) nor the full (168) form")]
    AmbiguousMetadataLength { found: usize },

    #[error("tryte string had invalid length {found}, expected {expected}")]
    InvalidTryteLength { expected: usize, found: usize },

    #[error("byte {0:#04x} is not a valid tryte-encoding nibble")]
    InvalidTryte(u8),

    #[error("character '{0}' is not a valid tryte alphabet character")]
    InvalidTryteChar(char),

    #[error("integer trit field overflowed its declared width")]
    TritIntegerOverflow,
}
