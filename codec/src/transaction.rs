// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Decodes the transaction payload's trinary layout. The retrieved reference sources cover the
//! database/server layers but not the legacy `compressed` payload codec, so this module decodes
//! the well-known public pre-Chrysalis transaction trit layout directly against `bee_ternary`,
//! rather than guessing at an undocumented compression scheme.

use bee_ternary::{T1B1Buf, TritBuf};

use crate::{error::DecodeError, trinary, trinary::HASH_BYTE_LEN};

/// Field widths, in trits, in on-wire order.
mod width {
    pub const SIGNATURE_MESSAGE_FRAGMENT: usize = 6561;
    pub const ADDRESS: usize = 243;
    pub const VALUE: usize = 81;
    pub const OBSOLETE_TAG: usize = 81;
    pub const TIMESTAMP: usize = 27;
    pub const CURRENT_INDEX: usize = 27;
    pub const LAST_INDEX: usize = 27;
    pub const BUNDLE: usize = 243;
    pub const TRUNK: usize = 243;
    pub const BRANCH: usize = 243;
    pub const TAG: usize = 81;
    pub const ATTACHMENT_TIMESTAMP: usize = 27;
    pub const ATTACHMENT_TIMESTAMP_LOWER_BOUND: usize = 27;
    pub const ATTACHMENT_TIMESTAMP_UPPER_BOUND: usize = 27;
    pub const NONCE: usize = 81;
}

/// Total trit width of one transaction payload (`8019`), i.e. [`trinary::TRANSACTION_TRYTE_LEN`] `* 3`.
pub const TRANSACTION_TRIT_LEN: usize = width::SIGNATURE_MESSAGE_FRAGMENT
    + width::ADDRESS
    + width::VALUE
    + width::OBSOLETE_TAG
    + width::TIMESTAMP
    + width::CURRENT_INDEX
    + width::LAST_INDEX
    + width::BUNDLE
    + width::TRUNK
    + width::BRANCH
    + width::TAG
    + width::ATTACHMENT_TIMESTAMP
    + width::ATTACHMENT_TIMESTAMP_LOWER_BOUND
    + width::ATTACHMENT_TIMESTAMP_UPPER_BOUND
    + width::NONCE;

/// The flat, decoded transaction record. `signature_message_fragment` is kept as trytes rather
/// than decoded further since the service never interprets its contents.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub signature_message_fragment: String,
    pub address: [u8; HASH_BYTE_LEN],
    pub value: i64,
    pub obsolete_tag: String,
    pub timestamp: i64,
    pub current_index: u64,
    pub last_index: u64,
    /// Bundle hash, still tryte-encoded. Converting this (and `trunk`/`branch`) to the binary
    /// hash surface is deferred to the object model, which memoizes the conversion lazily —
    /// many callers only ever need the raw transaction fields, not the derived hash.
    pub bundle: String,
    pub trunk: String,
    pub branch: String,
    pub tag: String,
    pub attachment_timestamp: i64,
    pub attachment_timestamp_lower_bound: i64,
    pub attachment_timestamp_upper_bound: i64,
    pub nonce: String,
}

impl TransactionRecord {
    pub fn is_tail(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_head(&self) -> bool {
        self.current_index == self.last_index
    }

    pub fn is_value(&self) -> bool {
        self.value != 0
    }

    /// The effective confirmation timestamp: `attachment_timestamp` in milliseconds if set,
    /// else the coarse `timestamp` field (already in seconds).
    pub fn effective_timestamp_secs(&self) -> i64 {
        if self.attachment_timestamp != 0 {
            self.attachment_timestamp / 1000
        } else {
            self.timestamp
        }
    }

    /// Decodes a transaction from its 2673-tryte payload.
    pub fn decode_from_trytes(trytes: &str) -> Result<Self, DecodeError> {
        if trytes.len() != trinary::TRANSACTION_TRYTE_LEN {
            return Err(DecodeError::InvalidTryteLength {
                expected: trinary::TRANSACTION_TRYTE_LEN,
                found: trytes.len(),
            });
        }
        let trits = trinary::trytes_to_trits(trytes)?;
        if trits.len() != TRANSACTION_TRIT_LEN {
            return Err(DecodeError::UnexpectedLength {
                expected: TRANSACTION_TRIT_LEN,
                found: trits.len(),
            });
        }

        let mut cursor = Cursor::new(&trits);

        let signature_message_fragment = cursor.take_trytes(width::SIGNATURE_MESSAGE_FRAGMENT);
        let address = cursor.take_hash(width::ADDRESS);
        let value = cursor.take_i64(width::VALUE)?;
        let obsolete_tag = cursor.take_trytes(width::OBSOLETE_TAG);
        let timestamp = cursor.take_i64(width::TIMESTAMP)?;
        let current_index = cursor.take_i64(width::CURRENT_INDEX)? as u64;
        let last_index = cursor.take_i64(width::LAST_INDEX)? as u64;
        let bundle = cursor.take_trytes(width::BUNDLE);
        let trunk = cursor.take_trytes(width::TRUNK);
        let branch = cursor.take_trytes(width::BRANCH);
        let tag = cursor.take_trytes(width::TAG);
        let attachment_timestamp = cursor.take_i64(width::ATTACHMENT_TIMESTAMP)?;
        let attachment_timestamp_lower_bound = cursor.take_i64(width::ATTACHMENT_TIMESTAMP_LOWER_BOUND)?;
        let attachment_timestamp_upper_bound = cursor.take_i64(width::ATTACHMENT_TIMESTAMP_UPPER_BOUND)?;
        let nonce = cursor.take_trytes(width::NONCE);

        Ok(Self {
            signature_message_fragment,
            address,
            value,
            obsolete_tag,
            timestamp,
            current_index,
            last_index,
            bundle,
            trunk,
            branch,
            tag,
            attachment_timestamp,
            attachment_timestamp_lower_bound,
            attachment_timestamp_upper_bound,
            nonce,
        })
    }
}

/// Walks a trit buffer field by field, decoded offsets tracked internally so the call site in
/// [`TransactionRecord::decode_from_trytes`] reads the same order as the on-wire layout.
struct Cursor<'a> {
    trits: &'a TritBuf<T1B1Buf>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(trits: &'a TritBuf<T1B1Buf>) -> Self {
        Self { trits, pos: 0 }
    }

    fn take_slice(&mut self, width: usize) -> TritBuf<T1B1Buf> {
        let slice: TritBuf<T1B1Buf> = self.trits.iter().skip(self.pos).take(width).collect();
        self.pos += width;
        slice
    }

    fn take_trytes(&mut self, width: usize) -> String {
        trinary::trits_to_trytes(&self.take_slice(width))
    }

    fn take_hash(&mut self, width: usize) -> [u8; HASH_BYTE_LEN] {
        let slice = self.take_slice(width);
        if width == HASH_BYTE_LEN * 3 {
            trinary::trits_to_hash_bytes(&slice)
        } else {
            // Only ever called with 243-trit fields in this layout; defend against a future
            // caller passing a different width.
            let mut padded = slice;
            while padded.len() < HASH_BYTE_LEN * 3 {
                padded.push(bee_ternary::Btrit::Zero);
            }
            trinary::trits_to_hash_bytes(&padded)
        }
    }

    fn take_i64(&mut self, width: usize) -> Result<i64, DecodeError> {
        let slice = self.take_slice(width);
        let values: Vec<bee_ternary::Btrit> = slice.iter().collect();
        trinary::trits_to_i64(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_nines_transaction_trytes() -> String {
        "9".repeat(trinary::TRANSACTION_TRYTE_LEN)
    }

    #[test]
    fn empty_transaction_decodes_to_zeroed_fields() {
        let record = TransactionRecord::decode_from_trytes(&all_nines_transaction_trytes()).unwrap();
        assert_eq!(record.value, 0);
        assert_eq!(record.current_index, 0);
        assert!(record.is_tail());
        assert!(!record.is_value());
    }

    #[test]
    fn rejects_wrong_length_payload() {
        assert!(TransactionRecord::decode_from_trytes("ABC").is_err());
    }

    #[test]
    fn effective_timestamp_prefers_attachment_timestamp() {
        let mut record = TransactionRecord::decode_from_trytes(&all_nines_transaction_trytes()).unwrap();
        record.timestamp = 100;
        record.attachment_timestamp = 5000;
        assert_eq!(record.effective_timestamp_secs(), 5);
        record.attachment_timestamp = 0;
        assert_eq!(record.effective_timestamp_secs(), 100);
    }
}
