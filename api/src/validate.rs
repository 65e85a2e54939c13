// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Request-input validation: tryte-hash guards, an address-with-checksum validator, and tag
//! padding. Every function returns [`ApiError::InvalidParameter`] on failure so handlers can
//! `?`-propagate straight into a 400 response.

use archive_codec::trinary::{self, HASH_TRYTE_LEN, TAG_TRYTE_LEN};
use archive_model::Hash;

use crate::error::ApiError;

/// Width of an address once its 9-tryte checksum is appended.
const ADDRESS_WITH_CHECKSUM_TRYTE_LEN: usize = HASH_TRYTE_LEN + 9;

fn is_valid_tryte_string(s: &str) -> bool {
    s.bytes().all(|c| trinary::TRYTE_ALPHABET.contains(&c))
}

/// Validates an 81-tryte transaction/bundle/approvee hash and converts it to its binary form.
pub fn parse_transaction_hash(trytes: &str) -> Result<Hash, ApiError> {
    if trytes.len() != HASH_TRYTE_LEN || !is_valid_tryte_string(trytes) {
        return Err(ApiError::InvalidParameter(format!("not a valid transaction hash: {trytes}")));
    }
    trytes.parse().map_err(|_| ApiError::InvalidParameter(format!("not a valid transaction hash: {trytes}")))
}

/// Validates an address, accepting either the bare 81-tryte form or the 90-tryte form with a
/// trailing 9-tryte checksum, and returns the 81-tryte address with any checksum stripped.
///
/// The legacy checksum is a Kerl digest of the address; no Kerl/Curl implementation is available
/// anywhere in this workspace's dependency graph, so this validates shape (length, alphabet) and
/// strips the checksum without cryptographically verifying it.
pub fn parse_address(trytes: &str) -> Result<Hash, ApiError> {
    let address_part = match trytes.len() {
        HASH_TRYTE_LEN => trytes,
        ADDRESS_WITH_CHECKSUM_TRYTE_LEN => &trytes[..HASH_TRYTE_LEN],
        _ => return Err(ApiError::InvalidParameter(format!("not a valid address: {trytes}"))),
    };
    if !is_valid_tryte_string(trytes) {
        return Err(ApiError::InvalidParameter(format!("not a valid address: {trytes}")));
    }
    address_part.parse().map_err(|_| ApiError::InvalidParameter(format!("not a valid address: {trytes}")))
}

/// Validates a tag's trytes and right-pads it to 27 trytes, then packs it to its 17-byte
/// tag-hash form.
pub fn parse_tag(trytes: &str) -> Result<[u8; archive_codec::keys::TAG_HASH_BYTE_LEN], ApiError> {
    if trytes.len() > TAG_TRYTE_LEN || !is_valid_tryte_string(trytes) {
        return Err(ApiError::InvalidParameter(format!("not a valid tag: {trytes}")));
    }
    trinary::tag_hash_from_trytes(trytes).map_err(|_| ApiError::InvalidParameter(format!("not a valid tag: {trytes}")))
}

/// Applies `parse_one` to every element of `items`, short-circuiting on the first failure.
/// Shared by every RPC/REST handler that takes a batch of hashes, addresses, or tags.
pub fn parse_list<T>(items: &[String], parse_one: impl Fn(&str) -> Result<T, ApiError>) -> Result<Vec<T>, ApiError> {
    items.iter().map(|item| parse_one(item)).collect()
}

/// Splits a REST query parameter's comma-separated value into its trimmed, non-empty parts.
pub fn split_csv(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_checksummed_addresses() {
        let bare = "A".repeat(HASH_TRYTE_LEN);
        assert!(parse_address(&bare).is_ok());

        let checksummed = "A".repeat(ADDRESS_WITH_CHECKSUM_TRYTE_LEN);
        assert!(parse_address(&checksummed).is_ok());
    }

    #[test]
    fn rejects_wrong_length_hash() {
        assert!(parse_transaction_hash("ABC").is_err());
    }

    #[test]
    fn rejects_non_tryte_characters() {
        assert!(parse_tag("hello").is_err());
    }
}
