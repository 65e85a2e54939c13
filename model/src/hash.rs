// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use archive_codec::{error::DecodeError, trinary};

/// A 49-byte opaque identifier: a transaction, bundle, address, or tag hash. Convertible to and
/// from its 81-tryte printable form; the binary form is what every store key actually carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; trinary::HASH_BYTE_LEN]);

impl Hash {
    pub fn from_bytes(bytes: [u8; trinary::HASH_BYTE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; trinary::HASH_BYTE_LEN] {
        &self.0
    }

    pub fn to_trytes(&self) -> String {
        trinary::hash_to_trytes(&self.0)
    }
}

impl FromStr for Hash {
    type Err = DecodeError;

    fn from_str(trytes: &str) -> Result<Self, Self::Err> {
        trinary::hash_from_trytes(trytes).map(Self)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_trytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_round_trip() {
        let trytes = "A".repeat(trinary::HASH_TRYTE_LEN);
        let hash: Hash = trytes.parse().unwrap();
        assert_eq!(hash.to_string(), trytes);
    }

    #[test]
    fn rejects_malformed_trytes() {
        assert!("not-valid-trytes".parse::<Hash>().is_err());
    }
}
