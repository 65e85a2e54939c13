// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use archive_codec::{error::DecodeError, records};

use crate::hash::Hash;

/// A milestone: its index (the realm key) and its bundle's tail hash (the realm value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    index: u32,
    tail_hash: Hash,
}

impl Milestone {
    pub fn decode(index: u32, value: &[u8]) -> Result<Self, DecodeError> {
        let tail_hash = records::decode_milestone_tail_hash(value)?;
        Ok(Self {
            index,
            tail_hash: Hash::from_bytes(tail_hash),
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn tail_hash(&self) -> Hash {
        self.tail_hash
    }
}
