// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use archive_codec::{error::DecodeError, records};

use crate::hash::Hash;

/// The set of transaction hashes that bound tangle traversal, each annotated with the milestone
/// index it was marked solid at. Decoded once from the fixed-key blob and frozen; membership
/// checks are expected to run on every traversal step, so this is a `HashMap` rather than a
/// linear scan of the decoded records.
#[derive(Debug, Clone)]
pub struct SolidEntryPoints {
    points: HashMap<Hash, u32>,
}

impl SolidEntryPoints {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let decoded = records::decode_solid_entry_points(data)?;
        Ok(Self {
            points: decoded.into_iter().map(|(hash, index)| (Hash::from_bytes(hash), index)).collect(),
        })
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.points.contains_key(hash)
    }

    pub fn milestone_index_of(&self, hash: &Hash) -> Option<u32> {
        self.points.get(hash).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
