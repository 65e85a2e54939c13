// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Byte-exact decoders for every fixed-shape persisted record except the transaction payload
//! itself (see [`crate::transaction`]). All integers are little-endian except solid entry
//! points, which the legacy writer wrote big-endian and which this decoder must follow verbatim.

use crate::{bitmask::{BundleFlags, SnapshotFlags, TransactionFlags}, error::DecodeError, trinary::HASH_BYTE_LEN};

fn take<'a>(data: &'a [u8], offset: usize, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
    data.get(offset..offset + len).ok_or_else(|| DecodeError::UnexpectedLength {
        expected: offset + len,
        found: data.len(),
    }).map(|s| {
        let _ = field;
        s
    })
}

fn hash_at(data: &[u8], offset: usize) -> Result<[u8; HASH_BYTE_LEN], DecodeError> {
    let mut out = [0u8; HASH_BYTE_LEN];
    out.copy_from_slice(take(data, offset, HASH_BYTE_LEN, "hash")?);
    Ok(out)
}

fn u32_le_at(data: &[u8], offset: usize) -> Result<u32, DecodeError> {
    Ok(u32::from_le_bytes(take(data, offset, 4, "u32")?.try_into().unwrap()))
}

fn u32_be_at(data: &[u8], offset: usize) -> Result<u32, DecodeError> {
    Ok(u32::from_be_bytes(take(data, offset, 4, "u32be")?.try_into().unwrap()))
}

fn u64_le_at(data: &[u8], offset: usize) -> Result<u64, DecodeError> {
    Ok(u64::from_le_bytes(take(data, offset, 8, "u64")?.try_into().unwrap()))
}

fn i64_le_at(data: &[u8], offset: usize) -> Result<i64, DecodeError> {
    Ok(i64::from_le_bytes(take(data, offset, 8, "i64")?.try_into().unwrap()))
}

/// A decoded bundle record.
#[derive(Debug, Clone)]
pub struct BundleRecord {
    pub flags: BundleFlags,
    pub last_index: u64,
    pub bundle_hash: [u8; HASH_BYTE_LEN],
    pub head_tx: [u8; HASH_BYTE_LEN],
    pub tx_hashes: Vec<[u8; HASH_BYTE_LEN]>,
    pub ledger_changes: Vec<([u8; HASH_BYTE_LEN], i64)>,
}

impl BundleRecord {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let flags = BundleFlags(*take(data, 0, 1, "metadata")?.first().unwrap());
        let last_index = u64_le_at(data, 1)?;
        let tx_count = u64_le_at(data, 9)? as usize;
        let ledger_changes_count = u64_le_at(data, 17)? as usize;
        let bundle_hash = hash_at(data, 25)?;
        let head_tx = hash_at(data, 74)?;

        let mut offset = 123;
        let mut tx_hashes = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            tx_hashes.push(hash_at(data, offset)?);
            offset += HASH_BYTE_LEN;
        }

        let mut ledger_changes = Vec::with_capacity(ledger_changes_count);
        for _ in 0..ledger_changes_count {
            let address = hash_at(data, offset)?;
            offset += HASH_BYTE_LEN;
            let balance = i64_le_at(data, offset)?;
            offset += 8;
            ledger_changes.push((address, balance));
        }

        Ok(Self {
            flags,
            last_index,
            bundle_hash,
            head_tx,
            tx_hashes,
            ledger_changes,
        })
    }

    pub fn is_value_spam(&self) -> bool {
        self.ledger_changes.is_empty()
    }
}

/// Length of the full transaction-metadata record (21-byte header + 3 denormalized hashes).
pub const FULL_TX_METADATA_LEN: usize = 21 + 3 * HASH_BYTE_LEN;
/// Length of the legacy short transaction-metadata header (no denormalized hashes at all).
pub const SHORT_TX_METADATA_LEN: usize = 17;

/// A decoded transaction-metadata record. See the module docs on the short/full ambiguity.
#[derive(Debug, Clone)]
pub struct TransactionMetadataRecord {
    pub flags: TransactionFlags,
    pub solid_timestamp: u32,
    pub confirmation_index: u32,
    pub youngest_root_snapshot_index: u32,
    pub oldest_root_snapshot_index: u32,
    pub calculated_root_snapshot_index: u32,
    pub trunk: Option<[u8; HASH_BYTE_LEN]>,
    pub branch: Option<[u8; HASH_BYTE_LEN]>,
    pub bundle: Option<[u8; HASH_BYTE_LEN]>,
}

impl TransactionMetadataRecord {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::UnexpectedLength {
                expected: SHORT_TX_METADATA_LEN,
                found: 0,
            });
        }
        let flags = TransactionFlags(data[0]);

        // Any of these reads silently yields 0 when `data` is too short for that field. This
        // is deliberate: intermediate-length records (strictly between the short and full
        // forms) are replicated as "whatever integer header fields fit, no denormalized
        // hashes" rather than rejected, matching the legacy reader's observed fallback.
        let read_u32 = |offset: usize| -> u32 {
            data.get(offset..offset + 4)
                .map(|s| u32::from_le_bytes(s.try_into().unwrap()))
                .unwrap_or(0)
        };

        let solid_timestamp = read_u32(1);
        let confirmation_index = read_u32(5);
        let youngest_root_snapshot_index = read_u32(9);
        let oldest_root_snapshot_index = read_u32(13);
        let calculated_root_snapshot_index = read_u32(17);

        let (trunk, branch, bundle) = if data.len() >= FULL_TX_METADATA_LEN {
            let off = 21;
            (
                Some(hash_at(data, off)?),
                Some(hash_at(data, off + HASH_BYTE_LEN)?),
                Some(hash_at(data, off + 2 * HASH_BYTE_LEN)?),
            )
        } else {
            (None, None, None)
        };

        Ok(Self {
            flags,
            solid_timestamp,
            confirmation_index,
            youngest_root_snapshot_index,
            oldest_root_snapshot_index,
            calculated_root_snapshot_index,
            trunk,
            branch,
            bundle,
        })
    }
}

/// Exact length of the snapshot-info record.
pub const SNAPSHOT_INFO_LEN: usize = HASH_BYTE_LEN * 2 + 4 + 4 + 4 + 8 + 1;

/// A decoded snapshot-info record.
#[derive(Debug, Clone)]
pub struct SnapshotInfoRecord {
    pub coordinator: [u8; HASH_BYTE_LEN],
    pub snapshot_hash: [u8; HASH_BYTE_LEN],
    pub snapshot_index: u32,
    pub entry_point_index: u32,
    pub pruning_index: u32,
    pub timestamp: i64,
    pub flags: SnapshotFlags,
}

impl SnapshotInfoRecord {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != SNAPSHOT_INFO_LEN {
            return Err(DecodeError::UnexpectedLength {
                expected: SNAPSHOT_INFO_LEN,
                found: data.len(),
            });
        }
        let coordinator = hash_at(data, 0)?;
        let snapshot_hash = hash_at(data, HASH_BYTE_LEN)?;
        let snapshot_index = u32_le_at(data, HASH_BYTE_LEN * 2)?;
        let entry_point_index = u32_le_at(data, HASH_BYTE_LEN * 2 + 4)?;
        let pruning_index = u32_le_at(data, HASH_BYTE_LEN * 2 + 8)?;
        let timestamp = i64_le_at(data, HASH_BYTE_LEN * 2 + 12)?;
        let flags = SnapshotFlags(*take(data, HASH_BYTE_LEN * 2 + 20, 1, "metadata")?.first().unwrap());

        Ok(Self {
            coordinator,
            snapshot_hash,
            snapshot_index,
            entry_point_index,
            pruning_index,
            timestamp,
            flags,
        })
    }
}

/// Width of one solid-entry-point record: `hash(49) ‖ milestoneIndex(u32 big-endian)`.
const SOLID_ENTRY_POINT_RECORD_LEN: usize = HASH_BYTE_LEN + 4;

/// Decodes the solid-entry-points blob into `(tx_hash, milestone_index)` pairs.
pub fn decode_solid_entry_points(data: &[u8]) -> Result<Vec<([u8; HASH_BYTE_LEN], u32)>, DecodeError> {
    if data.len() % SOLID_ENTRY_POINT_RECORD_LEN != 0 {
        return Err(DecodeError::UnexpectedLength {
            expected: (data.len() / SOLID_ENTRY_POINT_RECORD_LEN + 1) * SOLID_ENTRY_POINT_RECORD_LEN,
            found: data.len(),
        });
    }
    let mut out = Vec::with_capacity(data.len() / SOLID_ENTRY_POINT_RECORD_LEN);
    for chunk in data.chunks_exact(SOLID_ENTRY_POINT_RECORD_LEN) {
        let hash = hash_at(chunk, 0)?;
        // Big-endian: the one deliberate exception to this codec's little-endian convention.
        let index = u32_be_at(chunk, HASH_BYTE_LEN)?;
        out.push((hash, index));
    }
    Ok(out)
}

/// Decodes a milestone record's value (the milestone bundle's tail hash).
pub fn decode_milestone_tail_hash(data: &[u8]) -> Result<[u8; HASH_BYTE_LEN], DecodeError> {
    if data.len() != HASH_BYTE_LEN {
        return Err(DecodeError::UnexpectedLength {
            expected: HASH_BYTE_LEN,
            found: data.len(),
        });
    }
    hash_at(data, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle_bytes() -> Vec<u8> {
        let mut v = Vec::new();
        v.push(0b0000_0010); // valid
        v.extend_from_slice(&1u64.to_le_bytes()); // lastIndex
        v.extend_from_slice(&2u64.to_le_bytes()); // txCount
        v.extend_from_slice(&1u64.to_le_bytes()); // ledgerChangesCount
        v.extend_from_slice(&[7u8; HASH_BYTE_LEN]); // bundleHash
        v.extend_from_slice(&[8u8; HASH_BYTE_LEN]); // headTx
        v.extend_from_slice(&[1u8; HASH_BYTE_LEN]); // tx 0 (tail)
        v.extend_from_slice(&[2u8; HASH_BYTE_LEN]); // tx 1 (head)
        v.extend_from_slice(&[3u8; HASH_BYTE_LEN]); // ledger change address
        v.extend_from_slice(&(-100i64).to_le_bytes());
        v
    }

    #[test]
    fn decodes_bundle_record() {
        let bytes = sample_bundle_bytes();
        let bundle = BundleRecord::decode(&bytes).unwrap();
        assert!(bundle.flags.valid());
        assert_eq!(bundle.tx_hashes.len(), 2);
        assert_eq!(bundle.ledger_changes, vec![([3u8; HASH_BYTE_LEN], -100)]);
        assert!(!bundle.is_value_spam());
    }

    #[test]
    fn decodes_short_tx_metadata() {
        let mut bytes = vec![0b0001_0001]; // solid + isTail
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&42u32.to_le_bytes()); // confirmationIndex
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(bytes.len(), SHORT_TX_METADATA_LEN);

        let meta = TransactionMetadataRecord::decode(&bytes).unwrap();
        assert_eq!(meta.confirmation_index, 42);
        assert!(meta.trunk.is_none());
    }

    #[test]
    fn decodes_full_tx_metadata() {
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&[1u8; HASH_BYTE_LEN]);
        bytes.extend_from_slice(&[2u8; HASH_BYTE_LEN]);
        bytes.extend_from_slice(&[3u8; HASH_BYTE_LEN]);
        assert_eq!(bytes.len(), FULL_TX_METADATA_LEN);

        let meta = TransactionMetadataRecord::decode(&bytes).unwrap();
        assert_eq!(meta.confirmation_index, 7);
        assert_eq!(meta.trunk, Some([1u8; HASH_BYTE_LEN]));
        assert_eq!(meta.bundle, Some([3u8; HASH_BYTE_LEN]));
    }

    #[test]
    fn snapshot_info_requires_exact_length() {
        assert!(SnapshotInfoRecord::decode(&[0u8; 10]).is_err());
    }

    #[test]
    fn solid_entry_points_use_big_endian_index() {
        let mut data = vec![5u8; HASH_BYTE_LEN];
        data.extend_from_slice(&1u32.to_be_bytes());
        let decoded = decode_solid_entry_points(&data).unwrap();
        assert_eq!(decoded, vec![([5u8; HASH_BYTE_LEN], 1)]);
    }
}
