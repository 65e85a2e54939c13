// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Conversions between the printable tryte surface (base-27, the identifier format clients send
//! and receive) and the binary trit/byte surfaces the store persists.
//!
//! Trit-level work reuses `bee_ternary`'s balanced-trit vocabulary (`Btrit`, `TritBuf<T1B1Buf>`)
//! for the parts of the crate's public API it already gets right — pushing/iterating individual
//! trits and converting a trit run to a signed integer. The tryte-alphabet mapping and the
//! 5-trits-per-byte hash packing are small enough, and specific enough to this on-disk format,
//! that they are written out directly rather than routed through an encoding buf type.

use bee_ternary::{Btrit, T1B1Buf, TritBuf};
use std::convert::TryFrom;

use crate::error::DecodeError;

/// Printable tryte alphabet, in value order: `'9'` is zero, `'A'..='M'` are `1..=13`,
/// `'N'..='Z'` are `-13..=-1`.
pub const TRYTE_ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Width of a printable transaction/bundle/address hash.
pub const HASH_TRYTE_LEN: usize = 81;

/// Width of the binary hash surface every 81-tryte hash packs down to.
pub const HASH_BYTE_LEN: usize = 49;

/// Width of a tag once padded, in trytes.
pub const TAG_TRYTE_LEN: usize = 27;

/// Width of a full transaction payload once decoded to trytes.
pub const TRANSACTION_TRYTE_LEN: usize = 2673;

/// The all-nines placeholder substituted for a missing transaction in a batched `getTrytes`.
pub fn empty_transaction_trytes() -> String {
    "9".repeat(TRANSACTION_TRYTE_LEN)
}

fn tryte_char_to_value(c: u8) -> Result<i8, DecodeError> {
    TRYTE_ALPHABET
        .iter()
        .position(|&a| a == c)
        .map(|i| if i < 14 { i as i8 } else { i as i8 - 27 })
        .ok_or(DecodeError::InvalidTryteChar(c as char))
}

fn value_to_tryte_char(v: i8) -> u8 {
    let idx = if v >= 0 { v as usize } else { (v + 27) as usize };
    TRYTE_ALPHABET[idx]
}

/// Balanced-ternary decomposition of a single tryte value (`-13..=13`) into 3 trits.
fn tryte_to_trits(v: i8) -> [Btrit; 3] {
    let mut out = [Btrit::Zero; 3];
    let mut n = v as i32;
    for slot in out.iter_mut() {
        let mut r = n % 3;
        if r > 1 {
            r -= 3;
        } else if r < -1 {
            r += 3;
        }
        *slot = match r {
            -1 => Btrit::NegOne,
            0 => Btrit::Zero,
            1 => Btrit::PlusOne,
            _ => unreachable!("balanced remainder is always in -1..=1"),
        };
        n = (n - r) / 3;
    }
    out
}

fn trits_to_tryte(t: [Btrit; 3]) -> i8 {
    let v = |b: Btrit| -> i32 {
        match b {
            Btrit::NegOne => -1,
            Btrit::Zero => 0,
            Btrit::PlusOne => 1,
        }
    };
    (v(t[0]) + 3 * v(t[1]) + 9 * v(t[2])) as i8
}

/// Decodes a tryte string into a flat run of balanced trits, 3 per tryte.
pub fn trytes_to_trits(trytes: &str) -> Result<TritBuf<T1B1Buf>, DecodeError> {
    let mut buf = TritBuf::<T1B1Buf>::zeros(0);
    for &c in trytes.as_bytes() {
        let value = tryte_char_to_value(c)?;
        for trit in tryte_to_trits(value) {
            buf.push(trit);
        }
    }
    Ok(buf)
}

/// Encodes a run of balanced trits (length a multiple of 3) back into a tryte string.
pub fn trits_to_trytes(trits: &TritBuf<T1B1Buf>) -> String {
    let mut out = String::with_capacity(trits.len() / 3);
    let mut chunk = [Btrit::Zero; 3];
    for (i, trit) in trits.iter().enumerate() {
        chunk[i % 3] = trit;
        if i % 3 == 2 {
            out.push(value_to_tryte_char(trits_to_tryte(chunk)) as char);
        }
    }
    out
}

/// Right-pads a tryte string with `'9'` (zero trits) up to `width`. A no-op if already that
/// length or longer.
pub fn pad_trytes(trytes: &str, width: usize) -> String {
    if trytes.len() >= width {
        trytes.to_string()
    } else {
        let mut padded = trytes.to_string();
        padded.push_str(&"9".repeat(width - trytes.len()));
        padded
    }
}

/// Packs a run of balanced trits into bytes, 5 trits per byte (the last byte may hold fewer),
/// matching `bee_ternary`'s `T5B1` group width. This is the general form behind both the
/// 243-trit hash packing and the 81-trit tag-hash packing.
pub fn pack_trits(trits: &TritBuf<T1B1Buf>) -> Vec<u8> {
    let values: Vec<i32> = trits
        .iter()
        .map(|b| match b {
            Btrit::NegOne => -1,
            Btrit::Zero => 0,
            Btrit::PlusOne => 1,
        })
        .collect();

    values
        .chunks(5)
        .map(|chunk| {
            let mut acc: i32 = 0;
            let mut scale = 1;
            for &v in chunk {
                acc += v * scale;
                scale *= 3;
            }
            (acc + 128) as u8
        })
        .collect()
}

/// Inverse of [`pack_trits`]; `trit_count` bounds how many trits to recover (trailing padding
/// trits in the final byte are discarded).
pub fn unpack_trits(bytes: &[u8], trit_count: usize) -> TritBuf<T1B1Buf> {
    let mut buf = TritBuf::<T1B1Buf>::zeros(0);
    'bytes: for &byte in bytes.iter() {
        let mut acc = byte as i32 - 128;
        for _ in 0..5 {
            if buf.len() >= trit_count {
                break 'bytes;
            }
            let mut r = acc % 3;
            if r > 1 {
                r -= 3;
            } else if r < -1 {
                r += 3;
            }
            buf.push(match r {
                -1 => Btrit::NegOne,
                0 => Btrit::Zero,
                1 => Btrit::PlusOne,
                _ => unreachable!(),
            });
            acc = (acc - r) / 3;
        }
    }
    buf
}

/// Packs 243 balanced trits (an 81-tryte hash) into the service's 49-byte binary hash surface.
pub fn trits_to_hash_bytes(trits: &TritBuf<T1B1Buf>) -> [u8; HASH_BYTE_LEN] {
    let packed = pack_trits(trits);
    let mut out = [0u8; HASH_BYTE_LEN];
    out.copy_from_slice(&packed[..HASH_BYTE_LEN]);
    out
}

/// Inverse of [`trits_to_hash_bytes`].
pub fn hash_bytes_to_trits(bytes: &[u8; HASH_BYTE_LEN]) -> TritBuf<T1B1Buf> {
    unpack_trits(bytes, HASH_TRYTE_LEN * 3)
}

/// Packs 81 balanced trits (a 27-tryte padded tag) into the 17-byte tag-hash surface used by
/// the tag index's key prefix.
pub fn tag_to_tag_hash_bytes(trits: &TritBuf<T1B1Buf>) -> [u8; crate::keys::TAG_HASH_BYTE_LEN] {
    let packed = pack_trits(trits);
    let mut out = [0u8; crate::keys::TAG_HASH_BYTE_LEN];
    out.copy_from_slice(&packed[..crate::keys::TAG_HASH_BYTE_LEN]);
    out
}

/// Right-pads a tag to 27 trytes and packs it into the 17-byte tag-hash key prefix.
pub fn tag_hash_from_trytes(tag: &str) -> Result<[u8; crate::keys::TAG_HASH_BYTE_LEN], DecodeError> {
    let padded = pad_trytes(tag, TAG_TRYTE_LEN);
    let trits = trytes_to_trits(&padded)?;
    Ok(tag_to_tag_hash_bytes(&trits))
}

/// Converts an 81-tryte printable hash into the 49-byte binary storage surface.
pub fn hash_from_trytes(trytes: &str) -> Result<[u8; HASH_BYTE_LEN], DecodeError> {
    if trytes.len() != HASH_TRYTE_LEN {
        return Err(DecodeError::InvalidTryteLength {
            expected: HASH_TRYTE_LEN,
            found: trytes.len(),
        });
    }
    let trits = trytes_to_trits(trytes)?;
    Ok(trits_to_hash_bytes(&trits))
}

/// Converts the 49-byte binary storage surface back into an 81-tryte printable hash.
pub fn hash_to_trytes(bytes: &[u8; HASH_BYTE_LEN]) -> String {
    trits_to_trytes(&hash_bytes_to_trits(bytes))
}

/// Decodes a signed integer field (e.g. `value`, `currentIndex`) from a trit range of a decoded
/// transaction, using `bee_ternary`'s balanced-trit-to-integer conversion.
pub fn trits_to_i64(trits: &[Btrit]) -> Result<i64, DecodeError> {
    let buf: TritBuf<T1B1Buf> = trits.iter().copied().collect();
    i64::try_from(buf.as_slice()).map_err(|_| DecodeError::TritIntegerOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tryte_alphabet_round_trips() {
        for &c in TRYTE_ALPHABET.iter() {
            let v = tryte_char_to_value(c).unwrap();
            assert_eq!(value_to_tryte_char(v), c);
        }
    }

    #[test]
    fn hash_round_trips_through_trits_and_bytes() {
        let trytes = "A".repeat(HASH_TRYTE_LEN);
        let bytes = hash_from_trytes(&trytes).unwrap();
        assert_eq!(bytes.len(), HASH_BYTE_LEN);
        let back = hash_to_trytes(&bytes);
        assert_eq!(back, trytes);
    }

    #[test]
    fn zero_hash_round_trips() {
        let trytes = "9".repeat(HASH_TRYTE_LEN);
        let bytes = hash_from_trytes(&trytes).unwrap();
        assert_eq!(bytes, [128u8; HASH_BYTE_LEN]);
        assert_eq!(hash_to_trytes(&bytes), trytes);
    }

    #[test]
    fn pad_trytes_extends_short_tags() {
        assert_eq!(pad_trytes("ABC", TAG_TRYTE_LEN).len(), TAG_TRYTE_LEN);
        assert_eq!(pad_trytes(&"9".repeat(TAG_TRYTE_LEN), TAG_TRYTE_LEN).len(), TAG_TRYTE_LEN);
    }

    #[test]
    fn rejects_wrong_length_hash() {
        assert!(hash_from_trytes("ABC").is_err());
    }
}
