//! CRC-32 checksum for token payloads.
//!
//! The checksum only detects accidental corruption (typos, truncation). It
//! offers no protection against deliberate tampering.

use subtle::ConstantTimeEq;

/// Length of a checksum in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Compute the CRC-32 (IEEE, zlib variant) of `data` as big-endian bytes.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    crc32fast::hash(data).to_be_bytes()
}

/// Compare two checksums byte for byte.
///
/// Lengths are compared first; equal-length inputs are compared in full.
pub fn checksums_equal(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
