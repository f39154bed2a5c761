//! Binary token payload: `entropy || version || checksum`.

use crate::checksum::{CHECKSUM_LEN, checksum};

/// The only payload version currently issued and accepted.
pub const CURRENT_VERSION: u8 = 0;

/// Bytes a payload adds on top of its entropy (version + checksum).
pub const PAYLOAD_OVERHEAD: usize = 1 + CHECKSUM_LEN;

/// Assemble a payload from entropy and a version byte.
///
/// The checksum covers the entropy and the version byte and is appended
/// big-endian. The result is `entropy.len() + 5` bytes long.
pub fn build_payload(entropy: &[u8], version: u8) -> Vec<u8> {
    let mut payload = Vec::with_capacity(entropy.len() + PAYLOAD_OVERHEAD);
    payload.extend_from_slice(entropy);
    payload.push(version);

    let checksum = checksum(&payload);
    payload.extend_from_slice(&checksum);

    debug_assert_eq!(payload.len(), entropy.len() + PAYLOAD_OVERHEAD);
    payload
}
