//! Token parsing.

use zeroize::Zeroize;

use crate::base62;
use crate::checksum::{CHECKSUM_LEN, checksum, checksums_equal};
use crate::payload::CURRENT_VERSION;

/// Separator between the prefix and the encoded payload.
pub const SEPARATOR: char = '_';

/// Parsed components from a token string.
///
/// Treat the contents as a black box; most callers only need
/// [`TokenGenerator::is_token_string`](crate::TokenGenerator::is_token_string).
#[derive(Debug, PartialEq, Eq)]
pub struct TokenContents {
    /// The prefix without the separator.
    pub prefix: String,
    /// Payload version byte.
    pub version: u8,
    /// Checksum carried by the token.
    pub supplied_checksum: [u8; CHECKSUM_LEN],
    /// Checksum recomputed over the secret and version.
    pub actual_checksum: [u8; CHECKSUM_LEN],
    /// True when the payload is non-empty and both checksums match.
    pub is_syntactically_valid: bool,
    /// The entropy bytes, without the version.
    secret: Vec<u8>,
}

impl TokenContents {
    /// Get a reference to the secret bytes.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl Drop for TokenContents {
    fn drop(&mut self) {
        // Clear secret from memory when dropped
        self.secret.zeroize();
    }
}

/// Parse a token string into its components.
///
/// # Arguments
/// * `token` - The full token string (e.g., "test_R67NJs98...")
/// * `expected_prefix` - If given, tokens with any other prefix are rejected
///
/// # Returns
/// * `Some(TokenContents)` when the token has the right shape and a supported
///   version. A checksum mismatch is reported through
///   [`TokenContents::is_syntactically_valid`].
/// * `None` for anything malformed: separator count, non-base62 characters,
///   a payload too short to hold a checksum, or an unsupported version.
pub fn parse(token: &str, expected_prefix: Option<&str>) -> Option<TokenContents> {
    let (prefix, encoded) = token.split_once(SEPARATOR)?;
    if encoded.contains(SEPARATOR) {
        return None;
    }

    if expected_prefix.is_some_and(|expected| expected != prefix) {
        return None;
    }

    let mut decoded = base62::decode_unsafe(encoded)?;
    if decoded.len() <= CHECKSUM_LEN {
        decoded.zeroize();
        return None;
    }

    let (secret_and_version, supplied) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    let mut supplied_checksum = [0u8; CHECKSUM_LEN];
    supplied_checksum.copy_from_slice(supplied);
    let actual_checksum = checksum(secret_and_version);

    let is_syntactically_valid =
        !secret_and_version.is_empty() && checksums_equal(&supplied_checksum, &actual_checksum);

    let Some((&version, secret)) = secret_and_version.split_last() else {
        decoded.zeroize();
        return None;
    };
    if version != CURRENT_VERSION {
        decoded.zeroize();
        return None;
    }

    let contents = TokenContents {
        prefix: prefix.to_string(),
        version,
        supplied_checksum,
        actual_checksum,
        is_syntactically_valid,
        secret: secret.to_vec(),
    };
    decoded.zeroize();
    Some(contents)
}
