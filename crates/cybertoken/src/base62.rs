//! Arbitrary-length base62 codec.
//!
//! Bytes are treated as one big-endian unsigned integer and converted digit
//! by digit, so the codec works on buffers of any length without a native
//! big-integer type. Leading zero bytes have no weight in that integer, so
//! each one is carried separately as a leading `'0'` character.

use crate::error::DecodeError;

/// Base62 alphabet. Upper case comes before lower case; the ordering is part
/// of the token format.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u32 = ALPHABET.len() as u32;
const LEADER: u8 = ALPHABET[0];
const INVALID: u8 = 0xff;

/// Inverse of [`ALPHABET`], indexed by input byte.
static BASE_MAP: [u8; 256] = build_base_map();

const fn build_base_map() -> [u8; 256] {
    let mut map = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        map[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    map
}

/// Big-endian digit buffer used as the accumulator of a base conversion.
///
/// The buffer holds `ceil(n * ln(from) / ln(to) + 1)` digits for an input of
/// `n` digits in base `from`. An `n`-digit number needs at most
/// `ceil(n * ln(from) / ln(to))` digits in base `to`, so the extra slot covers
/// any rounding in the float estimate.
struct DigitBuffer {
    digits: Vec<u8>,
    base: u32,
    /// Number of trailing digits written so far.
    length: usize,
}

impl DigitBuffer {
    fn for_conversion(input_len: usize, from: u32, to: u32) -> Self {
        let size = (input_len as f64 * f64::from(from).ln() / f64::from(to).ln() + 1.0).ceil();
        Self {
            digits: vec![0; size as usize],
            base: to,
            length: 0,
        }
    }

    /// Apply `self = self * multiplier + digit`.
    fn mul_add(&mut self, multiplier: u32, digit: u32) {
        let mut carry = digit;
        let mut written = 0;
        for slot in self.digits.iter_mut().rev() {
            if carry == 0 && written >= self.length {
                break;
            }
            carry += multiplier * u32::from(*slot);
            *slot = (carry % self.base) as u8;
            carry /= self.base;
            written += 1;
        }
        assert_eq!(carry, 0, "non-zero carry: digit buffer undersized");
        self.length = written;
    }

    /// Written digits with leading zeros removed.
    fn significant(&self) -> &[u8] {
        let written = &self.digits[self.digits.len() - self.length..];
        let first = written
            .iter()
            .position(|&d| d != 0)
            .unwrap_or(written.len());
        &written[first..]
    }
}

/// Encode bytes as a base62 string.
///
/// Each leading zero byte becomes one leading `'0'`. Empty input encodes to
/// an empty string.
pub fn encode(source: impl AsRef<[u8]>) -> String {
    let source = source.as_ref();

    let zeroes = source.iter().take_while(|&&b| b == 0).count();
    let rest = &source[zeroes..];

    let mut digits = DigitBuffer::for_conversion(rest.len(), 256, BASE);
    for &byte in rest {
        digits.mul_add(256, u32::from(byte));
    }

    let significant = digits.significant();
    let mut encoded = String::with_capacity(zeroes + significant.len());
    encoded.extend(std::iter::repeat_n(LEADER as char, zeroes));
    encoded.extend(significant.iter().map(|&d| ALPHABET[d as usize] as char));
    encoded
}

/// Decode a base62 string, returning `None` if it contains any character
/// outside [`ALPHABET`].
///
/// Invalid input is an expected outcome here (e.g. when scanning arbitrary
/// strings), so it is not reported as an error.
pub fn decode_unsafe(source: &str) -> Option<Vec<u8>> {
    let source = source.as_bytes();

    let zeroes = source.iter().take_while(|&&c| c == LEADER).count();
    let rest = &source[zeroes..];

    let mut bytes = DigitBuffer::for_conversion(rest.len(), BASE, 256);
    for &c in rest {
        let value = BASE_MAP[c as usize];
        if value == INVALID {
            return None;
        }
        bytes.mul_add(BASE, u32::from(value));
    }

    let significant = bytes.significant();
    let mut decoded = Vec::with_capacity(zeroes + significant.len());
    decoded.resize(zeroes, 0);
    decoded.extend_from_slice(significant);
    Some(decoded)
}

/// Decode a base62 string, failing on characters outside [`ALPHABET`].
pub fn decode(source: &str) -> Result<Vec<u8>, DecodeError> {
    decode_unsafe(source).ok_or(DecodeError)
}

/// Returns true if `c` is a base62 digit.
pub fn is_base62_char(c: u8) -> bool {
    BASE_MAP[c as usize] != INVALID
}
