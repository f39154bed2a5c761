//! Syntactic pre-filter for token strings.

use crate::base62::is_base62_char;
use crate::parse::SEPARATOR;

/// Matches `^<prefix>_[0-9A-Za-z]+$` without decoding anything.
///
/// This is only a cheap first check; a match says nothing about the checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPattern {
    prefix_with_separator: String,
}

impl TokenPattern {
    /// Build the pattern for a prefix given without its trailing underscore.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix_with_separator: format!("{prefix}{SEPARATOR}"),
        }
    }

    /// The prefix followed by the separator, e.g. `"test_"`.
    pub fn prefix_with_separator(&self) -> &str {
        &self.prefix_with_separator
    }

    /// Returns true if `candidate` is the prefix followed by one or more
    /// base62 characters and nothing else.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate
            .strip_prefix(self.prefix_with_separator.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(is_base62_char))
    }

    /// Find candidate tokens in free text.
    ///
    /// A candidate starts at an occurrence of the prefix that is not glued to
    /// a preceding word character, and extends over the longest run of base62
    /// characters after the separator. Yields `(start, candidate)` pairs.
    pub fn candidates<'t>(&self, text: &'t str) -> impl Iterator<Item = (usize, &'t str)> {
        let bytes = text.as_bytes();
        text.match_indices(self.prefix_with_separator.as_str())
            .filter(move |&(start, _)| start == 0 || !is_word_byte(bytes[start - 1]))
            .filter_map(move |(start, _)| {
                let body = start + self.prefix_with_separator.len();
                let run = bytes[body..]
                    .iter()
                    .take_while(|&&c| is_base62_char(c))
                    .count();
                (run > 0).then(|| (start, &text[start..body + run]))
            })
    }
}

fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}
