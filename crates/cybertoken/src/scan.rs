//! Secret scanning: locate valid tokens inside arbitrary text.

use crate::generator::TokenGenerator;

/// A token found in scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch<'t> {
    /// Byte offset of the first character of the token.
    pub start: usize,
    /// Byte offset one past the last character of the token.
    pub end: usize,
    /// The token itself.
    pub token: &'t str,
}

/// Find every syntactically valid token of `generator`'s prefix in `text`.
///
/// Candidates are located with the generator's pattern and then fully
/// validated, so false positives require a checksum collision.
pub fn scan<'t>(generator: &TokenGenerator, text: &'t str) -> Vec<TokenMatch<'t>> {
    let matches: Vec<TokenMatch<'t>> = generator
        .pattern()
        .candidates(text)
        .filter(|&(_, candidate)| generator.is_token_string(candidate))
        .map(|(start, token)| TokenMatch {
            start,
            end: start + token.len(),
            token,
        })
        .collect();

    log::debug!(
        "Scanned {} bytes for prefix {}: {} token(s) found",
        text.len(),
        generator.prefix(),
        matches.len()
    );
    matches
}
