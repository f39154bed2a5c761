//! Configuration for token generation and validation.

use crate::error::ConfigError;

/// Entropy bytes used when none are configured.
pub const DEFAULT_ENTROPY_BYTES: usize = 32;
/// Smallest accepted entropy byte count.
pub const MIN_ENTROPY_BYTES: usize = 21;
/// Largest accepted entropy byte count. Bounds token length and the
/// quadratic cost of the base62 conversion.
pub const MAX_ENTROPY_BYTES: usize = 199;

/// Configuration for a [`TokenGenerator`](crate::TokenGenerator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Prefix for token strings without the trailing underscore
    /// (e.g. "test" produces "test_...").
    pub prefix: String,
    /// Number of random bytes in each token.
    pub entropy_bytes: usize,
}

impl GeneratorConfig {
    /// Create a new config with the given prefix and the default entropy.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entropy_bytes: DEFAULT_ENTROPY_BYTES,
        }
    }

    /// Set the number of random bytes per token.
    pub fn with_entropy_bytes(mut self, entropy_bytes: usize) -> Self {
        self.entropy_bytes = entropy_bytes;
        self
    }

    /// Check the prefix syntax and entropy bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix(&self.prefix)?;

        if !(MIN_ENTROPY_BYTES..=MAX_ENTROPY_BYTES).contains(&self.entropy_bytes) {
            return Err(ConfigError::EntropyBytesOutOfRange {
                value: self.entropy_bytes,
                min: MIN_ENTROPY_BYTES,
                max: MAX_ENTROPY_BYTES,
            });
        }

        Ok(())
    }
}

/// A prefix must be non-empty ASCII alphanumerics. `_` is the token
/// separator, so it may not appear anywhere in the prefix.
fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::MissingPrefix);
    }

    if !prefix.bytes().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }

    Ok(())
}
