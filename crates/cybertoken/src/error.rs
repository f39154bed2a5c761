//! Error types for token operations.

use thiserror::Error;

/// Errors raised while building a [`TokenGenerator`](crate::TokenGenerator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Prefix is empty
    #[error("The prefix is required and must not be an empty string")]
    MissingPrefix,

    /// Prefix contains characters outside `[A-Za-z0-9]`
    #[error("Invalid prefix '{0}': only alphanumeric characters are allowed")]
    InvalidPrefix(String),

    /// Entropy byte count is outside the supported range
    #[error("The entropy byte count must be between {min} and {max}, got {value}")]
    EntropyBytesOutOfRange { value: usize, min: usize, max: usize },
}

/// A string could not be decoded as base62.
///
/// Only returned by [`base62::decode`](crate::base62::decode); token parsing
/// reports malformed input as `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode base62 string")]
pub struct DecodeError;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The generator configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The secure random source failed to produce bytes
    #[error("Secure random source unavailable: {0}")]
    Entropy(#[from] rand::Error),
}

/// Result type alias for token operations.
pub type Result<T> = std::result::Result<T, Error>;
