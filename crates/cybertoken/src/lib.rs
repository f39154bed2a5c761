//! Prefixed, checksummed bearer token generation and syntactic validation.
//!
//! This crate provides functionality for:
//! - Generating random tokens of the form `<prefix>_<base62 payload>`
//! - Checking whether a string is a well-formed token of a given prefix
//! - Scanning text for leaked tokens
//!
//! # Token Format
//!
//! Tokens follow the format: `{prefix}_{base62(entropy || version || crc32)}`
//!
//! Example: `test_R67NJs98Lvg5o42CanYRTirswpki3SAsJYbNiDwHdKNhiyw`
//!
//! The CRC-32 checksum lets secret scanners and backends reject mistyped or
//! truncated tokens without a lookup. It is not a signature: anyone can
//! produce a syntactically valid token, so validity here never implies that
//! a token was issued.
//!
//! # Example
//!
//! ```rust
//! use cybertoken::{GeneratorConfig, TokenGenerator};
//!
//! let generator = TokenGenerator::new(GeneratorConfig::new("test")).unwrap();
//!
//! let token = generator.generate_token();
//! assert!(token.starts_with("test_"));
//! assert!(generator.is_token_string(&token));
//! assert!(!generator.is_token_string("test_AAAABBBB"));
//! ```

pub mod base62;
mod checksum;
mod config;
mod error;
mod generator;
mod parse;
mod pattern;
mod payload;
mod scan;

// Public re-exports
pub use checksum::{CHECKSUM_LEN, checksum};
pub use config::{DEFAULT_ENTROPY_BYTES, GeneratorConfig, MAX_ENTROPY_BYTES, MIN_ENTROPY_BYTES};
pub use error::{ConfigError, DecodeError, Error, Result};
pub use generator::TokenGenerator;
pub use parse::{SEPARATOR, TokenContents, parse};
pub use pattern::TokenPattern;
pub use payload::{CURRENT_VERSION, PAYLOAD_OVERHEAD, build_payload};
pub use scan::{TokenMatch, scan};
