//! Token generation and syntactic validation.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::base62;
use crate::config::GeneratorConfig;
use crate::error::{ConfigError, Result};
use crate::parse::parse;
use crate::pattern::TokenPattern;
use crate::payload::{CURRENT_VERSION, build_payload};
use crate::scan::{TokenMatch, scan};

/// Issues tokens for one prefix and recognises tokens of that prefix.
///
/// A generator is immutable once built; share it freely across threads.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    prefix: String,
    entropy_bytes: usize,
    pattern: TokenPattern,
}

impl TokenGenerator {
    /// Validate `config` and build a generator from it.
    pub fn new(config: GeneratorConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let pattern = TokenPattern::new(&config.prefix);
        log::debug!(
            "Token generator ready: prefix={} entropy_bytes={}",
            config.prefix,
            config.entropy_bytes
        );

        Ok(Self {
            prefix: config.prefix,
            entropy_bytes: config.entropy_bytes,
            pattern,
        })
    }

    /// The configured prefix, without the separator.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of random bytes in each token.
    pub fn entropy_bytes(&self) -> usize {
        self.entropy_bytes
    }

    /// Generate a new token in the format `<prefix>_<base62 payload>`.
    ///
    /// Randomness comes from the operating system. Bulk generation can stall
    /// the calling thread while the OS entropy pool refills, so rate-limit
    /// callers that can trigger generation.
    ///
    /// # Panics
    /// Panics if the OS random source is unavailable. Use
    /// [`try_generate_token`](Self::try_generate_token) to handle that case.
    pub fn generate_token(&self) -> String {
        self.generate_token_with(&mut OsRng)
    }

    /// Like [`generate_token`](Self::generate_token), but reports a failing
    /// OS random source as an error.
    pub fn try_generate_token(&self) -> Result<String> {
        self.try_generate_token_with(&mut OsRng)
    }

    /// Generate a token using the given secure random source.
    pub fn generate_token_with<R: RngCore + CryptoRng>(&self, rng: &mut R) -> String {
        let mut random = self.random_buffer();
        rng.fill_bytes(random.as_mut_slice());
        self.encode_token(&random)
    }

    /// Generate a token using the given secure random source, propagating
    /// its failures.
    pub fn try_generate_token_with<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<String> {
        let mut random = self.random_buffer();
        rng.try_fill_bytes(random.as_mut_slice())?;
        Ok(self.encode_token(&random))
    }

    /// Check whether `candidate` is a syntactically valid token of this
    /// generator's prefix.
    ///
    /// This is **not** authentication: it only checks shape, version and
    /// checksum. Use it for secret scanning or as a cheap filter before
    /// asking a backend whether the token is actually valid.
    pub fn is_token_string(&self, candidate: &str) -> bool {
        if candidate.is_empty() || !self.pattern.matches(candidate) {
            log::trace!(
                "Rejected candidate of length {}: pattern mismatch",
                candidate.len()
            );
            return false;
        }

        // Decoding and checksumming is the expensive part
        match parse(candidate, Some(&self.prefix)) {
            Some(contents) if contents.is_syntactically_valid => true,
            Some(_) => {
                log::trace!("Rejected {} candidate: checksum mismatch", self.prefix);
                false
            }
            None => {
                log::trace!("Rejected {} candidate: malformed payload", self.prefix);
                false
            }
        }
    }

    /// Find every valid token of this generator's prefix inside `text`.
    pub fn scan<'t>(&self, text: &'t str) -> Vec<TokenMatch<'t>> {
        scan(self, text)
    }

    pub(crate) fn pattern(&self) -> &TokenPattern {
        &self.pattern
    }

    /// One byte more than the entropy: the last random byte is overwritten
    /// by the version.
    fn random_buffer(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(vec![0u8; self.entropy_bytes + 1])
    }

    fn encode_token(&self, random: &[u8]) -> String {
        let entropy = &random[..self.entropy_bytes];
        let payload = Zeroizing::new(build_payload(entropy, CURRENT_VERSION));
        let encoded = base62::encode(payload.as_slice());

        log::trace!(
            "Generated token: prefix={} payload_bytes={}",
            self.prefix,
            payload.len()
        );

        let prefix = self.pattern.prefix_with_separator();
        let mut token = String::with_capacity(prefix.len() + encoded.len());
        token.push_str(prefix);
        token.push_str(&encoded);
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base62::ALPHABET;
    use crate::error::Error;

    /// Fills every requested buffer with one value, incremented per call.
    struct CountingRng {
        state: u8,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.state);
            self.state = self.state.wrapping_add(1);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for CountingRng {}

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            panic!("entropy pool unavailable")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("entropy pool unavailable")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("entropy pool unavailable")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new("entropy pool unavailable"))
        }
    }

    impl CryptoRng for FailingRng {}

    fn generator(prefix: &str, entropy_bytes: usize) -> TokenGenerator {
        TokenGenerator::new(GeneratorConfig::new(prefix).with_entropy_bytes(entropy_bytes)).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(matches!(
            TokenGenerator::new(GeneratorConfig::new("foo_bar")),
            Err(ConfigError::InvalidPrefix(_))
        ));
        assert!(matches!(
            TokenGenerator::new(GeneratorConfig::new("a").with_entropy_bytes(20)),
            Err(ConfigError::EntropyBytesOutOfRange { value: 20, .. })
        ));
        assert!(TokenGenerator::new(GeneratorConfig::new("a").with_entropy_bytes(21)).is_ok());
    }

    #[test]
    fn test_generate_token_format() {
        let g = generator("test", 32);
        let token = g.generate_token();

        let (prefix, encoded) = token.split_once('_').unwrap();
        assert_eq!(prefix, "test");
        assert!(!encoded.is_empty());
        assert!(encoded.bytes().all(|c| ALPHABET.contains(&c)));

        let payload = base62::decode(encoded).unwrap();
        assert_eq!(payload.len(), 32 + 5);
        assert_eq!(payload[32], CURRENT_VERSION);
    }

    #[test]
    fn test_roundtrip_syntax_check() {
        for entropy_bytes in [21, 22, 32, 64, 199] {
            let g = generator("test", entropy_bytes);
            for _ in 0..20 {
                let token = g.generate_token();
                assert!(g.is_token_string(&token), "{token}");
            }
        }
    }

    #[test]
    fn test_generate_unique_tokens() {
        let g = generator("test", 32);
        assert_ne!(g.generate_token(), g.generate_token());
    }

    #[test]
    fn test_snapshot() {
        let g = generator("test", 22);
        let mut rng = CountingRng { state: 42 };
        assert_eq!(
            g.generate_token_with(&mut rng),
            "test_W1VEkCxCAn6JoEgLqH1YRNfMDjuPSNrTQcBk"
        );
        assert_eq!(
            g.generate_token_with(&mut rng),
            "test_WmmDcS1YbcSbzlVYAi07DGqfwLuHCp04w0yQ"
        );
        assert_eq!(
            g.try_generate_token_with(&mut rng).unwrap(),
            "test_XY3CUh5v2RouBIKkV8yfzA1zexu8xG8jUZHI"
        );
    }

    #[test]
    fn test_single_character_mutations_rejected() {
        let g = generator("test", 22);
        let token = "test_W1VEkCxCAn6JoEgLqH1YRNfMDjuPSNrTQcBk";
        assert!(g.is_token_string(token));

        let original = token.as_bytes();
        for position in g.prefix().len() + 1..original.len() {
            for &replacement in ALPHABET.iter().filter(|&&c| c != original[position]) {
                let mut mutated = original.to_vec();
                mutated[position] = replacement;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(!g.is_token_string(&mutated), "{mutated}");
            }
        }
    }

    #[test]
    fn test_failing_random_source() {
        let g = generator("test", 32);
        let result = g.try_generate_token_with(&mut FailingRng);
        assert!(matches!(result, Err(Error::Entropy(_))));
    }

    #[test]
    fn test_non_happy_paths() {
        let g = generator("test", 32);

        assert!(!g.is_token_string(""));
        assert!(!g.is_token_string("a"));
        assert!(!g.is_token_string("a_"));
        assert!(!g.is_token_string("a_1234"));
        assert!(!g.is_token_string("test_"));
        assert!(!g.is_token_string("test_1234"));
        assert!(!g.is_token_string("test_AAAABBBB"));
        assert!(!g.is_token_string("test_R67NJs98Lvg5o42CanYRTirswpki3SAsJYbN"));
        assert!(!g.is_token_string("test_R67NJs98Lvg5o42CanYRTirswpki3SAsJYbNiDwHd"));
        assert!(!g.is_token_string("test_R67NJs98Lvg5o42CanYRTirswpki3SAsJYbNiDwHdKNhiyW"));
        assert!(g.is_token_string("test_R67NJs98Lvg5o42CanYRTirswpki3SAsJYbNiDwHdKNhiyw"));
    }

    #[test]
    fn test_other_prefix_rejected() {
        let g = generator("test", 32);
        let other = generator("other", 32);
        let token = other.generate_token();

        assert!(other.is_token_string(&token));
        assert!(!g.is_token_string(&token));
        assert!(!g.is_token_string(&format!("x{token}")));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let g = generator("test", 21);
        let entropy = [9u8; 21];
        let token = format!("test_{}", base62::encode(build_payload(&entropy, 1)));
        assert!(!g.is_token_string(&token));
    }

    #[test]
    fn test_generator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenGenerator>();
    }
}
