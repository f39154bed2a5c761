use std::path::Path;

use cybertoken::{DEFAULT_ENTROPY_BYTES, GeneratorConfig};
use serde::Deserialize;

use crate::error::{CliError, Usage};

/// Optional YAML configuration file.
///
/// ```yaml
/// prefix: test
/// entropy_bytes: 32
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub prefix: Option<String>,
    pub entropy_bytes: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config: FileConfig =
            serde_yaml::from_str(&contents).map_err(|source| CliError::ParseConfig {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Merge command line values over the file values.
    ///
    /// Command line (and `CYBERTOKEN_PREFIX`) wins over the file; the entropy
    /// falls back to [`DEFAULT_ENTROPY_BYTES`]. `usage` names the command
    /// reported when neither source has a prefix.
    pub fn resolve(
        &self,
        prefix: Option<&str>,
        entropy_bytes: Option<usize>,
        usage: Usage,
    ) -> Result<GeneratorConfig, CliError> {
        let prefix = prefix
            .or(self.prefix.as_deref())
            .ok_or(CliError::MissingPrefix(usage))?;
        let entropy_bytes = entropy_bytes
            .or(self.entropy_bytes)
            .unwrap_or(DEFAULT_ENTROPY_BYTES);

        Ok(GeneratorConfig::new(prefix).with_entropy_bytes(entropy_bytes))
    }
}
