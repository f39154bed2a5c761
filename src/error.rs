use std::path::PathBuf;
use std::process::ExitCode;

use cybertoken::ConfigError;
use thiserror::Error;

/// Command whose usage is printed when no prefix is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Generate,
    Check,
    Scan,
}

impl Usage {
    /// Invocation line for this command.
    pub fn synopsis(self) -> &'static str {
        match self {
            Usage::Generate => "cybertoken <prefix>",
            Usage::Check => "cybertoken check --prefix <prefix> <token>...",
            Usage::Scan => "cybertoken scan --prefix <prefix> [file]...",
        }
    }

    /// Example that takes the prefix from the environment instead.
    pub fn env_example(self) -> &'static str {
        match self {
            Usage::Generate => "CYBERTOKEN_PREFIX=foo cybertoken",
            Usage::Check => "CYBERTOKEN_PREFIX=foo cybertoken check <token>",
            Usage::Scan => "CYBERTOKEN_PREFIX=foo cybertoken scan <file>",
        }
    }
}

/// Errors that end a command run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Please specify a prefix for the token. A prefix must be a non-empty string.")]
    MissingPrefix(Usage),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Token(#[from] cybertoken::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::MissingPrefix(_) => ExitCode::from(1),
            CliError::Config(_) | CliError::ReadConfig { .. } | CliError::ParseConfig { .. } => {
                ExitCode::from(2)
            }
            CliError::ReadInput { .. } | CliError::Token(_) | CliError::Io(_) => ExitCode::from(3),
        }
    }
}
