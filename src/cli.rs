use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use cybertoken::TokenGenerator;

use crate::configuration::FileConfig;
use crate::error::{CliError, Usage};

const PREFIX_ENV: &str = "CYBERTOKEN_PREFIX";

/// Generate and check prefixed, checksummed API tokens.
///
/// A bare prefix that is also a subcommand name (generate, check, scan,
/// help) runs that subcommand. Pass such a prefix as
/// `cybertoken generate <prefix>` or through CYBERTOKEN_PREFIX.
#[derive(Debug, Parser)]
#[command(name = "cybertoken", version)]
pub struct Cli {
    /// YAML file providing `prefix` and `entropy_bytes`
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate new tokens (the default when no subcommand is given)
    Generate(GenerateArgs),
    /// Check whether tokens are syntactically valid; exits 1 if any is not
    Check(CheckArgs),
    /// Search files (or stdin) for valid tokens; exits 1 if any is found,
    /// 3 if an input could not be read
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Token prefix without the trailing underscore
    #[arg(env = PREFIX_ENV)]
    pub prefix: Option<String>,

    /// Random bytes per token
    #[arg(short, long)]
    pub entropy_bytes: Option<usize>,

    /// Number of tokens to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Token prefix without the trailing underscore
    #[arg(short, long, env = PREFIX_ENV)]
    pub prefix: Option<String>,

    /// Tokens to check
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Token prefix without the trailing underscore
    #[arg(short, long, env = PREFIX_ENV)]
    pub prefix: Option<String>,

    /// Files to scan; reads stdin when none are given
    pub files: Vec<PathBuf>,
}

pub fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    match cli.command {
        Some(Command::Generate(args)) => generate(&file_config, &args),
        None => generate(&file_config, &cli.generate),
        Some(Command::Check(args)) => check(&file_config, &args),
        Some(Command::Scan(args)) => scan(&file_config, &args),
    }
}

fn generate(file_config: &FileConfig, args: &GenerateArgs) -> Result<ExitCode, CliError> {
    let config =
        file_config.resolve(args.prefix.as_deref(), args.entropy_bytes, Usage::Generate)?;
    let generator = TokenGenerator::new(config)?;

    let mut out = io::stdout().lock();
    for _ in 0..args.count {
        let token = generator.try_generate_token()?;
        writeln!(out, "{token}")?;
    }
    log::info!(
        "Generated {} token(s) with prefix {}",
        args.count,
        generator.prefix()
    );

    Ok(ExitCode::SUCCESS)
}

fn check(file_config: &FileConfig, args: &CheckArgs) -> Result<ExitCode, CliError> {
    let config = file_config.resolve(args.prefix.as_deref(), None, Usage::Check)?;
    let generator = TokenGenerator::new(config)?;

    let mut out = io::stdout().lock();
    let mut all_valid = true;
    for token in &args.tokens {
        let valid = generator.is_token_string(token);
        all_valid &= valid;
        writeln!(out, "{}\t{token}", if valid { "valid" } else { "invalid" })?;
    }

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn scan(file_config: &FileConfig, args: &ScanArgs) -> Result<ExitCode, CliError> {
    let config = file_config.resolve(args.prefix.as_deref(), None, Usage::Scan)?;
    let generator = TokenGenerator::new(config)?;

    let sources: Vec<Option<&Path>> = if args.files.is_empty() {
        vec![None]
    } else {
        args.files.iter().map(|path| Some(path.as_path())).collect()
    };

    let mut out = io::stdout().lock();
    let mut found = 0;
    let mut unreadable = 0;
    for input in &sources {
        let (path, contents) = match input {
            Some(path) => (path.to_path_buf(), std::fs::read(path)),
            None => (PathBuf::from("-"), read_stdin()),
        };
        let bytes = match contents {
            Ok(bytes) => bytes,
            Err(source) => {
                // Keep going: the other inputs may still hold tokens
                eprintln!("{}", CliError::ReadInput { path, source });
                unreadable += 1;
                continue;
            }
        };

        let name = path.display();
        for (start, token) in scan_bytes(&generator, &bytes) {
            writeln!(out, "{name}:{start}:{token}")?;
            found += 1;
        }
    }
    log::info!(
        "Found {found} token(s) in {} input(s), {unreadable} unreadable",
        sources.len()
    );

    Ok(if unreadable > 0 {
        ExitCode::from(3)
    } else if found > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn read_stdin() -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Scan the valid UTF-8 spans of `bytes`; offsets index into `bytes`.
fn scan_bytes<'b>(generator: &TokenGenerator, bytes: &'b [u8]) -> Vec<(usize, &'b str)> {
    let mut matches = Vec::new();
    let mut offset = 0;
    for chunk in bytes.utf8_chunks() {
        let text = chunk.valid();
        for token_match in generator.scan(text) {
            matches.push((offset + token_match.start, token_match.token));
        }
        offset += text.len() + chunk.invalid().len();
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_prefix() {
        let cli = Cli::try_parse_from(["cybertoken", "test"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.prefix.as_deref(), Some("test"));
        assert_eq!(cli.generate.count, 1);
    }

    #[test]
    fn test_parse_generate_subcommand() {
        let cli =
            Cli::try_parse_from(["cybertoken", "generate", "abc", "-e", "40", "-n", "3"]).unwrap();
        let Some(Command::Generate(args)) = cli.command else {
            panic!("Expected generate command");
        };
        assert_eq!(args.prefix.as_deref(), Some("abc"));
        assert_eq!(args.entropy_bytes, Some(40));
        assert_eq!(args.count, 3);
    }

    #[test]
    fn test_parse_check_requires_tokens() {
        assert!(Cli::try_parse_from(["cybertoken", "check", "--prefix", "test"]).is_err());

        let cli = Cli::try_parse_from(["cybertoken", "check", "-p", "test", "a", "b"]).unwrap();
        let Some(Command::Check(args)) = cli.command else {
            panic!("Expected check command");
        };
        assert_eq!(args.prefix.as_deref(), Some("test"));
        assert_eq!(args.tokens, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::try_parse_from(["cybertoken", "scan", "--config", "c.yaml", "f.txt"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        let Some(Command::Scan(args)) = cli.command else {
            panic!("Expected scan command");
        };
        assert_eq!(args.files, vec![PathBuf::from("f.txt")]);
    }

    #[test]
    fn test_subcommand_names_as_prefix() {
        let cli = Cli::try_parse_from(["cybertoken", "generate", "check"]).unwrap();
        let Some(Command::Generate(args)) = cli.command else {
            panic!("Expected generate command");
        };
        assert_eq!(args.prefix.as_deref(), Some("check"));

        let cli = Cli::try_parse_from(["cybertoken", "scan"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Scan(_))));
    }

    #[test]
    fn test_scan_bytes_skips_invalid_utf8() {
        let generator = TokenGenerator::new(cybertoken::GeneratorConfig::new("test")).unwrap();
        let token = "test_R67NJs98Lvg5o42CanYRTirswpki3SAsJYbNiDwHdKNhiyw";

        let mut bytes = b"\xff\xfekey=".to_vec();
        bytes.extend_from_slice(token.as_bytes());
        bytes.extend_from_slice(b" \xc3\x28\n\xe2");
        bytes.extend_from_slice(token.as_bytes());

        let second = 6 + token.len() + 5;
        assert_eq!(
            scan_bytes(&generator, &bytes),
            vec![(6, token), (second, token)]
        );
        assert!(scan_bytes(&generator, b"\xff\xfe").is_empty());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
