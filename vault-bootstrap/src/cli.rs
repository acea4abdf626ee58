// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse()                 │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validator::validate()           │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

use std::path::PathBuf;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

/// Validated CLI configuration.
///
/// All arguments after security validation: paths canonicalized (for
/// existing inputs) or pattern-checked (for outputs that don't exist yet),
/// and numeric values range-checked.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub n: usize,
    pub k: usize,
    pub word_width: u32,
    pub chunk_size_mb: usize,
    pub channel_depth: usize,
}

/// Validated command variants
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Upload { input: PathBuf, manifest: PathBuf },
    Download { manifest: PathBuf, output: PathBuf },
    Roundtrip { input: PathBuf, output: PathBuf },
}

/// Parse and validate CLI arguments: parse with clap, then apply security
/// and range validation to every argument.
///
/// # Errors
///
/// Returns [`ParseError`] if any validation fails.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    SecureArgParser::validate_range("n", cli.n, 1, 65_536)?;
    SecureArgParser::validate_range("k", cli.k, 1, 65_536)?;
    SecureArgParser::validate_range("word-width", cli.word_width as usize, 1, 32)?;
    SecureArgParser::validate_range("chunk-size-mb", cli.chunk_size_mb, 1, 1024)?;
    SecureArgParser::validate_range("channel-depth", cli.channel_depth, 1, 4096)?;

    let command = match cli.command {
        Commands::Upload { input, manifest } => {
            let validated_input = SecureArgParser::validate_path(&input.to_string_lossy())?;
            let validated_manifest = SecureArgParser::validate_output_path(&manifest.to_string_lossy())?;
            ValidatedCommand::Upload {
                input: validated_input,
                manifest: validated_manifest,
            }
        }
        Commands::Download { manifest, output } => {
            let validated_manifest = SecureArgParser::validate_path(&manifest.to_string_lossy())?;
            let validated_output = SecureArgParser::validate_output_path(&output.to_string_lossy())?;
            ValidatedCommand::Download {
                manifest: validated_manifest,
                output: validated_output,
            }
        }
        Commands::Roundtrip { input, output } => {
            let validated_input = SecureArgParser::validate_path(&input.to_string_lossy())?;
            let validated_output = SecureArgParser::validate_output_path(&output.to_string_lossy())?;
            ValidatedCommand::Roundtrip {
                input: validated_input,
                output: validated_output,
            }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        n: cli.n,
        k: cli.k,
        word_width: cli.word_width,
        chunk_size_mb: cli.chunk_size_mb,
        channel_depth: cli.channel_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_roundtrip_command_against_real_paths() {
        let dir = std::env::temp_dir();
        let input = dir.join("vault-cli-validate-test-input.bin");
        std::fs::write(&input, b"hello").unwrap();

        let cli = Cli::parse_from([
            "vault",
            "roundtrip",
            "-i",
            input.to_str().unwrap(),
            "-o",
            "vault-cli-validate-test-output.bin",
        ]);
        let validated = validate_cli(cli).unwrap();
        assert!(matches!(validated.command, ValidatedCommand::Roundtrip { .. }));

        std::fs::remove_file(&input).unwrap();
    }

    #[test]
    fn rejects_missing_input_file() {
        let cli = Cli::parse_from([
            "vault",
            "roundtrip",
            "-i",
            "/no/such/vault-cli-validate-missing-input",
            "-o",
            "out.bin",
        ]);
        assert!(validate_cli(cli).is_err());
    }

    #[test]
    fn rejects_out_of_range_k() {
        let dir = std::env::temp_dir();
        let input = dir.join("vault-cli-validate-test-k.bin");
        std::fs::write(&input, b"hello").unwrap();

        let cli = Cli::parse_from([
            "vault",
            "--k",
            "0",
            "roundtrip",
            "-i",
            input.to_str().unwrap(),
            "-o",
            "out.bin",
        ]);
        assert!(validate_cli(cli).is_err());

        std::fs::remove_file(&input).unwrap();
    }
}
