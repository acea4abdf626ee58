// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap.
//!
//! This module defines the CLI structure and handles argument parsing.
//! Security validation happens in the `validator` module after parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Main CLI structure
#[derive(Parser, Debug, Clone)]
#[command(name = "vault")]
#[command(about = concat!("Vault client v", env!("CARGO_PKG_VERSION"), " - erasure-coded, AEAD-encrypted file storage"))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug-level) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Total shard count per chunk (N)
    #[arg(long, default_value = "10")]
    pub n: usize,

    /// Data shard count per chunk (K); N - K shards may be lost
    #[arg(long, default_value = "6")]
    pub k: usize,

    /// GF(2^m) word width in bits
    #[arg(long, default_value = "8")]
    pub word_width: u32,

    /// Plaintext chunk size in MiB, before header and erasure expansion
    #[arg(long, default_value = "4")]
    pub chunk_size_mb: usize,

    /// Bounded queue depth between the caller and the pipeline worker thread
    #[arg(long, default_value = "4")]
    pub channel_depth: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Upload a file: chunk, AEAD-encrypt, erasure-encode, and fan out to N
    /// shard buckets. Writes the resulting manifest as JSON.
    Upload {
        /// File to upload
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the upload manifest (StoredFile, as JSON)
        #[arg(short, long)]
        manifest: PathBuf,
    },

    /// Download a file from a previously written manifest, tolerating up to
    /// N - K missing shards per chunk.
    Download {
        /// Manifest produced by a prior `upload` (StoredFile, as JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Path to write the recovered file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Upload then immediately download a file against an in-memory bucket
    /// set, verifying the round trip reproduces the original bytes.
    Roundtrip {
        /// File to round-trip
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the recovered copy
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Parse CLI arguments.
///
/// # Panics
///
/// Clap exits the process with a usage message if parsing fails.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upload_command() {
        let cli = Cli::parse_from([
            "vault",
            "upload",
            "--input",
            "in.bin",
            "--manifest",
            "manifest.json",
        ]);
        assert!(matches!(cli.command, Commands::Upload { .. }));
    }

    #[test]
    fn parses_global_flags_with_defaults() {
        let cli = Cli::parse_from(["vault", "upload", "-i", "in.bin", "-m", "m.json"]);
        assert_eq!(cli.n, 10);
        assert_eq!(cli.k, 6);
        assert_eq!(cli.word_width, 8);
        assert_eq!(cli.chunk_size_mb, 4);
        assert_eq!(cli.channel_depth, 4);
    }

    #[test]
    fn parses_roundtrip_command() {
        let cli = Cli::parse_from(["vault", "roundtrip", "-i", "in.bin", "-o", "out.bin"]);
        assert!(matches!(cli.command, Commands::Roundtrip { .. }));
    }
}
