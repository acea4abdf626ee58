// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: General error
//! - **64-78**: Specific error conditions (BSD sysexits.h)
//! - **128+N**: Fatal signal N (e.g., 130 = SIGINT)

use std::fmt;

use vault_domain::error::VaultError;

/// Exit codes following Unix conventions (BSD sysexits.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1)
    Error = 1,

    /// Command line usage error (64)
    UsageError = 64,

    /// Data format error (65)
    /// Chunk header parse failures, checksum mismatches.
    DataError = 65,

    /// Cannot open input (66)
    NoInput = 66,

    /// Service unavailable (69)
    /// Bucket/HTTP transport unreachable.
    Unavailable = 69,

    /// Internal software error (70)
    Software = 70,

    /// Cannot create output file (73)
    CantCreate = 73,

    /// I/O error (74)
    IoError = 74,

    /// Configuration error (78)
    /// Invalid `n`/`k`/word width/chunk size.
    Config = 78,

    /// Interrupted by signal (SIGINT - Ctrl+C) (130)
    Interrupted = 130,

    /// Terminated by signal (SIGTERM) (143)
    Terminated = 143,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a [`VaultError`] to the exit code that best describes it.
    pub fn from_vault_error(error: &VaultError) -> Self {
        match error {
            VaultError::InvalidConfiguration(_) => ExitCode::Config,
            VaultError::IoSource(_) => ExitCode::NoInput,
            VaultError::IoOutput(_) => ExitCode::CantCreate,
            VaultError::IoHttp(_) => ExitCode::Unavailable,
            VaultError::MalformedHeader(_)
            | VaultError::SizeMismatch { .. }
            | VaultError::ChunkCountMismatch { .. }
            | VaultError::CryptoAuthFail => ExitCode::DataError,
            VaultError::ErasureSingular(_) | VaultError::ExcludedSetSizeMismatch { .. } => ExitCode::DataError,
            VaultError::Allocation(_) | VaultError::Internal(_) => ExitCode::Software,
            VaultError::QueueClosed | VaultError::QueueFull(_) => ExitCode::IoError,
        }
    }

    /// Get human-readable description of exit code
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    pub fn is_signal(self) -> bool {
        matches!(self, ExitCode::Interrupted | ExitCode::Terminated)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Map a `Result` to a process exit code, printing the error on failure.
pub fn result_to_exit_code(result: Result<(), VaultError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from_vault_error(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values_match_sysexits() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Error.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 64);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::Terminated.as_i32(), 143);
    }

    #[test]
    fn maps_configuration_error_to_config_code() {
        let err = VaultError::InvalidConfiguration("k must be less than n".into());
        assert_eq!(ExitCode::from_vault_error(&err), ExitCode::Config);
    }

    #[test]
    fn maps_io_http_error_to_unavailable() {
        let err = VaultError::IoHttp("connection refused".into());
        assert_eq!(ExitCode::from_vault_error(&err), ExitCode::Unavailable);
    }

    #[test]
    fn is_signal_recognizes_interrupt_and_terminate() {
        assert!(ExitCode::Interrupted.is_signal());
        assert!(ExitCode::Terminated.is_signal());
        assert!(!ExitCode::Success.is_signal());
    }

    #[test]
    fn result_to_exit_code_success() {
        assert_eq!(result_to_exit_code(Ok(())), ExitCode::Success);
    }
}
