// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Secure Command-Line Argument Parsing
//!
//! Security-first argument parsing with comprehensive validation.
//!
//! ## Security Features
//!
//! - **Length limits** - Prevent buffer overflow attempts
//! - **Pattern detection** - Block path traversal and injection
//! - **Path normalization** - Canonical path resolution
//! - **System directory protection** - Prevent access to sensitive paths
//!
//! ## Dangerous Patterns Detected
//!
//! `..`, `~`, `$`, backticks, `;` `&` `|`, `>` `<`, null bytes, newlines,
//! carriage returns.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Maximum argument count (prevent DOS)
const MAX_ARG_COUNT: usize = 100;

/// Maximum single argument length
const MAX_ARG_LENGTH: usize = 1000;

/// Maximum path length
const MAX_PATH_LENGTH: usize = 4096;

/// Dangerous patterns that indicate potential attacks
const DANGEROUS_PATTERNS: &[&str] = &[
    "..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0",
];

/// Protected system directories
const PROTECTED_DIRS: &[&str] = &[
    "/etc",
    "/bin",
    "/sbin",
    "/usr/bin",
    "/usr/sbin",
    "/boot",
    "/sys",
    "/proc",
    "/dev",
];

/// Secure argument parsing errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("too many arguments (max {MAX_ARG_COUNT})")]
    TooManyArguments,

    #[error("argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    #[error("dangerous pattern detected in argument: {pattern} in {arg}")]
    DangerousPattern { pattern: String, arg: String },

    #[error("path exceeds maximum length (max {MAX_PATH_LENGTH})")]
    PathTooLong,

    #[error("access to protected system directory denied: {0}")]
    ProtectedDirectory(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid argument value for {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Secure argument parser
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validate a single argument for security issues.
    pub fn validate_argument(arg: &str) -> Result<(), ParseError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(arg.chars().take(50).collect::<String>() + "..."));
        }

        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ParseError::DangerousPattern {
                    pattern: pattern.to_string(),
                    arg: arg.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Validate an argument count against the DOS-prevention ceiling.
    pub fn validate_argument_count(count: usize) -> Result<(), ParseError> {
        if count > MAX_ARG_COUNT {
            return Err(ParseError::TooManyArguments);
        }
        Ok(())
    }

    /// Validate and canonicalize a path that must already exist (inputs).
    pub fn validate_path(path: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(path).map_err(|e| match e {
            ParseError::ArgumentTooLong(_) => ParseError::InvalidPath(format!("path too long: {path}")),
            ParseError::DangerousPattern { pattern, .. } => {
                ParseError::InvalidPath(format!("path contains dangerous pattern '{pattern}': {path}"))
            }
            other => other,
        })?;

        let path_obj = Path::new(path);
        let canonical = path_obj.canonicalize().map_err(|e| {
            if !path_obj.exists() {
                ParseError::PathNotFound(path.to_string())
            } else {
                ParseError::InvalidPath(format!("{path}: {e}"))
            }
        })?;

        if canonical.to_string_lossy().len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }

        for protected in PROTECTED_DIRS {
            if canonical.starts_with(protected) {
                return Err(ParseError::ProtectedDirectory(canonical.display().to_string()));
            }
        }

        Ok(canonical)
    }

    /// Validate a path that need not exist yet (outputs).
    pub fn validate_output_path(path: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(path)?;

        let path_obj = Path::new(path);
        for protected in PROTECTED_DIRS {
            if path_obj.starts_with(protected) {
                return Err(ParseError::ProtectedDirectory(path.to_string()));
            }
        }

        Ok(path_obj.to_path_buf())
    }

    /// Validate a bounded numeric argument already parsed from the CLI.
    pub fn validate_range(arg_name: &str, value: usize, min: usize, max: usize) -> Result<(), ParseError> {
        if value < min || value > max {
            return Err(ParseError::InvalidValue {
                arg: arg_name.to_string(),
                reason: format!("must be between {min} and {max}, got {value}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod argument_validation {
        use super::*;

        #[test]
        fn accepts_safe_arguments() {
            assert!(SecureArgParser::validate_argument("safe-arg").is_ok());
            assert!(SecureArgParser::validate_argument("file.txt").is_ok());
            assert!(SecureArgParser::validate_argument("path/to/file").is_ok());
        }

        #[test]
        fn rejects_too_long_arguments() {
            let long_arg = "a".repeat(MAX_ARG_LENGTH + 1);
            assert!(matches!(
                SecureArgParser::validate_argument(&long_arg),
                Err(ParseError::ArgumentTooLong(_))
            ));
        }

        #[test]
        fn detects_dangerous_patterns() {
            let dangerous = [
                "../etc/passwd",
                "~/.ssh/id_rsa",
                "$(whoami)",
                "`ls`",
                "file;rm -rf /",
                "file&background",
                "file|pipe",
                "file>output",
                "file<input",
                "file\nwith\nnewlines",
            ];

            for arg in dangerous {
                assert!(
                    matches!(SecureArgParser::validate_argument(arg), Err(ParseError::DangerousPattern { .. })),
                    "failed to detect dangerous pattern in: {arg}"
                );
            }
        }
    }

    mod path_validation {
        use super::*;

        #[test]
        fn rejects_protected_directory_for_output() {
            let result = SecureArgParser::validate_output_path("/etc/passwd");
            assert!(matches!(result, Err(ParseError::ProtectedDirectory(_))));
        }

        #[test]
        fn accepts_relative_output_path() {
            assert!(SecureArgParser::validate_output_path("out/result.bin").is_ok());
        }

        #[test]
        fn missing_input_path_is_not_found() {
            let result = SecureArgParser::validate_path("/no/such/path/vault-test-fixture");
            assert!(matches!(result, Err(ParseError::PathNotFound(_))));
        }
    }

    mod range_validation {
        use super::*;

        #[test]
        fn accepts_in_range_value() {
            assert!(SecureArgParser::validate_range("channel-depth", 4, 1, 1024).is_ok());
        }

        #[test]
        fn rejects_out_of_range_value() {
            let result = SecureArgParser::validate_range("channel-depth", 0, 1, 1024);
            assert!(matches!(result, Err(ParseError::InvalidValue { .. })));
        }
    }
}
