// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tracing Subscriber Install
//!
//! The pipelines instrument their own spans (see `pipeline::upload`,
//! `pipeline::download`); this module only wires up where those events go.
//! Installed once at binary startup, after the bootstrap-phase
//! `BootstrapLogger` has finished reporting CLI/config errors.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing-subscriber` fmt layer reading its filter from
/// `RUST_LOG`, defaulting to `info` when unset. Safe to call once per
/// process; a second call returns an error the caller may ignore.
pub fn install_default_subscriber() {
    install_subscriber(false)
}

/// Like [`install_default_subscriber`], but defaults to `debug` instead of
/// `info` when `RUST_LOG` is unset and `verbose` is set (the CLI's
/// `--verbose` flag).
pub fn install_subscriber(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
