// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Progress/Close Callbacks
//!
//! A small trait-object callback, replacing the opaque-pointer-plus-dispatch-
//! function shape a C-facing design would use. `update` fires any number of
//! times with a monotonically non-decreasing percentage; `close` fires
//! exactly once per submitted file, success or failure.

use crate::stored_file::StoredFile;

/// Percentage progress reporting shared by upload and download callbacks.
pub trait ProgressCallback: Send {
    /// `percentage` is in `0..=100` and non-decreasing across calls for one file.
    fn update(&mut self, percentage: u8);
}

/// Fired once per uploaded file, after the worker has finished with it
/// (`Ok(stored_file)` on success, `Err` for a per-file failure the worker
/// recovered from). Invoked even when the file failed, per the callback
/// contract in §4.7.
pub trait UploadCallback: ProgressCallback {
    fn close(&mut self, outcome: Result<StoredFile, String>);
}

/// Fired once per downloaded file.
pub trait DownloadCallback: ProgressCallback {
    fn close(&mut self, outcome: Result<(), String>);
}
