// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Upload Source Port
//!
//! The handle an upload reads plaintext from. Borrowed from the caller for
//! the lifetime of the queued work item; it must remain valid until the
//! callback's `close` fires.

use std::io::{Read, Seek};

/// A seekable, readable plaintext source, plus a declared length.
pub trait Source: Read + Seek + Send {
    /// The caller-reported size, checked against the measured size during
    /// pass 1 of the upload worker loop.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
