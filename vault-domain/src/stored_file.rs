// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stored File
//!
//! The per-file manifest an upload emits through its [`crate::callback::Callback`]:
//! everything needed to start a download without re-deriving it.

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkName;
use crate::crypto::AeadMaterial;

/// Head of a file's chunk chain plus the material needed to open chunk 0.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub first_name: ChunkName,
    pub encryption: AeadMaterial,
    pub chunk_count: u64,
}
