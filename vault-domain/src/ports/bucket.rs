// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bucket Set Port
//!
//! Out of scope per §1: bucket-provider URI layout and request signing are
//! an opaque collaborator. This crate only needs to map a chunk name to the
//! `N` resource URIs that store its shards.

use crate::chunk::ChunkName;
use crate::error::VaultError;
use async_trait::async_trait;

/// Maps a chunk name to one URI per bucket (shard index `0..N`).
#[async_trait]
pub trait BucketSet: Send + Sync {
    /// Total shard count this bucket set is provisioned for.
    fn shard_count(&self) -> usize;

    /// Resolves the `N` resource URIs (one per bucket) that will hold the
    /// shards of `chunk_name`, in shard-index order.
    async fn resolve_uris(&self, chunk_name: ChunkName) -> Result<Vec<String>, VaultError>;
}
