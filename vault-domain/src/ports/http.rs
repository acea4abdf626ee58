// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HTTP Transport Port
//!
//! Out of scope per §1: HTTP client transport itself. The pipelines only
//! need to open N PUT/GET requests per chunk, write or read a streamed
//! body, and await completion — everything else (retries, TLS, auth
//! headers) is the adapter's concern.

use crate::error::VaultError;
use async_trait::async_trait;

/// Opens PUT/GET requests against a resolved shard URI.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn put(&self, uri: &str) -> Result<Box<dyn PutRequest>, VaultError>;
    async fn get(&self, uri: &str) -> Result<Box<dyn GetRequest>, VaultError>;
}

/// A started PUT request whose body is written incrementally.
#[async_trait]
pub trait PutRequest: Send {
    async fn write_chunk(&mut self, bytes: &[u8]) -> Result<(), VaultError>;
    /// Finishes the body and awaits the response, erroring on a non-success
    /// status or transport failure.
    async fn finish(self: Box<Self>) -> Result<(), VaultError>;
}

/// A started GET request whose body is read incrementally. A zero-length
/// read signals the end of the body, matching [`std::io::Read`] semantics.
#[async_trait]
pub trait GetRequest: Send {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, VaultError>;
}
