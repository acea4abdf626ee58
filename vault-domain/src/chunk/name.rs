// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Name
//!
//! SHA-256 of an [`EncryptedChunkBlob`](crate::chunk) — used as the object
//! key under each bucket.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkName([u8; 32]);

impl ChunkName {
    pub const ZERO: ChunkName = ChunkName([0; 32]);

    /// Computes the name of an encrypted chunk blob as `SHA-256(blob)`.
    pub fn of_encrypted_blob(blob: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(blob);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        ChunkName(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        ChunkName(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ChunkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ChunkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkName({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_blob_yields_same_name() {
        let a = ChunkName::of_encrypted_blob(b"hello");
        let b = ChunkName::of_encrypted_blob(b"hello");
        assert_eq!(a, b);
    }

    #[test]
    fn different_blobs_yield_different_names() {
        let a = ChunkName::of_encrypted_blob(b"hello");
        let b = ChunkName::of_encrypted_blob(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_round_trips_through_display() {
        let name = ChunkName::of_encrypted_blob(b"chunk");
        assert_eq!(name.to_hex().len(), 64);
    }
}
