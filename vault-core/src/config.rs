// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault Configuration (C10)
//!
//! Typed, validated configuration for one upload or download pipeline.
//! Built from CLI flags in `vault-bootstrap`; validation rules mirror the
//! teacher's numeric-range checks in its CLI layer.

use vault_domain::chunk::size::{MAX_SIZE as CHUNK_MAX, MIN_SIZE as CHUNK_MIN};
use vault_domain::erasure::coder::WORD_WIDTHS;
use vault_domain::error::VaultError;
use vault_domain::ChunkSize;

/// Largest `N + K` this crate's table-based GF(2^16) field can address.
pub const MAX_SHARD_TOTAL: usize = 65_536;

#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Total shard count.
    pub n: usize,
    /// Shards required to reconstruct a chunk.
    pub k: usize,
    /// Word width, in bytes, for the erasure coder's lanes.
    pub word_width: usize,
    pub chunk_size: ChunkSize,
    /// Capacity hint for the pipeline's work queue.
    pub channel_depth: usize,
    /// Upper bound on how long the worker waits for all N HTTP requests of
    /// one chunk before treating the chunk as failed.
    pub request_timeout_secs: u64,
}

impl VaultConfig {
    pub fn new(
        n: usize,
        k: usize,
        word_width: usize,
        chunk_size_bytes: u64,
        channel_depth: usize,
        request_timeout_secs: u64,
    ) -> Result<Self, VaultError> {
        let config = VaultConfig {
            n,
            k,
            word_width,
            chunk_size: ChunkSize::new(chunk_size_bytes)?,
            channel_depth,
            request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.k == 0 || self.k >= self.n {
            return Err(VaultError::InvalidConfiguration(format!(
                "K must satisfy 0 < K < N (got N={}, K={})",
                self.n, self.k
            )));
        }
        if self.n + self.k > MAX_SHARD_TOTAL {
            return Err(VaultError::InvalidConfiguration(format!(
                "N + K = {} exceeds the largest supported shard total ({MAX_SHARD_TOTAL})",
                self.n + self.k
            )));
        }
        if !WORD_WIDTHS.contains(&self.word_width) {
            return Err(VaultError::InvalidConfiguration(format!(
                "word width must be one of {WORD_WIDTHS:?}, got {}",
                self.word_width
            )));
        }
        if self.channel_depth == 0 {
            return Err(VaultError::InvalidConfiguration(
                "channel_depth must be greater than 0".into(),
            ));
        }
        let bytes = self.chunk_size.bytes();
        if !(CHUNK_MIN..=CHUNK_MAX).contains(&bytes) {
            return Err(VaultError::InvalidConfiguration(format!(
                "chunk size {bytes} out of range [{CHUNK_MIN}, {CHUNK_MAX}]"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_documented_valid_ranges() {
        assert!(VaultConfig::new(5, 3, 8, 4 * 1024 * 1024, 16, 30).is_ok());
        assert!(VaultConfig::new(3, 2, 1, 4096, 1, 5).is_ok());
    }

    #[test]
    fn rejects_k_greater_or_equal_to_n() {
        assert!(VaultConfig::new(3, 3, 8, 4096, 1, 5).is_err());
        assert!(VaultConfig::new(3, 4, 8, 4096, 1, 5).is_err());
    }

    #[test]
    fn rejects_zero_channel_depth() {
        assert!(VaultConfig::new(5, 3, 8, 4096, 0, 5).is_err());
    }

    #[test]
    fn rejects_unsupported_word_width() {
        assert!(VaultConfig::new(5, 3, 3, 4096, 1, 5).is_err());
    }

    #[test]
    fn rejects_shard_total_beyond_field_capacity() {
        assert!(VaultConfig::new(40_000, 30_000, 8, 4096, 1, 5).is_err());
    }
}
