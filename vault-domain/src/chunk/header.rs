// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Header
//!
//! Fixed-size record placed in front of each chunk's plaintext before
//! encryption. Headers are built in reverse chunk order: header *i* names
//! the *already-encrypted* chunk *i+1*, so a forward build is impossible —
//! chunk *i+1*'s encrypted name and AEAD material must exist before header
//! *i* can be finalized.

use crate::crypto::AeadMaterial;
use crate::error::VaultError;

const DIGEST_SIZE: usize = 32;

/// Link to the next chunk in the chain: its encrypted-blob digest and the
/// AEAD material that opens it. All-zero for the terminal chunk.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NextChunkLink {
    pub chunk_blob_digest: [u8; DIGEST_SIZE],
    pub encryption: AeadMaterial,
}

impl NextChunkLink {
    pub const ENCODED_SIZE: usize = DIGEST_SIZE + AeadMaterial::ENCODED_SIZE;

    pub fn terminal() -> Self {
        NextChunkLink {
            chunk_blob_digest: [0; DIGEST_SIZE],
            encryption: AeadMaterial::zero(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.chunk_blob_digest == [0; DIGEST_SIZE] && self.encryption.is_zero()
    }
}

/// Placed in front of each chunk's plaintext prior to AEAD encryption.
/// Fields appear in this exact order with no padding, per [`ChunkHeader::to_bytes`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChunkHeader {
    /// SHA-256 of this chunk's plaintext payload.
    pub current_chunk_digest: [u8; DIGEST_SIZE],
    /// SHA-256 over the concatenated plaintext of every chunk in the file.
    /// Nonzero only in chunk 0.
    pub full_file_digest: [u8; DIGEST_SIZE],
    pub next: NextChunkLink,
}

impl ChunkHeader {
    pub const ENCODED_SIZE: usize = DIGEST_SIZE * 2 + NextChunkLink::ENCODED_SIZE;

    pub fn empty() -> Self {
        ChunkHeader {
            current_chunk_digest: [0; DIGEST_SIZE],
            full_file_digest: [0; DIGEST_SIZE],
            next: NextChunkLink::terminal(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::ENCODED_SIZE];
        out[..DIGEST_SIZE].copy_from_slice(&self.current_chunk_digest);
        out[DIGEST_SIZE..2 * DIGEST_SIZE].copy_from_slice(&self.full_file_digest);
        let next_start = 2 * DIGEST_SIZE;
        out[next_start..next_start + DIGEST_SIZE].copy_from_slice(&self.next.chunk_blob_digest);
        self.next
            .encryption
            .to_bytes(&mut out[next_start + DIGEST_SIZE..next_start + NextChunkLink::ENCODED_SIZE]);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        if bytes.len() < Self::ENCODED_SIZE {
            return Err(VaultError::MalformedHeader(format!(
                "expected at least {} header bytes, got {}",
                Self::ENCODED_SIZE,
                bytes.len()
            )));
        }
        let mut current_chunk_digest = [0u8; DIGEST_SIZE];
        current_chunk_digest.copy_from_slice(&bytes[..DIGEST_SIZE]);
        let mut full_file_digest = [0u8; DIGEST_SIZE];
        full_file_digest.copy_from_slice(&bytes[DIGEST_SIZE..2 * DIGEST_SIZE]);

        let next_start = 2 * DIGEST_SIZE;
        let mut chunk_blob_digest = [0u8; DIGEST_SIZE];
        chunk_blob_digest.copy_from_slice(&bytes[next_start..next_start + DIGEST_SIZE]);
        let encryption = AeadMaterial::from_bytes(
            &bytes[next_start + DIGEST_SIZE..next_start + NextChunkLink::ENCODED_SIZE],
        );

        Ok(ChunkHeader {
            current_chunk_digest,
            full_file_digest,
            next: NextChunkLink {
                chunk_blob_digest,
                encryption,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_header_round_trips() {
        let header = ChunkHeader::empty();
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), ChunkHeader::ENCODED_SIZE);
        let back = ChunkHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header, back);
    }

    #[test]
    fn populated_header_round_trips() {
        let mut header = ChunkHeader::empty();
        header.current_chunk_digest = [7; DIGEST_SIZE];
        header.full_file_digest = [9; DIGEST_SIZE];
        header.next.chunk_blob_digest = [3; DIGEST_SIZE];
        header.next.encryption.tag = [1; 16];
        header.next.encryption.nonce = [2; 12];
        header.next.encryption.key = [4; 32];

        let bytes = header.to_bytes();
        let back = ChunkHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header, back);
        assert!(!back.next.is_terminal());
    }

    #[test]
    fn terminal_link_is_all_zero() {
        assert!(NextChunkLink::terminal().is_terminal());
    }

    #[test]
    fn from_bytes_rejects_short_input() {
        let err = ChunkHeader::from_bytes(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, VaultError::MalformedHeader(_)));
    }

    #[test]
    fn field_order_matches_layout_with_no_padding() {
        let mut header = ChunkHeader::empty();
        header.current_chunk_digest = [0xAA; DIGEST_SIZE];
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..DIGEST_SIZE], &[0xAA; DIGEST_SIZE][..]);
        assert_eq!(bytes.len(), DIGEST_SIZE * 2 + DIGEST_SIZE + AeadMaterial::ENCODED_SIZE);
    }
}
