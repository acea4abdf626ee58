// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! AEAD material: the per-chunk tag/nonce/key triple threaded through the
//! chunk header chain and the [`crate::stored_file::StoredFile`] manifest.
//! The key bytes are wiped on drop.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

pub const TAG_SIZE: usize = 16;
pub const NONCE_SIZE: usize = 12;
pub const KEY_SIZE: usize = 32;

/// AES-256-GCM tag, nonce, and key needed to open one chunk's encrypted
/// blob. Cloned freely (it is plain data once computed), but zeroizes its
/// key bytes when dropped.
///
/// Serializable so a [`crate::stored_file::StoredFile`] manifest can be
/// persisted; callers that serialize it are responsible for protecting the
/// resulting bytes as they would any other key material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeadMaterial {
    pub tag: [u8; TAG_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    pub key: [u8; KEY_SIZE],
}

impl AeadMaterial {
    pub const ENCODED_SIZE: usize = TAG_SIZE + NONCE_SIZE + KEY_SIZE;

    pub fn zero() -> Self {
        AeadMaterial {
            tag: [0; TAG_SIZE],
            nonce: [0; NONCE_SIZE],
            key: [0; KEY_SIZE],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.tag == [0; TAG_SIZE] && self.nonce == [0; NONCE_SIZE] && self.key == [0; KEY_SIZE]
    }

    pub fn to_bytes(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), Self::ENCODED_SIZE);
        out[..TAG_SIZE].copy_from_slice(&self.tag);
        out[TAG_SIZE..TAG_SIZE + NONCE_SIZE].copy_from_slice(&self.nonce);
        out[TAG_SIZE + NONCE_SIZE..].copy_from_slice(&self.key);
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut tag = [0u8; TAG_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        let mut key = [0u8; KEY_SIZE];
        tag.copy_from_slice(&bytes[..TAG_SIZE]);
        nonce.copy_from_slice(&bytes[TAG_SIZE..TAG_SIZE + NONCE_SIZE]);
        key.copy_from_slice(&bytes[TAG_SIZE + NONCE_SIZE..TAG_SIZE + NONCE_SIZE + KEY_SIZE]);
        AeadMaterial { tag, nonce, key }
    }
}

impl Drop for AeadMaterial {
    fn drop(&mut self) {
        self.tag.zeroize();
        self.nonce.zeroize();
        self.key.zeroize();
    }
}

impl std::fmt::Debug for AeadMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadMaterial").field("key", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let m = AeadMaterial {
            tag: [1; TAG_SIZE],
            nonce: [2; NONCE_SIZE],
            key: [3; KEY_SIZE],
        };
        let mut buf = [0u8; AeadMaterial::ENCODED_SIZE];
        m.to_bytes(&mut buf);
        let back = AeadMaterial::from_bytes(&buf);
        assert_eq!(m, back);
    }

    #[test]
    fn zero_is_recognized() {
        assert!(AeadMaterial::zero().is_zero());
    }
}
