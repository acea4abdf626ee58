// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # AEAD Adapter
//!
//! AES-256-GCM encrypt/decrypt of one chunk's `header ‖ plaintext` blob,
//! with empty associated data. Grounded on the teacher's
//! `infrastructure/adapters/encryption.rs` `MultiAlgoEncryption` (same
//! `aes_gcm` crate, same `encrypt_in_place`/`decrypt_in_place` calls), cut
//! down to the single algorithm and no key-derivation surface this spec
//! needs — one already-provisioned 32-byte key per chunk, not a
//! password-based KDF.

use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce, Tag};

use vault_domain::crypto::{AeadMaterial, KEY_SIZE};
use vault_domain::error::VaultError;

/// Encrypts `plaintext` in place, returning the detached authentication
/// tag. `key` and `nonce` are exactly the sizes AES-256-GCM requires.
pub fn encrypt(plaintext: &mut Vec<u8>, key: &[u8; KEY_SIZE], nonce: &[u8; 12]) -> Result<[u8; 16], VaultError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", plaintext)
        .map_err(|_| VaultError::Internal("AES-256-GCM encryption failed".into()))?;
    let mut tag_bytes = [0u8; 16];
    tag_bytes.copy_from_slice(&tag);
    Ok(tag_bytes)
}

/// Decrypts `ciphertext` in place using `material`, verifying the
/// authentication tag. Returns [`VaultError::CryptoAuthFail`] on a tag
/// mismatch (tampered or corrupted blob).
pub fn decrypt(ciphertext: &mut Vec<u8>, material: &AeadMaterial) -> Result<(), VaultError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&material.key));
    let tag = Tag::from_slice(&material.tag);
    cipher
        .decrypt_in_place_detached(Nonce::from_slice(&material.nonce), b"", ciphertext, tag)
        .map_err(|_| VaultError::CryptoAuthFail)
}
