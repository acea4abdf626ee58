// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault Domain
//!
//! Pure, synchronous core of the vault client: GF(2^m) field and matrix
//! algebra, the streaming Cauchy erasure coder, the chunk format and header
//! chain, AEAD material types, and the ports (`BucketSet`, `HttpClient`,
//! `Source`) that `vault-core` adapts to real infrastructure.
//!
//! Nothing in this crate performs I/O or spawns a task; it is driven by
//! `vault-core`'s upload/download pipelines the same way the teacher's
//! domain services are driven by its infrastructure adapters.

pub mod callback;
pub mod chunk;
pub mod crypto;
pub mod erasure;
pub mod error;
pub mod gf;
pub mod ports;
pub mod stored_file;

pub use callback::{DownloadCallback, ProgressCallback, UploadCallback};
pub use chunk::{ChunkHeader, ChunkName, ChunkSize, NextChunkLink};
pub use crypto::AeadMaterial;
pub use erasure::Coder;
pub use error::{ErrorCategory, VaultError};
pub use gf::{BinaryMatrix, GfField, Matrix};
pub use ports::{BucketSet, GetRequest, HttpClient, PutRequest, Source};
pub use stored_file::StoredFile;
