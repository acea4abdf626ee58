// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault Core
//!
//! The concurrent engine built on top of `vault_domain`'s pure erasure
//! coding and chunk format: a bounded work queue, a nonce generator, an
//! AES-256-GCM adapter, validated runtime configuration, and the
//! upload/download worker pipelines.
//!
//! Each pipeline owns one dedicated worker thread. The thread drives the
//! async `BucketSet`/`HttpClient` ports (out-of-scope collaborators
//! implemented in `infra` for tests and the demo binary, or by a real
//! caller) from a small single-threaded Tokio runtime, while the chunking,
//! hashing, AEAD, and erasure-coding work stays fully synchronous.

pub mod config;
pub mod infra;
pub mod nonce;
pub mod pipeline;
pub mod queue;

pub use config::VaultConfig;
pub use infra::FileSource;
pub use nonce::NonceGenerator;
pub use pipeline::{DownloadPipeline, StopMode, UploadPipeline};
pub use queue::BoundedQueue;

pub use vault_domain::{
    AeadMaterial, BinaryMatrix, BucketSet, ChunkHeader, ChunkName, ChunkSize, Coder,
    DownloadCallback, ErrorCategory, GetRequest, GfField, HttpClient, Matrix, NextChunkLink,
    ProgressCallback, PutRequest, Source, StoredFile, UploadCallback, VaultError,
};
