// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Memory Bucket Set & HTTP Client
//!
//! A `BucketSet`/`HttpClient` pair backed by an in-process `HashMap`,
//! standing in for real object-storage buckets and an HTTP transport. Used
//! by the demo binary and the pipeline integration tests — the bucket
//! URI/HTTP layer is out of scope per §1, so this is the simplest faithful
//! adapter, not a production implementation.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use vault_domain::chunk::ChunkName;
use vault_domain::error::VaultError;
use vault_domain::ports::{BucketSet, GetRequest, HttpClient, PutRequest};

#[derive(Clone, Default)]
pub struct MemoryStore {
    shards: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn uri(bucket: usize, chunk_name: ChunkName) -> String {
        format!("mem://bucket-{bucket}/{}", chunk_name.to_hex())
    }
}

pub struct MemoryBucketSet {
    n: usize,
}

impl MemoryBucketSet {
    pub fn new(n: usize) -> Self {
        MemoryBucketSet { n }
    }
}

#[async_trait]
impl BucketSet for MemoryBucketSet {
    fn shard_count(&self) -> usize {
        self.n
    }

    async fn resolve_uris(&self, chunk_name: ChunkName) -> Result<Vec<String>, VaultError> {
        Ok((0..self.n).map(|b| MemoryStore::uri(b, chunk_name)).collect())
    }
}

#[async_trait]
impl HttpClient for MemoryStore {
    async fn put(&self, uri: &str) -> Result<Box<dyn PutRequest>, VaultError> {
        Ok(Box::new(MemoryPut {
            store: self.shards.clone(),
            uri: uri.to_string(),
            buffer: Vec::new(),
        }))
    }

    async fn get(&self, uri: &str) -> Result<Box<dyn GetRequest>, VaultError> {
        let data = self
            .shards
            .lock()
            .get(uri)
            .cloned()
            .ok_or_else(|| VaultError::IoHttp(format!("no object at {uri}")))?;
        Ok(Box::new(MemoryGet { data, pos: 0 }))
    }
}

struct MemoryPut {
    store: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    uri: String,
    buffer: Vec<u8>,
}

#[async_trait]
impl PutRequest for MemoryPut {
    async fn write_chunk(&mut self, bytes: &[u8]) -> Result<(), VaultError> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    async fn finish(self: Box<Self>) -> Result<(), VaultError> {
        self.store.lock().insert(self.uri, self.buffer);
        Ok(())
    }
}

struct MemoryGet {
    data: Vec<u8>,
    pos: usize,
}

#[async_trait]
impl GetRequest for MemoryGet {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, VaultError> {
        let remaining = self.data.len() - self.pos;
        let n = remaining.min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
