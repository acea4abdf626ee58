// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Upload Pipeline (C5)
//!
//! One dedicated worker thread per pipeline instance, driven by a
//! [`BoundedQueue`]. The worker builds its own single-threaded Tokio
//! runtime to drive the async `BucketSet`/`HttpClient` ports from otherwise
//! synchronous chunk processing — the same split the teacher draws between
//! its domain services (sync) and infrastructure adapters (async).
//!
//! **Reverse-linked headers.** A chunk's header embeds the *next* chunk's
//! encrypted-blob digest and AEAD material, so header *i* cannot be
//! finalized until chunk *i+1*'s ciphertext exists. This forces two passes
//! over the source: pass 1 computes every chunk's plaintext digest and the
//! full-file digest; pass 2 walks chunks `chunk_count-1 downto 0`,
//! encrypting, erasure-encoding, and linking each one to the one already
//! built. See [`crate::queue`] and [`vault_domain::chunk::header`].

use std::cell::RefCell;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;

use rand::RngCore;
use tracing::{debug, info, instrument, warn};

use vault_domain::chunk::{ChunkHeader, ChunkName, NextChunkLink};
use vault_domain::crypto::AeadMaterial;
use vault_domain::error::VaultError;
use vault_domain::ports::{BucketSet, HttpClient, PutRequest, Source};
use vault_domain::{Coder, StoredFile, UploadCallback};

use crate::config::VaultConfig;
use crate::infra::aead;
use crate::nonce::NonceGenerator;
use crate::queue::BoundedQueue;

struct UploadItem {
    source: Box<dyn Source>,
    reported_size: Option<u64>,
    callback: Box<dyn UploadCallback>,
}

/// What `stop` does with work still sitting in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Finish files already dequeued; drop everything still queued.
    Cancel,
    /// Let the queue drain normally before the worker exits.
    Drain,
}

pub struct UploadPipeline {
    config: VaultConfig,
    coder: Arc<Coder>,
    buckets: Arc<dyn BucketSet>,
    http: Arc<dyn HttpClient>,
    queue: Arc<BoundedQueue<UploadItem>>,
    worker: Option<JoinHandle<()>>,
}

impl UploadPipeline {
    /// Allocates the queue and constructs the erasure coder for `config`.
    pub fn init(
        config: VaultConfig,
        buckets: Arc<dyn BucketSet>,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self, VaultError> {
        config.validate()?;
        let coder = Arc::new(Coder::new(config.n, config.k, config.word_width)?);
        let queue = Arc::new(BoundedQueue::new(config.channel_depth));
        Ok(UploadPipeline {
            config,
            coder,
            buckets,
            http,
            queue,
            worker: None,
        })
    }

    /// Spawns the worker thread. Must be called at most once.
    pub fn start(&mut self) {
        assert!(self.worker.is_none(), "UploadPipeline::start called more than once");
        let queue = self.queue.clone();
        let coder = self.coder.clone();
        let buckets = self.buckets.clone();
        let http = self.http.clone();
        let config = self.config.clone();
        self.worker = Some(std::thread::spawn(move || {
            worker_loop(queue, coder, buckets, http, config);
        }));
    }

    /// Enqueues a file for upload. `reported_size`, if given, is
    /// debug-checked against `source.len()`.
    pub fn upload_file(
        &self,
        source: Box<dyn Source>,
        reported_size: Option<u64>,
        callback: Box<dyn UploadCallback>,
    ) {
        self.queue.push(UploadItem {
            source,
            reported_size,
            callback,
        });
    }

    /// Signals the worker to stop, optionally dropping queued work, and
    /// joins the thread.
    pub fn stop(&mut self, mode: StopMode) {
        if mode == StopMode::Cancel {
            self.queue.clear();
        }
        self.queue.signal_stop();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    queue: Arc<BoundedQueue<UploadItem>>,
    coder: Arc<Coder>,
    buckets: Arc<dyn BucketSet>,
    http: Arc<dyn HttpClient>,
    config: VaultConfig,
) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build upload worker runtime");
    let nonce_gen = NonceGenerator::new();

    while let Some(mut item) = queue.pop_blocking() {
        let callback = Rc::new(RefCell::new(std::mem::replace(
            &mut item.callback,
            NullCallback::boxed(),
        )));
        match process_file(&rt, &coder, &buckets, &http, &config, &nonce_gen, &mut item, &callback) {
            Ok(stored_file) => {
                callback.borrow_mut().update(100);
                callback.borrow_mut().close(Ok(stored_file));
            }
            Err(err) => {
                if err.is_recoverable() {
                    warn!(error = %err, "upload of queued file failed, continuing with next item");
                    callback.borrow_mut().close(Err(err.to_string()));
                } else {
                    tracing::error!(error = %err, "fatal error in upload worker, stopping pipeline");
                    callback.borrow_mut().close(Err(err.to_string()));
                    break;
                }
            }
        }
    }
}

/// Placeholder swapped into `item.callback` while the real one is held by
/// an `Rc` for the duration of one file; never observed by a caller.
struct NullCallback;
impl NullCallback {
    fn boxed() -> Box<dyn UploadCallback> {
        Box::new(NullCallback)
    }
}
impl vault_domain::ProgressCallback for NullCallback {
    fn update(&mut self, _percentage: u8) {}
}
impl UploadCallback for NullCallback {
    fn close(&mut self, _outcome: Result<StoredFile, String>) {}
}

#[instrument(skip_all)]
fn process_file(
    rt: &tokio::runtime::Runtime,
    coder: &Coder,
    buckets: &Arc<dyn BucketSet>,
    http: &Arc<dyn HttpClient>,
    config: &VaultConfig,
    nonce_gen: &NonceGenerator,
    item: &mut UploadItem,
    callback: &Rc<RefCell<Box<dyn UploadCallback>>>,
) -> Result<StoredFile, VaultError> {
    item.source.seek(SeekFrom::Start(0)).map_err(VaultError::io_source)?;
    let measured = item.source.len();
    if let Some(reported) = item.reported_size {
        if reported != measured {
            let err = VaultError::SizeMismatch { reported, measured };
            debug_assert!(false, "{err}");
            warn!(error = %err, "trusting measured source size");
        }
    }

    let chunk_count = config.chunk_size.chunk_count(measured);
    info!(chunk_count, measured, "starting upload");

    let mut headers: Vec<ChunkHeader> = (0..chunk_count).map(|_| ChunkHeader::empty()).collect();
    hash_chunks(item.source.as_mut(), config, chunk_count, measured, &mut headers)?;

    let total_estimate = estimate_total_encoded(coder, config, chunk_count, measured);
    let progress = Rc::new(RefCell::new(ProgressTracker::new(total_estimate)));

    let mut stored_file: Option<StoredFile> = None;
    for i in (0..chunk_count).rev() {
        let len = config.chunk_size.len_of_chunk(i, measured) as usize;
        let mut blob = headers[i as usize].to_bytes();
        if len > 0 {
            item.source
                .seek(SeekFrom::Start(config.chunk_size.start_offset(i)))
                .map_err(VaultError::io_source)?;
            let mut payload = vec![0u8; len];
            item.source.read_exact(&mut payload).map_err(VaultError::io_source)?;
            blob.extend_from_slice(&payload);
        }

        let nonce = nonce_gen.next();
        let mut key = [0u8; 32];
        rand::rng().fill_bytes(&mut key);
        let tag = aead::encrypt(&mut blob, &key, &nonce)?;
        let material = AeadMaterial { tag, nonce, key };
        let chunk_name = ChunkName::of_encrypted_blob(&blob);

        if i > 0 {
            headers[(i - 1) as usize].next = NextChunkLink {
                chunk_blob_digest: *chunk_name.as_bytes(),
                encryption: material.clone(),
            };
        } else {
            stored_file = Some(StoredFile {
                first_name: chunk_name,
                encryption: material.clone(),
                chunk_count,
            });
        }

        debug!(chunk = i, %chunk_name, "dispersing chunk across shards");
        let uris = rt.block_on(buckets.resolve_uris(chunk_name))?;
        let mut puts: Vec<Box<dyn PutRequest>> =
            rt.block_on(open_puts(http.as_ref(), &uris))?;

        {
            let mut writers: Vec<PutWriter<'_>> = puts
                .iter_mut()
                .map(|p| PutWriter {
                    rt,
                    put: p.as_mut(),
                    progress: progress.clone(),
                    callback,
                })
                .collect();
            coder.encode(&mut Cursor::new(blob), &mut writers)?;
        }

        for put in puts.into_iter() {
            rt.block_on(put.finish())?;
        }
    }

    stored_file.ok_or_else(|| VaultError::Internal("upload produced no StoredFile".into()))
}

async fn open_puts(http: &dyn HttpClient, uris: &[String]) -> Result<Vec<Box<dyn PutRequest>>, VaultError> {
    let mut puts = Vec::with_capacity(uris.len());
    for uri in uris {
        puts.push(http.put(uri).await?);
    }
    Ok(puts)
}

/// Reads the source once in `chunk_size`-sized blocks, filling
/// `headers[i].current_chunk_digest` and the rolling full-file digest.
fn hash_chunks(
    source: &mut dyn Source,
    config: &VaultConfig,
    chunk_count: u64,
    measured: u64,
    headers: &mut [ChunkHeader],
) -> Result<(), VaultError> {
    use sha2::{Digest, Sha256};

    source.seek(SeekFrom::Start(0)).map_err(VaultError::io_source)?;
    let mut file_hasher = Sha256::new();
    let mut actual_blocks = 0u64;

    for i in 0..chunk_count {
        let len = config.chunk_size.len_of_chunk(i, measured) as usize;
        let mut buf = vec![0u8; len];
        if len > 0 {
            source.read_exact(&mut buf).map_err(VaultError::io_source)?;
        }
        let mut chunk_hasher = Sha256::new();
        chunk_hasher.update(&buf);
        headers[i as usize].current_chunk_digest = chunk_hasher.finalize().into();
        file_hasher.update(&buf);
        actual_blocks += 1;
    }

    if actual_blocks != chunk_count {
        return Err(VaultError::ChunkCountMismatch {
            expected: chunk_count,
            actual: actual_blocks,
        });
    }

    headers[0].full_file_digest = file_hasher.finalize().into();
    Ok(())
}

fn estimate_total_encoded(coder: &Coder, config: &VaultConfig, chunk_count: u64, measured: u64) -> u64 {
    (0..chunk_count)
        .map(|i| {
            let payload_len = config.chunk_size.len_of_chunk(i, measured);
            coder.total_encoded_size(ChunkHeader::ENCODED_SIZE as u64 + payload_len)
        })
        .sum()
}

struct ProgressTracker {
    bytes_uploaded: u64,
    total_estimate: u64,
}

impl ProgressTracker {
    fn new(total_estimate: u64) -> Self {
        ProgressTracker {
            bytes_uploaded: 0,
            total_estimate,
        }
    }

    fn record(&mut self, n: u64) -> u8 {
        self.bytes_uploaded += n;
        let total = self.total_estimate.max(1);
        ((self.bytes_uploaded.saturating_mul(100)) / total).min(100) as u8
    }
}

struct PutWriter<'a> {
    rt: &'a tokio::runtime::Runtime,
    put: &'a mut dyn PutRequest,
    progress: Rc<RefCell<ProgressTracker>>,
    callback: &'a Rc<RefCell<Box<dyn UploadCallback>>>,
}

impl Write for PutWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.rt
            .block_on(self.put.write_chunk(buf))
            .map_err(std::io::Error::other)?;
        let pct = self.progress.borrow_mut().record(buf.len() as u64);
        self.callback.borrow_mut().update(pct);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
