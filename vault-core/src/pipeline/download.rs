// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Download Pipeline (C6)
//!
//! Mirrors [`crate::pipeline::upload`]: one worker thread driving a
//! single-threaded Tokio runtime for the async `BucketSet`/`HttpClient`
//! ports, wrapped around the synchronous erasure decoder.
//!
//! A download starts from a [`StoredFile`] (the manifest an upload emits)
//! rather than a pre-enumerated chunk name list — every later name and its
//! AEAD material comes from the previous chunk's decoded header, which is
//! the only copy of that information that exists. Decoding a chunk without
//! following its `next` pointer would make the header chain pointless, so
//! that follow step is required, not optional.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;

use rand::seq::index::sample;
use tracing::{debug, info, instrument, warn};

use vault_domain::chunk::{ChunkHeader, ChunkName};
use vault_domain::crypto::AeadMaterial;
use vault_domain::error::VaultError;
use vault_domain::ports::{BucketSet, GetRequest, HttpClient};
use vault_domain::{Coder, DownloadCallback, StoredFile};

use crate::config::VaultConfig;
use crate::infra::aead;
use crate::pipeline::upload::StopMode;
use crate::queue::BoundedQueue;

struct DownloadItem {
    stored: StoredFile,
    output: Box<dyn Write + Send>,
    callback: Box<dyn DownloadCallback>,
}

pub struct DownloadPipeline {
    config: VaultConfig,
    coder: Arc<Coder>,
    buckets: Arc<dyn BucketSet>,
    http: Arc<dyn HttpClient>,
    queue: Arc<BoundedQueue<DownloadItem>>,
    worker: Option<JoinHandle<()>>,
}

impl DownloadPipeline {
    pub fn init(
        config: VaultConfig,
        buckets: Arc<dyn BucketSet>,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self, VaultError> {
        config.validate()?;
        let coder = Arc::new(Coder::new(config.n, config.k, config.word_width)?);
        let queue = Arc::new(BoundedQueue::new(config.channel_depth));
        Ok(DownloadPipeline {
            config,
            coder,
            buckets,
            http,
            queue,
            worker: None,
        })
    }

    pub fn start(&mut self) {
        assert!(self.worker.is_none(), "DownloadPipeline::start called more than once");
        let queue = self.queue.clone();
        let coder = self.coder.clone();
        let buckets = self.buckets.clone();
        let http = self.http.clone();
        let config = self.config.clone();
        self.worker = Some(std::thread::spawn(move || {
            worker_loop(queue, coder, buckets, http, config);
        }));
    }

    /// Enqueues a file for download, starting from its upload manifest.
    /// `output` receives the recovered plaintext, chunk by chunk, in order.
    pub fn download_file(
        &self,
        stored: StoredFile,
        output: Box<dyn Write + Send>,
        callback: Box<dyn DownloadCallback>,
    ) {
        self.queue.push(DownloadItem { stored, output, callback });
    }

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
    queue: Arc<BoundedQueue<DownloadItem>>,
    coder: Arc<Coder>,
    buckets: Arc<dyn BucketSet>,
    http: Arc<dyn HttpClient>,
    config: VaultConfig,
) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build download worker runtime");

    while let Some(mut item) = queue.pop_blocking() {
        let callback = Rc::new(RefCell::new(std::mem::replace(
            &mut item.callback,
            NullCallback::boxed(),
        )));
        let result = process_file(&rt, &coder, &buckets, &http, &config, &mut item, &callback);
        match result {
            Ok(()) => {
                callback.borrow_mut().update(100);
                callback.borrow_mut().close(Ok(()));
            }
            Err(err) => {
                if err.is_recoverable() {
                    warn!(error = %err, "download of queued file failed, continuing with next item");
                    callback.borrow_mut().close(Err(err.to_string()));
                } else {
                    tracing::error!(error = %err, "fatal error in download worker, stopping pipeline");
                    callback.borrow_mut().close(Err(err.to_string()));
                    break;
                }
            }
        }
    }
}

struct NullCallback;
impl NullCallback {
    fn boxed() -> Box<dyn DownloadCallback> {
        Box::new(NullCallback)
    }
}
impl vault_domain::ProgressCallback for NullCallback {
    fn update(&mut self, _percentage: u8) {}
}
impl DownloadCallback for NullCallback {
    fn close(&mut self, _outcome: Result<(), String>) {}
}

#[instrument(skip_all)]
fn process_file(
    rt: &tokio::runtime::Runtime,
    coder: &Coder,
    buckets: &Arc<dyn BucketSet>,
    http: &Arc<dyn HttpClient>,
    config: &VaultConfig,
    item: &mut DownloadItem,
    callback: &Rc<RefCell<Box<dyn DownloadCallback>>>,
) -> Result<(), VaultError> {
    let chunk_count = item.stored.chunk_count;
    info!(chunk_count, "starting download");

    let excluded = sample_excluded(config.n, config.n - config.k);
    let keep: Vec<usize> = (0..config.n).filter(|i| !excluded.contains(i)).collect();

    let mut current_name = item.stored.first_name;
    let mut current_material = item.stored.encryption.clone();

    for chunk_index in 0..chunk_count {
        debug!(chunk = chunk_index, %current_name, "fetching chunk shards");
        let uris = rt.block_on(buckets.resolve_uris(current_name))?;
        let mut gets: Vec<Box<dyn GetRequest>> = rt.block_on(open_gets(http.as_ref(), &uris, &keep))?;

        let mut blob = Vec::new();
        {
            let mut readers: Vec<GetReader<'_>> =
                gets.iter_mut().map(|g| GetReader { rt, get: g.as_mut() }).collect();
            coder.decode(&mut readers, &excluded, &mut blob)?;
        }

        aead::decrypt(&mut blob, &current_material)?;
        let header = ChunkHeader::from_bytes(&blob)?;
        let payload = &blob[ChunkHeader::ENCODED_SIZE..];
        item.output.write_all(payload).map_err(VaultError::io_output)?;

        let pct = (((chunk_index + 1).saturating_mul(100)) / chunk_count.max(1)).min(100) as u8;
        callback.borrow_mut().update(pct);

        if header.next.is_terminal() {
            break;
        }
        current_name = ChunkName::from_bytes(header.next.chunk_blob_digest);
        current_material = header.next.encryption;
    }

    Ok(())
}

fn sample_excluded(n: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    sample(&mut rand::rng(), n, count).into_iter().collect()
}

async fn open_gets(
    http: &dyn HttpClient,
    uris: &[String],
    keep: &[usize],
) -> Result<Vec<Box<dyn GetRequest>>, VaultError> {
    let mut gets = Vec::with_capacity(keep.len());
    for &idx in keep {
        gets.push(http.get(&uris[idx]).await?);
    }
    Ok(gets)
}

struct GetReader<'a> {
    rt: &'a tokio::runtime::Runtime,
    get: &'a mut dyn GetRequest,
}

impl Read for GetReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.rt
            .block_on(self.get.read_chunk(buf))
            .map_err(std::io::Error::other)
    }
}

