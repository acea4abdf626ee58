// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault CLI
//!
//! Demo binary wiring `vault-bootstrap`'s CLI/exit-code layer to
//! `vault-core`'s upload/download pipelines over the in-memory bucket/HTTP
//! pair. `upload`/`download` operate on a JSON manifest file so they can be
//! run as separate invocations against a real backend; `roundtrip` proves
//! the round trip end-to-end within one process, which is the only thing
//! the in-memory backend can meaningfully demonstrate on its own.
//!
//! SIGINT/SIGTERM/SIGHUP are wired to `stop(StopMode::Cancel)` on whichever
//! pipeline is currently running: in-flight chunk processing still runs to
//! completion (see the cancellation note in the upload/download pipelines),
//! but no further queued work starts.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use vault_bootstrap::{ExitCode, ValidatedCli, ValidatedCommand};
use vault_core::infra::{FileSource, MemoryBucketSet, MemoryStore};
use vault_core::{DownloadPipeline, StopMode, UploadPipeline, VaultConfig};
use vault_domain::{BucketSet, HttpClient, ProgressCallback, StoredFile, VaultError};

/// Not exposed on the CLI; the in-memory transport never actually blocks
/// on it, but [`VaultConfig::validate`] requires a nonzero value.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How often the main thread wakes to check the shutdown flag while
/// waiting on a running pipeline.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Whether the run completed normally or was cut short by a shutdown signal.
enum RunOutcome {
    Completed,
    Interrupted,
}

fn main() -> std::process::ExitCode {
    let cli = match vault_bootstrap::bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("CLI error: {e}");
            return exit_code_to_process(ExitCode::UsageError);
        }
    };
    vault_core::infra::logging::install_subscriber(cli.verbose);

    let shutdown = spawn_signal_watcher();

    match run(cli, &shutdown) {
        Ok(RunOutcome::Completed) => exit_code_to_process(ExitCode::Success),
        Ok(RunOutcome::Interrupted) => exit_code_to_process(ExitCode::Interrupted),
        Err(err) => exit_code_to_process(vault_bootstrap::result_to_exit_code(Err(err))),
    }
}

fn exit_code_to_process(code: ExitCode) -> std::process::ExitCode {
    std::process::ExitCode::from(code.as_i32() as u8)
}

/// Spawns a background thread that parks on a tiny current-thread Tokio
/// runtime waiting for SIGINT/SIGTERM/SIGHUP (Ctrl-C on Windows), and
/// returns the flag it sets once one arrives.
fn spawn_signal_watcher() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let flag_for_thread = flag.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build signal-watcher runtime");
        rt.block_on(async move {
            let handler = vault_bootstrap::signals::create_signal_handler();
            handler
                .wait_for_signal(Box::new(move || {
                    flag_for_thread.store(true, Ordering::SeqCst);
                }))
                .await;
        });
    });
    flag
}

fn run(cli: ValidatedCli, shutdown: &Arc<AtomicBool>) -> Result<RunOutcome, VaultError> {
    let config = VaultConfig::new(
        cli.n,
        cli.k,
        cli.word_width as usize,
        (cli.chunk_size_mb as u64) * 1024 * 1024,
        cli.channel_depth,
        DEFAULT_REQUEST_TIMEOUT_SECS,
    )?;

    let store = MemoryStore::new();
    let buckets: Arc<dyn BucketSet> = Arc::new(MemoryBucketSet::new(config.n));
    let http: Arc<dyn HttpClient> = Arc::new(store);

    match cli.command {
        ValidatedCommand::Upload { input, manifest } => {
            upload(config, buckets, http, &input, &manifest, shutdown)
        }
        ValidatedCommand::Download { manifest, output } => {
            download(config, buckets, http, &manifest, &output, shutdown)
        }
        ValidatedCommand::Roundtrip { input, output } => {
            roundtrip(config, buckets, http, &input, &output, shutdown)
        }
    }
}

/// Blocks on `rx`, polling `shutdown` every [`SHUTDOWN_POLL_INTERVAL`]. On a
/// shutdown signal, cancels `pipeline`'s queue and returns `Interrupted`
/// without waiting for `rx` to resolve.
fn wait_or_interrupt<T>(
    rx: &mpsc::Receiver<Result<T, String>>,
    stop: impl FnOnce(StopMode),
    shutdown: &AtomicBool,
) -> Result<Option<T>, VaultError> {
    loop {
        match rx.recv_timeout(SHUTDOWN_POLL_INTERVAL) {
            Ok(outcome) => return outcome.map(Some).map_err(VaultError::Internal),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(VaultError::Internal(
                    "worker dropped callback without closing".into(),
                ))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if shutdown.load(Ordering::SeqCst) {
                    info!("shutdown signal received, cancelling pipeline");
                    stop(StopMode::Cancel);
                    return Ok(None);
                }
            }
        }
    }
}

fn upload(
    config: VaultConfig,
    buckets: Arc<dyn BucketSet>,
    http: Arc<dyn HttpClient>,
    input: &Path,
    manifest_path: &Path,
    shutdown: &AtomicBool,
) -> Result<RunOutcome, VaultError> {
    let mut pipeline = UploadPipeline::init(config, buckets, http)?;
    pipeline.start();

    let source = FileSource::open(input)?;
    let (tx, rx) = mpsc::channel();
    pipeline.upload_file(Box::new(source), None, Box::new(UploadResultCallback { tx }));

    let outcome = wait_or_interrupt(&rx, |mode| pipeline.stop(mode), shutdown)?;
    let Some(stored_file) = outcome else {
        return Ok(RunOutcome::Interrupted);
    };
    pipeline.stop(StopMode::Drain);

    let json = serde_json::to_vec_pretty(&stored_file).map_err(|e| VaultError::IoOutput(e.to_string()))?;
    std::fs::write(manifest_path, json).map_err(VaultError::io_output)?;
    info!(manifest = %manifest_path.display(), "upload complete");
    Ok(RunOutcome::Completed)
}

fn download(
    config: VaultConfig,
    buckets: Arc<dyn BucketSet>,
    http: Arc<dyn HttpClient>,
    manifest_path: &Path,
    output: &Path,
    shutdown: &AtomicBool,
) -> Result<RunOutcome, VaultError> {
    let stored_file = read_manifest(manifest_path)?;
    let mut pipeline = DownloadPipeline::init(config, buckets, http)?;
    pipeline.start();

    let file = std::fs::File::create(output).map_err(VaultError::io_output)?;
    let (tx, rx) = mpsc::channel();
    pipeline.download_file(
        stored_file,
        Box::new(std::io::BufWriter::new(file)),
        Box::new(DownloadResultCallback { tx }),
    );

    let outcome = wait_or_interrupt(&rx, |mode| pipeline.stop(mode), shutdown)?;
    if outcome.is_none() {
        return Ok(RunOutcome::Interrupted);
    }
    pipeline.stop(StopMode::Drain);
    info!(output = %output.display(), "download complete");
    Ok(RunOutcome::Completed)
}

fn roundtrip(
    config: VaultConfig,
    buckets: Arc<dyn BucketSet>,
    http: Arc<dyn HttpClient>,
    input: &Path,
    output: &Path,
    shutdown: &AtomicBool,
) -> Result<RunOutcome, VaultError> {
    let mut upload_pipeline = UploadPipeline::init(config.clone(), buckets.clone(), http.clone())?;
    upload_pipeline.start();

    let source = FileSource::open(input)?;
    let (tx, rx) = mpsc::channel();
    upload_pipeline.upload_file(Box::new(source), None, Box::new(UploadResultCallback { tx }));
    let outcome = wait_or_interrupt(&rx, |mode| upload_pipeline.stop(mode), shutdown)?;
    let Some(stored_file) = outcome else {
        return Ok(RunOutcome::Interrupted);
    };
    upload_pipeline.stop(StopMode::Drain);

    let mut download_pipeline = DownloadPipeline::init(config, buckets, http)?;
    download_pipeline.start();

    let file = std::fs::File::create(output).map_err(VaultError::io_output)?;
    let (tx, rx) = mpsc::channel();
    download_pipeline.download_file(
        stored_file,
        Box::new(std::io::BufWriter::new(file)),
        Box::new(DownloadResultCallback { tx }),
    );
    let outcome = wait_or_interrupt(&rx, |mode| download_pipeline.stop(mode), shutdown)?;
    if outcome.is_none() {
        return Ok(RunOutcome::Interrupted);
    }
    download_pipeline.stop(StopMode::Drain);

    info!(input = %input.display(), output = %output.display(), "round trip complete");
    Ok(RunOutcome::Completed)
}

fn read_manifest(path: &Path) -> Result<StoredFile, VaultError> {
    let bytes = std::fs::read(path).map_err(VaultError::io_source)?;
    serde_json::from_slice(&bytes).map_err(|e| VaultError::MalformedHeader(e.to_string()))
}

struct UploadResultCallback {
    tx: mpsc::Sender<Result<StoredFile, String>>,
}

impl ProgressCallback for UploadResultCallback {
    fn update(&mut self, percentage: u8) {
        info!(percentage, "upload progress");
    }
}

impl vault_domain::UploadCallback for UploadResultCallback {
    fn close(&mut self, outcome: Result<StoredFile, String>) {
        let _ = self.tx.send(outcome);
    }
}

struct DownloadResultCallback {
    tx: mpsc::Sender<Result<(), String>>,
}

impl ProgressCallback for DownloadResultCallback {
    fn update(&mut self, percentage: u8) {
        info!(percentage, "download progress");
    }
}

impl vault_domain::DownloadCallback for DownloadResultCallback {
    fn close(&mut self, outcome: Result<(), String>) {
        let _ = self.tx.send(outcome);
    }
}
