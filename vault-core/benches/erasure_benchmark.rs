// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Erasure Coder Throughput Benchmarks
//!
//! Measures `Coder::encode`/`Coder::decode` across chunk sizes and N/K
//! configurations, since the binary-field matrix multiply in the coder's
//! inner loop is the hot path both pipelines spend most of their CPU time
//! in (see `vault_domain::erasure::coder`).

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vault_domain::Coder;

fn sample_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("erasure_encode");
    for &payload_len in &[4 * 1024usize, 64 * 1024, 1024 * 1024] {
        let coder = Coder::new(5, 3, 8).expect("valid coder config");
        let payload = sample_payload(payload_len);
        group.bench_with_input(BenchmarkId::new("n5_k3", payload_len), &payload, |b, payload| {
            b.iter(|| {
                let mut writers: Vec<Vec<u8>> = (0..5).map(|_| Vec::new()).collect();
                let mut input = Cursor::new(black_box(payload.clone()));
                coder.encode(&mut input, &mut writers).expect("encode succeeds");
                black_box(writers);
            });
        });
    }
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("erasure_decode");
    for &payload_len in &[4 * 1024usize, 64 * 1024, 1024 * 1024] {
        let coder = Coder::new(5, 3, 8).expect("valid coder config");
        let payload = sample_payload(payload_len);
        let mut writers: Vec<Vec<u8>> = (0..5).map(|_| Vec::new()).collect();
        coder
            .encode(&mut Cursor::new(payload.clone()), &mut writers)
            .expect("encode succeeds");
        let excluded = [0usize, 1];
        let keep: Vec<usize> = (0..5).filter(|i| !excluded.contains(i)).collect();

        group.bench_with_input(BenchmarkId::new("n5_k3", payload_len), &writers, |b, writers| {
            b.iter(|| {
                let mut readers: Vec<Cursor<&[u8]>> =
                    keep.iter().map(|&i| Cursor::new(writers[i].as_slice())).collect();
                let mut output = Vec::new();
                coder
                    .decode(&mut readers, &excluded, &mut output)
                    .expect("decode succeeds");
                black_box(output);
            });
        });
    }
    group.finish();
}

fn benchmark_word_widths(c: &mut Criterion) {
    let mut group = c.benchmark_group("erasure_encode_word_width");
    let payload = sample_payload(256 * 1024);
    for &word_width in &[1usize, 4, 8] {
        let coder = Coder::new(5, 3, word_width).expect("valid coder config");
        group.bench_with_input(BenchmarkId::from_parameter(word_width), &payload, |b, payload| {
            b.iter(|| {
                let mut writers: Vec<Vec<u8>> = (0..5).map(|_| Vec::new()).collect();
                let mut input = Cursor::new(black_box(payload.clone()));
                coder.encode(&mut input, &mut writers).expect("encode succeeds");
                black_box(writers);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_encode, benchmark_decode, benchmark_word_widths);
criterion_main!(benches);
