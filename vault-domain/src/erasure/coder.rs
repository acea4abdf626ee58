// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Streaming Erasure Coder
//!
//! Drives the Cauchy generator (`crate::gf`) over a stream: `encode` fans
//! one reader out to `N` shard writers, `decode` recovers the original
//! stream from any `K` of the `N` shards.
//!
//! Every GF(2^m) element becomes `m` parallel word-wide "lanes" (see
//! [`crate::gf::matrix::Matrix::to_binary`]): a data block is `K` input rows
//! of `m` lanes each, a code block is `N` output rows of `m` lanes each, and
//! each lane carries one big-endian word of `word_width` bytes. This is what
//! lets the coder's inner loop be XOR of words instead of field
//! multiplication.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::error::VaultError;
use crate::gf::{BinaryMatrix, GfField, Matrix};

/// Allowed word widths, in bytes, for a single lane.
pub const WORD_WIDTHS: [usize; 3] = [1, 4, 8];

/// A configured `(N, K)` Cauchy erasure coder over a fixed word width.
pub struct Coder {
    n: usize,
    k: usize,
    word_width: usize,
    m: u32,
    field: Arc<GfField>,
    generator: Matrix,
    encode_binary: BinaryMatrix,
}

impl Coder {
    /// Builds a coder for `N` total shards, `K` required to reconstruct,
    /// reading/writing `word_width`-byte words per lane.
    pub fn new(n: usize, k: usize, word_width: usize) -> Result<Self, VaultError> {
        if k == 0 || k >= n {
            return Err(VaultError::InvalidConfiguration(format!(
                "K must satisfy 0 < K < N (got N={n}, K={k})"
            )));
        }
        if !WORD_WIDTHS.contains(&word_width) {
            return Err(VaultError::InvalidConfiguration(format!(
                "word width must be one of {WORD_WIDTHS:?}, got {word_width}"
            )));
        }
        let m = GfField::standard_m_for(n + k)?;
        let field = Arc::new(GfField::new(m)?);
        let generator = Matrix::cauchy(n, k, field.clone())?;
        let encode_binary = generator.to_binary();

        Ok(Coder {
            n,
            k,
            word_width,
            m,
            field,
            generator,
            encode_binary,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn word_width(&self) -> usize {
        self.word_width
    }

    /// Bytes of plaintext consumed per data block: `w * m * K`.
    pub fn data_block_bytes(&self) -> usize {
        self.word_width * self.m as usize * self.k
    }

    /// Bytes written across all `N` shards per code block: `w * m * N`.
    pub fn code_block_bytes(&self) -> usize {
        self.word_width * self.m as usize * self.n
    }

    /// Bytes written to a single shard per code block: `w * m`.
    pub fn stride_bytes(&self) -> usize {
        self.word_width * self.m as usize
    }

    /// `ceil(plain_bytes / data_block) * code_block`, used as a progress
    /// denominator for the total bytes an encode will produce across all
    /// shards.
    pub fn total_encoded_size(&self, plain_bytes: u64) -> u64 {
        let data_block = self.data_block_bytes() as u64;
        let code_block = self.code_block_bytes() as u64;
        if plain_bytes == 0 {
            return code_block;
        }
        plain_bytes.div_ceil(data_block) * code_block
    }

    fn lanes_per_block(&self) -> usize {
        self.m as usize * self.k
    }

    /// Streams `input` through the encoder, writing one shard per entry in
    /// `writers` (must have exactly `N` entries). Returns the total number
    /// of plaintext bytes consumed.
    pub fn encode<R: Read, W: Write>(
        &self,
        input: &mut R,
        writers: &mut [W],
    ) -> Result<u64, VaultError> {
        if writers.len() != self.n {
            return Err(VaultError::InvalidConfiguration(format!(
                "encode requires exactly {} writers, got {}",
                self.n,
                writers.len()
            )));
        }

        let w = self.word_width;
        let lanes_in = self.lanes_per_block();
        let data_block_bytes = self.data_block_bytes();
        let mut total_read: u64 = 0;

        loop {
            let mut buf = vec![0u8; data_block_bytes];
            let n_read = read_fill(input, &mut buf)?;
            let is_final = n_read < data_block_bytes;
            total_read += n_read as u64;

            let mut words = vec![0u64; lanes_in];
            for (lane, word) in words.iter_mut().enumerate() {
                *word = be_word(&buf[lane * w..(lane + 1) * w]);
            }

            if is_final {
                let final_group_len = if n_read == 0 {
                    0
                } else if n_read % w == 0 {
                    w
                } else {
                    n_read % w
                };
                let last = lanes_in - 1;
                words[last] = (words[last] & !0xFF) | (final_group_len as u64 & 0xFF);
            }

            for out_lane in 0..(self.m as usize * self.n) {
                let mut acc = 0u64;
                for &col in self.encode_binary.lanes_for_row(out_lane) {
                    acc ^= words[col];
                }
                let writer_idx = out_lane / self.m as usize;
                write_be_word(&mut writers[writer_idx], acc, w)?;
            }

            if is_final {
                break;
            }
        }

        Ok(total_read)
    }

    /// Streams `K` surviving shard readers (`readers`, in ascending shard
    /// index order matching `rows_keep`) back into `output`, given the
    /// `excluded` shard indices that are absent. `excluded.len()` must equal
    /// `N - K`.
    pub fn decode<R: Read, W: Write>(
        &self,
        readers: &mut [R],
        excluded: &[usize],
        output: &mut W,
    ) -> Result<u64, VaultError> {
        if excluded.len() != self.n - self.k {
            return Err(VaultError::ExcludedSetSizeMismatch {
                actual: excluded.len(),
                expected: self.n - self.k,
            });
        }
        if readers.len() != self.k {
            return Err(VaultError::InvalidConfiguration(format!(
                "decode requires exactly {} readers, got {}",
                self.k,
                readers.len()
            )));
        }

        let rows_keep: Vec<usize> = (0..self.n).filter(|i| !excluded.contains(i)).collect();
        let all_cols: Vec<usize> = (0..self.k).collect();
        let decode_sub = self.generator.submatrix(&rows_keep, &all_cols);
        let decode_matrix = decode_sub.invert()?;
        let decode_binary = decode_matrix.to_binary();

        let w = self.word_width;
        let lanes = self.lanes_per_block();
        let data_block_bytes = self.data_block_bytes();
        let mut total_written: u64 = 0;
        let mut pending: Option<Vec<u8>> = None;

        loop {
            let mut words = vec![0u64; lanes];
            let mut eof = false;

            for lane in 0..lanes {
                let reader_idx = lane / self.m as usize;
                let mut wbuf = vec![0u8; w];
                let n = read_fill(&mut readers[reader_idx], &mut wbuf)?;
                // `encode` writes the same stride to every one of the N writers for
                // every data block, including the final (short) one, so all K kept
                // readers here are the same length and run out together. Reader 0's
                // first word (lane 0) is always read before any other reader is
                // touched this iteration, so that's where the shared EOF shows up —
                // not the last lane, which belongs to a reader not yet exhausted.
                if lane == 0 && n == 0 {
                    eof = true;
                    break;
                }
                if n != w {
                    return Err(VaultError::MalformedHeader(format!(
                        "shard {reader_idx} ended mid-word (expected {w} bytes, got {n})"
                    )));
                }
                words[lane] = be_word(&wbuf);
            }

            if eof {
                break;
            }

            let mut recovered = vec![0u8; data_block_bytes];
            for out_lane in 0..lanes {
                let mut acc = 0u64;
                for &col in decode_binary.lanes_for_row(out_lane) {
                    acc ^= words[col];
                }
                let bytes = acc.to_be_bytes();
                recovered[out_lane * w..(out_lane + 1) * w].copy_from_slice(&bytes[8 - w..]);
            }

            if let Some(prev) = pending.take() {
                output.write_all(&prev).map_err(VaultError::io_output)?;
                total_written += prev.len() as u64;
            }
            pending = Some(recovered);
        }

        if let Some(last_block) = pending {
            let final_len = last_block[data_block_bytes - 1] as usize;
            output
                .write_all(&last_block[..final_len])
                .map_err(VaultError::io_output)?;
            total_written += final_len as u64;
        }

        Ok(total_written)
    }
}

/// Reads until `buf` is full or the reader is exhausted, returning the
/// number of bytes actually read (short iff the stream ended).
fn read_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, VaultError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).map_err(VaultError::io_source)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn be_word(bytes: &[u8]) -> u64 {
    let mut padded = [0u8; 8];
    padded[8 - bytes.len()..].copy_from_slice(bytes);
    u64::from_be_bytes(padded)
}

fn write_be_word<W: Write>(writer: &mut W, word: u64, width: usize) -> Result<(), VaultError> {
    let bytes = word.to_be_bytes();
    writer.write_all(&bytes[8 - width..]).map_err(VaultError::io_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(n: usize, k: usize, w: usize, data: &[u8], excluded: &[usize]) -> Vec<u8> {
        let coder = Coder::new(n, k, w).unwrap();
        let mut writers: Vec<Cursor<Vec<u8>>> = (0..n).map(|_| Cursor::new(Vec::new())).collect();
        let mut input = Cursor::new(data.to_vec());
        coder.encode(&mut input, &mut writers).unwrap();

        let keep: Vec<usize> = (0..n).filter(|i| !excluded.contains(i)).collect();
        let mut readers: Vec<Cursor<Vec<u8>>> =
            keep.iter().map(|&i| Cursor::new(writers[i].get_ref().clone())).collect();

        let mut out = Vec::new();
        coder.decode(&mut readers, excluded, &mut out).unwrap();
        out
    }

    #[test]
    fn scenario_five_three_eight_short_text() {
        let data = b"The quick brown fox jumps over the lazy dog.";
        assert_eq!(data.len(), 44);
        let coder = Coder::new(5, 3, 8).unwrap();
        assert_eq!(coder.stride_bytes(), 64);
        assert_eq!(coder.total_encoded_size(44), 64);

        let out = roundtrip(5, 3, 8, data, &[0, 3]);
        assert_eq!(out, data);
    }

    #[test]
    fn scenario_three_two_one_empty_input() {
        let out = roundtrip(3, 2, 1, b"", &[2]);
        assert!(out.is_empty());
    }

    #[test]
    fn recovers_from_any_excluded_combination() {
        let data = b"0123456789abcdef0123456789abcdef";
        for excluded in [vec![0, 1], vec![1, 2], vec![0, 2], vec![2, 3]] {
            let out = roundtrip(5, 3, 4, data, &excluded);
            assert_eq!(out, data, "failed with excluded={excluded:?}");
        }
    }

    #[test]
    fn roundtrip_across_chunk_boundaries() {
        let coder = Coder::new(5, 3, 8).unwrap();
        let block = coder.data_block_bytes();
        for len in [0usize, 1, block - 1, block, block + 1, 10 * block + 17] {
            let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let out = roundtrip(5, 3, 8, &data, &[1, 4]);
            assert_eq!(out.len(), data.len(), "length mismatch at len={len}");
            assert_eq!(out, data, "mismatch at len={len}");
        }
    }

    #[test]
    fn rejects_wrong_excluded_set_size() {
        let coder = Coder::new(5, 3, 8).unwrap();
        let mut readers: Vec<Cursor<Vec<u8>>> =
            (0..3).map(|_| Cursor::new(Vec::new())).collect();
        let mut out = Vec::new();
        let err = coder.decode(&mut readers, &[0], &mut out).unwrap_err();
        assert!(matches!(err, VaultError::ExcludedSetSizeMismatch { .. }));
    }

    #[test]
    fn coder_linearity_holds_over_binary_projection() {
        let coder = Coder::new(5, 3, 1).unwrap();
        let lanes = coder.m as usize * coder.k;

        let a: Vec<u64> = (0..lanes).map(|i| (i * 7 + 3) as u64 & 0xFF).collect();
        let b: Vec<u64> = (0..lanes).map(|i| (i * 13 + 1) as u64 & 0xFF).collect();
        let a_xor_b: Vec<u64> = a.iter().zip(&b).map(|(x, y)| x ^ y).collect();

        let apply = |words: &[u64]| -> Vec<u64> {
            (0..coder.m as usize * coder.n)
                .map(|row| {
                    coder
                        .encode_binary
                        .lanes_for_row(row)
                        .iter()
                        .fold(0u64, |acc, &c| acc ^ words[c])
                })
                .collect()
        };

        let ga = apply(&a);
        let gb = apply(&b);
        let g_a_xor_b = apply(&a_xor_b);
        let ga_xor_gb: Vec<u64> = ga.iter().zip(&gb).map(|(x, y)| x ^ y).collect();
        assert_eq!(g_a_xor_b, ga_xor_gb);
    }
}
