// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Nonce Generator
//!
//! Per §4.5: a 64-bit monotonically increasing counter concatenated with 4
//! random bytes, forming the 12-byte AES-GCM nonce. The counter guarantees
//! no repeat until it wraps (`2^64` calls); the random suffix makes a
//! collision during any one key's lifetime negligible even across process
//! restarts that reset the counter.

use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct NonceGenerator {
    counter: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        NonceGenerator {
            counter: AtomicU64::new(0),
        }
    }

    /// Produces the next 12-byte nonce: 8 bytes of big-endian counter, then
    /// 4 random bytes.
    pub fn next(&self) -> [u8; 12] {
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut nonce = [0u8; 12];
        nonce[..8].copy_from_slice(&count.to_be_bytes());
        rand::rng().fill_bytes(&mut nonce[8..]);
        nonce
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn counter_is_monotonic() {
        let gen = NonceGenerator::new();
        let mut last_counter = None;
        for _ in 0..1000 {
            let nonce = gen.next();
            let counter = u64::from_be_bytes(nonce[..8].try_into().unwrap());
            if let Some(prev) = last_counter {
                assert_eq!(counter, prev + 1);
            }
            last_counter = Some(counter);
        }
    }

    #[test]
    fn no_repeats_within_a_large_sample() {
        let gen = NonceGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..1 << 16 {
            assert!(seen.insert(gen.next()));
        }
    }
}
