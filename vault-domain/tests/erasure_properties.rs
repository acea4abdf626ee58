// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Property tests for the erasure coder: round-trip under arbitrary
//! excluded sets, and Cauchy submatrix invertibility across field widths.

use proptest::prelude::*;
use std::io::Cursor;
use vault_domain::erasure::Coder;
use vault_domain::gf::{GfField, Matrix};

fn encode_decode(n: usize, k: usize, w: usize, data: &[u8], excluded: &[usize]) -> Vec<u8> {
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

proptest! {
    #[test]
    fn round_trip_any_excluded_pair(
        data in proptest::collection::vec(any::<u8>(), 0..600),
        excluded_raw in proptest::collection::hash_set(0usize..5, 2..=2),
    ) {
        let excluded: Vec<usize> = excluded_raw.into_iter().collect();
        let out = encode_decode(5, 3, 4, &data, &excluded);
        prop_assert_eq!(out, data);
    }

    #[test]
    fn cauchy_every_subset_of_size_k_inverts(n_plus_k_seed in 3usize..40) {
        let n = n_plus_k_seed;
        let k = (n / 2).max(1).min(n - 1);
        let m = GfField::standard_m_for(n).unwrap();
        let field = std::sync::Arc::new(GfField::new(m).unwrap());
        let cauchy = Matrix::cauchy(n, k, field).unwrap();

        // Spot-check a handful of K-subsets rather than all C(n, k), which
        // blows up for larger n.
        for start in 0..(n - k + 1).min(6) {
            let rows: Vec<usize> = (start..start + k).collect();
            let sub = cauchy.submatrix(&rows, &(0..k).collect::<Vec<_>>());
            prop_assert!(sub.invert().is_ok());
        }
    }
}
