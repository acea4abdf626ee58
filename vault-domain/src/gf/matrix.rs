// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Binary-Field Matrix Algebra
//!
//! Cauchy generator construction, row/column selection, Gauss-Jordan
//! inversion, and binary projection over `GF(2^m)`. This is the component
//! the streaming erasure coder (`crate::erasure::coder`) drives: the coder
//! never multiplies field elements on its hot path, it only XORs the
//! word-sized lanes selected by a [`BinaryMatrix`] produced here once per
//! encode/decode setup.

use crate::error::VaultError;
use crate::gf::field::GfField;
use std::sync::Arc;

/// A matrix over `GF(2^m)`.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<u32>,
    field: Arc<GfField>,
}

impl Matrix {
    fn zeros(rows: usize, cols: usize, field: Arc<GfField>) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0; rows * cols],
            field,
        }
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> u32 {
        self.data[r * self.cols + c]
    }

    #[inline]
    fn set(&mut self, r: usize, c: usize, v: u32) {
        self.data[r * self.cols + c] = v;
    }

    pub fn field(&self) -> &GfField {
        &self.field
    }

    /// Builds the `N x K` systematic Cauchy generator:
    /// `M[i][j] = 1 / (x_i XOR y_j)` with `x_i = i`, `y_j = N + j`, both
    /// distinct elements of `GF(2^m)`.
    ///
    /// Every `K x K` submatrix of a Cauchy matrix built this way is
    /// invertible, which is exactly the property erasure decoding relies on:
    /// any `K` of the `N` shards determine a unique, invertible decode
    /// matrix.
    pub fn cauchy(n: usize, k: usize, field: Arc<GfField>) -> Result<Self, VaultError> {
        let order = field.order() as usize;
        if n + k > order {
            return Err(VaultError::InvalidConfiguration(format!(
                "N+K = {} exceeds field order 2^{} = {}",
                n + k,
                field.m(),
                order
            )));
        }
        let mut m = Matrix::zeros(n, k, field.clone());
        for i in 0..n {
            for j in 0..k {
                let x_i = i as u32;
                let y_j = (n + j) as u32;
                let denom = field.add(x_i, y_j);
                if denom == 0 {
                    return Err(VaultError::Internal(
                        "Cauchy construction produced a zero denominator; x and y ranges must be disjoint".into(),
                    ));
                }
                let inv = field.inv(denom)?;
                m.set(i, j, inv);
            }
        }
        Ok(m)
    }

    /// Selects a submatrix by row and column index sets, preserving the
    /// order given in `rows_keep`/`cols_keep`.
    pub fn submatrix(&self, rows_keep: &[usize], cols_keep: &[usize]) -> Self {
        let mut out = Matrix::zeros(rows_keep.len(), cols_keep.len(), self.field.clone());
        for (out_r, &r) in rows_keep.iter().enumerate() {
            for (out_c, &c) in cols_keep.iter().enumerate() {
                out.set(out_r, out_c, self.get(r, c));
            }
        }
        out
    }

    /// Inverts a square matrix over `GF(2^m)` via Gauss-Jordan elimination.
    /// Fails only if the matrix is singular, which should not happen for a
    /// `K x K` submatrix of a Cauchy matrix with disjoint `x`/`y` ranges.
    pub fn invert(&self) -> Result<Self, VaultError> {
        if self.rows != self.cols {
            return Err(VaultError::Internal("invert requires a square matrix".into()));
        }
        let n = self.rows;
        let field = self.field.clone();

        // Augmented [A | I], eliminated in place.
        let mut aug = vec![0u32; n * 2 * n];
        for r in 0..n {
            for c in 0..n {
                aug[r * 2 * n + c] = self.get(r, c);
            }
            aug[r * 2 * n + n + r] = 1;
        }

        for col in 0..n {
            // Find a nonzero pivot in this column at or below `col`.
            let pivot_row = (col..n).find(|&r| aug[r * 2 * n + col] != 0);
            let pivot_row = pivot_row.ok_or_else(|| VaultError::ErasureSingular(vec![]))?;
            if pivot_row != col {
                for c in 0..2 * n {
                    aug.swap(col * 2 * n + c, pivot_row * 2 * n + c);
                }
            }

            let pivot = aug[col * 2 * n + col];
            let pivot_inv = field.inv(pivot)?;
            for c in 0..2 * n {
                aug[col * 2 * n + c] = field.mul(aug[col * 2 * n + c], pivot_inv);
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = aug[r * 2 * n + col];
                if factor == 0 {
                    continue;
                }
                for c in 0..2 * n {
                    let sub = field.mul(factor, aug[col * 2 * n + c]);
                    aug[r * 2 * n + c] = field.add(aug[r * 2 * n + c], sub);
                }
            }
        }

        let mut out = Matrix::zeros(n, n, field);
        for r in 0..n {
            for c in 0..n {
                out.set(r, c, aug[r * 2 * n + n + c]);
            }
        }
        Ok(out)
    }

    /// Projects this `GF(2^m)` matrix to an `(rows*m) x (cols*m)` binary
    /// matrix: each element `A[i][j]` becomes an `m x m` block whose column
    /// `b` is the bit vector of `A[i][j] * 2^b` (multiplication by the `b`-th
    /// standard basis element). This lets the coder replace field
    /// multiplication with XOR of selected word-sized lanes.
    pub fn to_binary(&self) -> BinaryMatrix {
        let m = self.field.m() as usize;
        let bin_rows = self.rows * m;
        let bin_cols = self.cols * m;
        let mut rows: Vec<Vec<usize>> = Vec::with_capacity(bin_rows);

        for br in 0..bin_rows {
            let i = br / m;
            let bit_i = (br % m) as u32;
            let mut selected = Vec::new();
            for bc in 0..bin_cols {
                let j = bc / m;
                let bit_j = (bc % m) as u32;
                let elem = self.get(i, j);
                if elem != 0 && self.field.basis_mul_bit(elem, bit_j, bit_i) {
                    selected.push(bc);
                }
            }
            rows.push(selected);
        }

        BinaryMatrix {
            rows: bin_rows,
            cols: bin_cols,
            lanes: rows,
        }
    }
}

/// A binary (`GF(2)`) matrix produced by [`Matrix::to_binary`], stored as a
/// sparse list of "on" column indices per row (`lanes`). This is the shape
/// the streaming coder actually consumes: row `r`'s lane list names exactly
/// the input lanes to XOR together to produce output lane `r`.
#[derive(Debug, Clone)]
pub struct BinaryMatrix {
    pub rows: usize,
    pub cols: usize,
    lanes: Vec<Vec<usize>>,
}

impl BinaryMatrix {
    /// Input lane indices to XOR to produce output lane `row`.
    pub fn lanes_for_row(&self, row: usize) -> &[usize] {
        &self.lanes[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(m: u32) -> Arc<GfField> {
        Arc::new(GfField::new(m).unwrap())
    }

    #[test]
    fn cauchy_every_kxk_submatrix_is_invertible() {
        let f = field(4);
        let (n, k) = (5, 3);
        let cauchy = Matrix::cauchy(n, k, f).unwrap();

        // Enumerate all K-subsets of the N rows.
        let indices: Vec<usize> = (0..n).collect();
        for combo in combinations(&indices, k) {
            let sub = cauchy.submatrix(&combo, &(0..k).collect::<Vec<_>>());
            assert!(sub.invert().is_ok(), "submatrix for rows {combo:?} should invert");
        }
    }

    #[test]
    fn invert_then_multiply_yields_identity() {
        let f = field(4);
        let cauchy = Matrix::cauchy(5, 3, f.clone()).unwrap();
        let sub = cauchy.submatrix(&[0, 1, 2], &[0, 1, 2]);
        let inv = sub.invert().unwrap();

        // (inv * sub) should be the identity matrix.
        let k = 3;
        for r in 0..k {
            for c in 0..k {
                let mut acc = 0u32;
                for t in 0..k {
                    acc = f.add(acc, f.mul(inv.get(r, t), sub.get(t, c)));
                }
                let expected = if r == c { 1 } else { 0 };
                assert_eq!(acc, expected, "identity check failed at ({r},{c})");
            }
        }
    }

    #[test]
    fn singular_matrix_errors() {
        let f = field(3);
        let mut m = Matrix::zeros(2, 2, f);
        m.set(0, 0, 1);
        m.set(0, 1, 1);
        m.set(1, 0, 1);
        m.set(1, 1, 1); // duplicate rows -> singular
        assert!(m.invert().is_err());
    }

    #[test]
    fn binary_projection_has_expected_dimensions() {
        let f = field(4);
        let cauchy = Matrix::cauchy(5, 3, f).unwrap();
        let bin = cauchy.to_binary();
        assert_eq!(bin.rows, 5 * 4);
        assert_eq!(bin.cols, 3 * 4);
    }

    fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
        if k == 0 {
            return vec![vec![]];
        }
        if items.is_empty() {
            return vec![];
        }
        let mut out = Vec::new();
        let (first, rest) = (items[0], &items[1..]);
        for mut tail in combinations(rest, k - 1) {
            tail.insert(0, first);
            out.push(tail);
        }
        out.extend(combinations(rest, k));
        out
    }
}
