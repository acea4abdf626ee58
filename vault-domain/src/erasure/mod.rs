// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Streaming Cauchy erasure coding: fan a stream out to `N` shards, recover
//! it from any `K`.

pub mod coder;

pub use coder::Coder;
