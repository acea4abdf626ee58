// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Ports to the collaborators this crate treats as opaque (§1 Out of
//! scope): bucket URI resolution, HTTP transport, and the upload source
//! handle. `vault-core` provides the concrete adapters.

pub mod bucket;
pub mod http;
pub mod source;

pub use bucket::BucketSet;
pub use http::{GetRequest, HttpClient, PutRequest};
pub use source::Source;
