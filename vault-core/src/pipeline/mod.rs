// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Upload and download worker pipelines (C5/C6).

pub mod download;
pub mod upload;

pub use download::DownloadPipeline;
pub use upload::{StopMode, UploadPipeline};
