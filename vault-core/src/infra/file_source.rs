// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File-Backed Upload Source
//!
//! The [`vault_domain::Source`] adapter the demo binary hands to
//! [`crate::pipeline::upload::UploadPipeline`]: an open file plus its
//! on-disk length, so the upload worker's reported-vs-measured size check
//! in pass 1 has something real to compare against.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use vault_domain::error::VaultError;
use vault_domain::ports::Source;

pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VaultError> {
        let file = File::open(path).map_err(VaultError::io_source)?;
        let len = file.metadata().map_err(VaultError::io_source)?.len();
        Ok(FileSource { file, len })
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for FileSource {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl Source for FileSource {
    fn len(&self) -> u64 {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_on_disk_length() {
        let mut path = std::env::temp_dir();
        path.push("vault-file-source-test.bin");
        std::fs::write(&path, b"hello world").unwrap();

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.len(), 11);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_source_error() {
        let result = FileSource::open("/no/such/vault-file-source-fixture");
        assert!(matches!(result, Err(VaultError::IoSource(_))));
    }
}
