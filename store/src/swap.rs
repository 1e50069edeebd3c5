//! Append-only swap file for evicted blocks.
//!
//! Each frame is written once per eviction as a run of newline-terminated
//! UTF-8 records, appended at the end of the file. There is no header, index
//! or checksum: offsets live only in the in-memory frame metadata.
//!
//! ```text
//! offset 0     +----------------------+
//!              | frame 3, line 0 \n   |
//!              | frame 3, line 1 \n   |
//!              | ...                  |
//! offset 1830  +----------------------+
//!              | frame 0, line 0 \n   |
//!              | ...                  |
//!              +----------------------+
//! ```
//!
//! The file is created with a hidden, process-unique name and owner-only
//! permissions, and is removed when the store shuts down or is dropped.

use crate::config::{SWAP_FILE_PREFIX, SWAP_FILE_SUFFIX};
use crate::error::{StoreError, StoreResult, SwapOp};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Private temporary file holding flushed frames.
pub(crate) struct SwapFile {
    file: NamedTempFile,
    bytes_written: u64,
}

impl SwapFile {
    /// Create a new swap file in `dir`, or the system temporary directory.
    pub fn create(dir: Option<&Path>) -> StoreResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SWAP_FILE_PREFIX).suffix(SWAP_FILE_SUFFIX);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| StoreError::swap(SwapOp::Create, e))?;

        tracing::debug!(path = %file.path().display(), "created swap file");

        Ok(Self {
            file,
            bytes_written: 0,
        })
    }

    /// Path of the swap file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Total bytes appended so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Append `lines` at the end of the file and flush them to stable storage.
    ///
    /// Returns the offset of the first record.
    pub fn append(&mut self, lines: &[String]) -> StoreResult<u64> {
        let file = self.file.as_file_mut();
        let offset = file
            .seek(SeekFrom::End(0))
            .map_err(|e| StoreError::swap(SwapOp::Seek, e))?;

        let size = lines.iter().map(|l| l.len() + 1).sum();
        let mut records = String::with_capacity(size);
        for line in lines {
            records.push_str(line);
            records.push('\n');
        }

        file.write_all(records.as_bytes())
            .map_err(|e| StoreError::swap(SwapOp::Write, e))?;
        file.sync_data()
            .map_err(|e| StoreError::swap(SwapOp::Sync, e))?;

        self.bytes_written += records.len() as u64;
        Ok(offset)
    }

    /// Read `count` records starting at `offset`.
    ///
    /// `frame` is only used to describe a short read.
    pub fn read(&mut self, frame: usize, offset: u64, count: usize) -> StoreResult<Vec<String>> {
        let file = self.file.as_file_mut();
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| StoreError::swap(SwapOp::Seek, e))?;

        let mut reader = BufReader::new(file);
        let mut lines = Vec::with_capacity(count);
        let mut record = String::new();

        while lines.len() < count {
            record.clear();
            let n = reader
                .read_line(&mut record)
                .map_err(|e| StoreError::swap(SwapOp::Read, e))?;
            if n == 0 || !record.ends_with('\n') {
                return Err(StoreError::Truncated {
                    frame,
                    expected: count,
                    found: lines.len(),
                });
            }
            record.pop();
            lines.push(record.clone());
        }

        Ok(lines)
    }

    /// Close and remove the file.
    pub fn close(self) -> StoreResult<()> {
        let path = self.file.path().to_path_buf();
        self.file
            .close()
            .map_err(|e| StoreError::swap(SwapOp::Remove, e))?;
        tracing::debug!(path = %path.display(), "removed swap file");
        Ok(())
    }
}
