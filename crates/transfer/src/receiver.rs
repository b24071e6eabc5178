use std::io::Write;
use std::path::{Path, PathBuf};

use platform::FilesystemAdapter;

use crate::error::Result;

/// Drives inbound chunk writes for a single file body. On cancellation or
/// write failure, further `MSG_FILE_DATA` are accepted but dropped until
/// `finish` is called, which deletes the partial file rather than leaving
/// a truncated one behind.
pub struct ChunkReceiver<'a> {
    writer: Box<dyn Write + Send>,
    path: PathBuf,
    fs: &'a dyn FilesystemAdapter,
    chunks_received: u32,
    total_chunks: u32,
    failed: bool,
}

impl<'a> ChunkReceiver<'a> {
    pub fn create(fs: &'a dyn FilesystemAdapter, path: &Path, total_chunks: u32) -> Result<Self> {
        let writer = fs.open_write(path)?;
        Ok(Self { writer, path: path.to_path_buf(), fs, chunks_received: 0, total_chunks, failed: false })
    }

    /// Writes one chunk. Once a prior write has failed, further chunks are
    /// silently dropped (the caller keeps consuming `MSG_FILE_DATA` until
    /// `MSG_FILE_END`, per the drop-then-delete contract).
    pub fn write_chunk(&mut self, data: &[u8]) {
        if self.failed {
            return;
        }
        if let Err(_err) = self.writer.write_all(data) {
            self.failed = true;
        } else {
            self.chunks_received += 1;
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.chunks_received >= self.total_chunks
    }

    /// Finalizes the transfer. `keep` should be `true` only when the
    /// terminating `MSG_FILE_END` arrived, all chunks landed, and the
    /// transfer was not cancelled; otherwise the partial file is deleted.
    pub fn finish(self, keep: bool) -> Result<()> {
        drop(self.writer);
        if !keep || self.failed || !self.is_complete() {
            let _ = self.fs.delete(&self.path);
        }
        Ok(())
    }
}
