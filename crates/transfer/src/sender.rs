use std::io::Read;

use bandwidth::Throttle;

use crate::cancel::TransferCancelToken;
use crate::chunking::{total_chunks, CHUNK_SIZE};
use crate::error::{Result, TransferError};

/// Drives outbound chunking of a single file body: reads `CHUNK_SIZE`
/// chunks from `source`, applying the adaptive pacing schedule between
/// chunks and honoring cancellation. The caller is responsible for framing
/// each chunk as `MSG_FILE_DATA` and for emitting `MSG_FILE_START` /
/// `MSG_FILE_END` around the returned iterator.
pub struct ChunkSender<R> {
    source: R,
    throttle: Throttle,
    total_chunks: u32,
    chunk_index: u32,
    cancel: TransferCancelToken,
}

impl<R: Read> ChunkSender<R> {
    pub fn new(source: R, total_size: u64, cancel: TransferCancelToken) -> Result<Self> {
        let chunks = total_chunks(total_size)?;
        Ok(Self { source, throttle: Throttle::new(total_size), total_chunks: chunks, chunk_index: 0, cancel })
    }

    #[must_use]
    pub const fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Returns the next chunk, or `Ok(None)` once every chunk has been
    /// produced. Sleeps between chunks per the pacing schedule and waits
    /// for drain after the final chunk.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if self.cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }
        if self.chunk_index >= self.total_chunks {
            return Ok(None);
        }

        let mut buf = vec![0u8; CHUNK_SIZE as usize];
        let mut filled = 0usize;
        while filled < buf.len() {
            let read = self.source.read(&mut buf[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        buf.truncate(filled);

        self.chunk_index += 1;
        self.throttle.on_chunk_sent();
        if self.chunk_index == self.total_chunks {
            self.throttle.wait_for_drain();
        }
        Ok(Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn splits_source_into_exact_and_final_short_chunk() {
        let data = vec![7u8; CHUNK_SIZE as usize * 2 + 100];
        let mut sender = ChunkSender::new(Cursor::new(data.clone()), data.len() as u64, TransferCancelToken::new()).unwrap();
        assert_eq!(sender.total_chunks(), 3);

        let first = sender.next_chunk().unwrap().unwrap();
        let second = sender.next_chunk().unwrap().unwrap();
        let third = sender.next_chunk().unwrap().unwrap();
        assert_eq!(first.len(), CHUNK_SIZE as usize);
        assert_eq!(second.len(), CHUNK_SIZE as usize);
        assert_eq!(third.len(), 100);
        assert!(sender.next_chunk().unwrap().is_none());
    }

    #[test]
    fn cancellation_is_observed_before_the_next_chunk() {
        let data = vec![1u8; CHUNK_SIZE as usize * 2];
        let cancel = TransferCancelToken::new();
        let mut sender = ChunkSender::new(Cursor::new(data), CHUNK_SIZE as u64 * 2, cancel.clone()).unwrap();
        sender.next_chunk().unwrap();
        cancel.cancel();
        assert!(matches!(sender.next_chunk(), Err(TransferError::Cancelled)));
    }
}
