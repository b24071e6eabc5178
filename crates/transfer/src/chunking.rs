use crate::error::{Result, TransferError};

/// Protocol-fixed chunk size; changing this breaks interop with an
/// unmodified remote peer.
pub const CHUNK_SIZE: u32 = 32768;

/// Largest file the transfer protocol accepts.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024 * 1024;

/// Validates `size` against the protocol maximum and returns the chunk
/// count a `MSG_FILE_START` should advertise.
pub fn total_chunks(size: u64) -> Result<u32> {
    if size > MAX_FILE_SIZE {
        return Err(TransferError::FileTooLarge { size, limit: MAX_FILE_SIZE });
    }
    let chunk_size = u64::from(CHUNK_SIZE);
    Ok(u32::try_from(size.div_ceil(chunk_size)).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_has_no_short_final_chunk() {
        assert_eq!(total_chunks(CHUNK_SIZE as u64 * 3).unwrap(), 3);
    }

    #[test]
    fn partial_final_chunk_rounds_up() {
        assert_eq!(total_chunks(CHUNK_SIZE as u64 * 3 + 1).unwrap(), 4);
    }

    #[test]
    fn zero_byte_file_has_zero_chunks() {
        assert_eq!(total_chunks(0).unwrap(), 0);
    }

    #[test]
    fn oversize_file_is_rejected_at_initiation() {
        assert!(total_chunks(MAX_FILE_SIZE + 1).is_err());
    }

    #[test]
    fn file_at_exactly_the_limit_is_accepted() {
        assert!(total_chunks(MAX_FILE_SIZE).is_ok());
    }
}
