use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("file too large: {size} bytes exceeds the {limit} byte maximum")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("invalid filename {0:?}")]
    InvalidFilename(String),
    #[error("no usable destination folder could be resolved")]
    NoDestinationFolder,
    #[error("transfer cancelled")]
    Cancelled,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("platform capability error: {0}")]
    Platform(#[from] platform::PlatformError),
}

pub type Result<T> = std::result::Result<T, TransferError>;
