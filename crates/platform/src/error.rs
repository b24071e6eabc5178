use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("capability not available on this platform")]
    NotAvailable,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
