use thiserror::Error;

/// Error taxonomy surfaced by frame I/O. Kept intentionally narrow — this
/// crate only ever returns the subset of the wider session error taxonomy
/// that a bare frame codec can itself detect.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("protocol violation: {0}")]
    Protocol(&'static str),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("connection lost: {0}")]
    ConnectionLost(#[source] std::io::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("idle timeout waiting for data")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, WireError>;
