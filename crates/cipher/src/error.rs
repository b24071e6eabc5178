use thiserror::Error;

/// Failure modes surfaced by this crate. None of these ever panic; a bad
/// buffer or a malformed Server-ID always comes back as one of these.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum CipherError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("invalid Server-ID encoding")]
    InvalidEncoding,
}

pub type Result<T> = std::result::Result<T, CipherError>;
