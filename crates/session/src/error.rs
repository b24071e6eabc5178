use thiserror::Error;

/// The session-level error taxonomy. Lower layers (wire, transfer, cipher,
/// flist, platform) each report a narrower slice of this; the `From` impls
/// below fold them into the single surface a caller of this crate sees.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("protocol violation: {0}")]
    Protocol(&'static str),

    #[error("authentication failed")]
    AuthFailed,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("connection lost: {0}")]
    ConnectionLost(#[source] wire::WireError),

    #[error("partner left the session")]
    PartnerLeft,

    #[error("relay connection lost")]
    RelayLost,

    #[error("relay rejected registration: duplicate id")]
    DuplicateId,

    #[error("requested partner is already paired")]
    Busy,

    #[error("requested partner id is not registered")]
    NotFound,

    #[error("operation cancelled")]
    Cancelled,

    #[error("file too large: {size} bytes exceeds the {limit} byte maximum")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("file not found")]
    FileNotFound,

    #[error("read error: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("write error: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("create error: {0}")]
    CreateError(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;

impl From<wire::WireError> for SessionError {
    fn from(err: wire::WireError) -> Self {
        match err {
            wire::WireError::InvalidArgument(m) => Self::InvalidArgument(m),
            wire::WireError::Protocol(m) => Self::Protocol(m),
            wire::WireError::ConnectionClosed => Self::ConnectionClosed,
            wire::WireError::Cancelled => Self::Cancelled,
            wire::WireError::ConnectionLost(_) | wire::WireError::Timeout => Self::ConnectionLost(err),
        }
    }
}

impl From<cipher::CipherError> for SessionError {
    fn from(err: cipher::CipherError) -> Self {
        match err {
            cipher::CipherError::InvalidArgument(m) => Self::InvalidArgument(m),
            cipher::CipherError::InvalidEncoding => Self::Protocol("invalid Server-ID or Peer-ID encoding"),
        }
    }
}

impl From<transfer::TransferError> for SessionError {
    fn from(err: transfer::TransferError) -> Self {
        match err {
            transfer::TransferError::FileTooLarge { size, limit } => Self::FileTooLarge { size, limit },
            transfer::TransferError::InvalidFilename(_) => Self::Protocol("invalid transfer filename"),
            transfer::TransferError::NoDestinationFolder => Self::CreateError(std::io::Error::other(
                "no usable destination folder could be resolved",
            )),
            transfer::TransferError::Cancelled => Self::Cancelled,
            transfer::TransferError::Io(io_err) => Self::WriteError(io_err),
            transfer::TransferError::Platform(_) => {
                Self::CreateError(std::io::Error::other("platform adapter unavailable"))
            }
        }
    }
}

impl From<flist::FlistError> for SessionError {
    fn from(err: flist::FlistError) -> Self {
        match err {
            flist::FlistError::PathTraversal(_) => Self::Protocol("folder entry path traversal"),
            flist::FlistError::Io { source, .. } => Self::ReadError(source),
        }
    }
}

impl From<platform::PlatformError> for SessionError {
    fn from(err: platform::PlatformError) -> Self {
        match err {
            platform::PlatformError::NotAvailable => {
                Self::CreateError(std::io::Error::other("platform capability not available"))
            }
            platform::PlatformError::Io(io_err) => Self::ReadError(io_err),
        }
    }
}
