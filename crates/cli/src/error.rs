use std::process::ExitCode;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("initialization failed: {0}")]
    InitFailed(String),
    #[error(transparent)]
    Session(#[from] session::SessionError),
    #[error(transparent)]
    Relay(#[from] relay::RelayError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl CliError {
    /// Exit-code mapping for the relay binary: 0 normal, 1 init failure, 2
    /// invalid argument. The peer binary reuses the same scheme.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidArgument(_) => ExitCode::from(2),
            _ => ExitCode::from(1),
        }
    }
}
