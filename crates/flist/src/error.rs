use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlistError {
    #[error("path traversal: entry {0:?} would escape the destination root")]
    PathTraversal(String),
    #[error("io error walking {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FlistError>;
