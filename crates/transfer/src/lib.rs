mod cancel;
mod chunking;
mod destination;
mod error;
mod filename;
mod receiver;
mod retry;
mod sender;

pub use cancel::TransferCancelToken;
pub use chunking::{total_chunks, CHUNK_SIZE, MAX_FILE_SIZE};
pub use destination::resolve_destination_folder;
pub use error::{Result, TransferError};
pub use filename::validate_filename;
pub use receiver::ChunkReceiver;
pub use retry::{retry_with_backoff, BACKOFF_SCHEDULE_MILLIS};
pub use sender::ChunkSender;
