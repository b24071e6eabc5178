//! Framed binary codec for both wire protocols in play: the 12-byte peer
//! frame and the 8-byte relay frame it can be tunneled inside of.

mod cancel;
mod checksum;
mod error;
mod io;
mod peer_frame;
mod peer_message;
mod relay_frame;
mod relay_message;

pub use cancel::CancelToken;
pub use checksum::checksum;
pub use error::{Result, WireError};
pub use peer_frame::{
    read_peer_frame, write_peer_frame, PeerFrame, BULK_IDLE_DEADLINE, CONTROL_IDLE_DEADLINE,
    DEFAULT_MAX_PAYLOAD as PEER_DEFAULT_MAX_PAYLOAD, HEADER_LEN as PEER_HEADER_LEN,
};
pub use peer_message::*;
pub use relay_frame::{
    read_relay_frame, write_relay_frame, RelayFrame, CIPHERED_FLAG,
    DEFAULT_MAX_PAYLOAD as RELAY_DEFAULT_MAX_PAYLOAD, HEADER_LEN as RELAY_HEADER_LEN,
    RELAY_IDLE_DEADLINE,
};
pub use relay_message::*;
