//! Peer session state machine: handshake, typed message dispatch, the
//! host-side input queue, and file/folder transfer driven over a connected
//! socket.

mod clipboard_message;
mod dispatch;
mod error;
mod event;
mod handshake;
mod input_message;
mod input_queue;
mod peer_session;
mod relay_client;
mod screen_message;
mod state;
mod transfer_driver;
mod transfer_message;

pub use clipboard_message::ClipboardPayload;
pub use error::{Result, SessionError};
pub use event::SessionEvent;
pub use handshake::{Handshake, PAYLOAD_LEN as HANDSHAKE_PAYLOAD_LEN};
pub use input_queue::{InputQueue, CAPACITY as INPUT_QUEUE_CAPACITY};
pub use peer_session::PeerSession;
pub use relay_client::{await_partner_connected, register, request_connect};
pub use state::{Role, SessionPhase};
pub use transfer_driver::{receive_file, receive_folder, send_file, send_folder};
pub use transfer_message::{FileStart, FolderStart};
