use platform::InputEvent;

use crate::clipboard_message::ClipboardPayload;
use crate::transfer_message::{FileStart, FolderStart};

/// What happened as a result of dispatching one inbound peer frame. The
/// caller decides how to act on each variant (apply to UI, feed a transfer
/// context, reply with a frame of its own); this type only classifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A screen-update rectangle was decoded and applied to the local
    /// composite buffer.
    ScreenUpdateApplied,
    /// A screen-update rectangle was dropped per the failure-semantics
    /// table (bad geometry or truncated RLE); the session continues.
    ScreenUpdateDropped,
    /// The peer wants a full-screen resync; caller should zero its
    /// previous-frame buffer and run an immediate capture tick.
    FullScreenRequested,
    Input(InputEvent),
    ClipboardReceived(ClipboardPayload),
    ClipboardRequested,
    FileRequested,
    FileNone,
    FileStartReceived(FileStart),
    FileDataReceived(Vec<u8>),
    FileEndReceived,
    FileAckReceived(u32),
    FolderStartReceived(FolderStart),
    FolderEntryReceived(flist::FolderEntry),
    FolderEndReceived,
    Ping,
    Pong,
    /// The peer asked to disconnect gracefully; the session should enter
    /// `Closing` and stop reading further frames.
    PeerDisconnected,
}
