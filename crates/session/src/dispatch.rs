//! Pure decode-and-classify step for one inbound peer frame, kept separate
//! from socket I/O so it can be driven directly in tests.

use platform::FrameBuffer;
use wire::{
    MSG_CLIPBOARD_FILES, MSG_CLIPBOARD_REQ, MSG_CLIPBOARD_TEXT, MSG_DISCONNECT, MSG_FILE_ACK, MSG_FILE_DATA,
    MSG_FILE_END, MSG_FILE_NONE, MSG_FILE_REQ, MSG_FILE_START, MSG_FOLDER_END, MSG_FOLDER_ENTRY,
    MSG_FOLDER_START, MSG_FULL_SCREEN_REQ, MSG_KEYBOARD_EVENT, MSG_MOUSE_EVENT, MSG_PING, MSG_PONG,
    MSG_SCREEN_UPDATE, PeerFrame,
};

use crate::clipboard_message;
use crate::error::{Result, SessionError};
use crate::event::SessionEvent;
use crate::input_message;
use crate::screen_message;
use crate::transfer_message;

/// Dispatches `frame` against session context. `previous_frame` is the
/// receiver-side composite buffer screen updates are applied into; it is
/// `None` on the controller side (which does not apply updates to a
/// previous-frame buffer the way the sender's does). Protocol violations in
/// framing (bad lengths, bad UTF-8) surface as `Err`; geometry/RLE failures
/// confined to a single screen-update rectangle surface as
/// `Ok(ScreenUpdateDropped)` per the failure-semantics table.
pub fn dispatch_incoming(
    frame: &PeerFrame,
    previous_frame: Option<&mut FrameBuffer>,
    remote_width: u16,
    remote_height: u16,
) -> Result<SessionEvent> {
    match frame.message_kind {
        MSG_SCREEN_UPDATE => {
            let Some(dest) = previous_frame else {
                return Err(SessionError::Protocol("screen update received with no composite buffer"));
            };
            match screen_message::apply_update_payload(dest, &frame.payload) {
                Some(()) => Ok(SessionEvent::ScreenUpdateApplied),
                None => Ok(SessionEvent::ScreenUpdateDropped),
            }
        }
        MSG_FULL_SCREEN_REQ => Ok(SessionEvent::FullScreenRequested),
        MSG_MOUSE_EVENT => {
            input_message::decode_mouse(&frame.payload, remote_width, remote_height).map(SessionEvent::Input)
        }
        MSG_KEYBOARD_EVENT => input_message::decode_key(&frame.payload).map(SessionEvent::Input),
        MSG_CLIPBOARD_TEXT | MSG_CLIPBOARD_FILES => {
            clipboard_message::decode(&frame.payload).map(SessionEvent::ClipboardReceived)
        }
        MSG_CLIPBOARD_REQ => Ok(SessionEvent::ClipboardRequested),
        MSG_FILE_REQ => Ok(SessionEvent::FileRequested),
        MSG_FILE_NONE => Ok(SessionEvent::FileNone),
        MSG_FILE_START => transfer_message::decode_file_start(&frame.payload).map(SessionEvent::FileStartReceived),
        MSG_FILE_DATA => Ok(SessionEvent::FileDataReceived(frame.payload.clone())),
        MSG_FILE_END => Ok(SessionEvent::FileEndReceived),
        MSG_FILE_ACK => transfer_message::decode_file_ack(&frame.payload).map(SessionEvent::FileAckReceived),
        MSG_FOLDER_START => {
            transfer_message::decode_folder_start(&frame.payload).map(SessionEvent::FolderStartReceived)
        }
        MSG_FOLDER_ENTRY => {
            transfer_message::decode_folder_entry(&frame.payload).map(SessionEvent::FolderEntryReceived)
        }
        MSG_FOLDER_END => Ok(SessionEvent::FolderEndReceived),
        MSG_PING => Ok(SessionEvent::Ping),
        MSG_PONG => Ok(SessionEvent::Pong),
        MSG_DISCONNECT => Ok(SessionEvent::PeerDisconnected),
        _ => Err(SessionError::Protocol("unknown message kind")),
    }
}

#[cfg(test)]
mod tests {
    use platform::{InputEvent, MouseButton};
    use wire::{MSG_DISCONNECT, MSG_KEYBOARD_EVENT, MSG_PING};

    use super::*;

    #[test]
    fn ping_is_classified_without_consuming_a_buffer() {
        let frame = PeerFrame::new(MSG_PING, 0, Vec::new());
        assert_eq!(dispatch_incoming(&frame, None, 1920, 1080).unwrap(), SessionEvent::Ping);
    }

    #[test]
    fn disconnect_is_classified() {
        let frame = PeerFrame::new(MSG_DISCONNECT, 0, Vec::new());
        assert_eq!(dispatch_incoming(&frame, None, 1920, 1080).unwrap(), SessionEvent::PeerDisconnected);
    }

    #[test]
    fn keyboard_event_decodes_into_input() {
        let payload = input_message::encode_key(0x1B, 0x01, false, false).to_vec();
        let frame = PeerFrame::new(MSG_KEYBOARD_EVENT, 0, payload);
        let event = dispatch_incoming(&frame, None, 1920, 1080).unwrap();
        assert_eq!(
            event,
            SessionEvent::Input(InputEvent::Key { virtual_key: 0x1B, scan_code: 0x01, down: false, extended: false })
        );
    }

    #[test]
    fn mouse_event_without_remote_dims_still_clamps() {
        let payload = input_message::encode_mouse(InputEvent::MouseButton { button: MouseButton::Middle, down: true });
        let frame = PeerFrame::new(MSG_MOUSE_EVENT, 0, payload.to_vec());
        let event = dispatch_incoming(&frame, None, 1920, 1080).unwrap();
        assert_eq!(event, SessionEvent::Input(InputEvent::MouseButton { button: MouseButton::Middle, down: true }));
    }

    #[test]
    fn screen_update_without_a_buffer_is_a_protocol_error() {
        let frame = PeerFrame::new(MSG_SCREEN_UPDATE, 0, Vec::new());
        assert!(dispatch_incoming(&frame, None, 1920, 1080).is_err());
    }

    #[test]
    fn unknown_message_kind_is_a_protocol_error() {
        let frame = PeerFrame::new(0xEE, 0, Vec::new());
        assert!(dispatch_incoming(&frame, None, 1920, 1080).is_err());
    }
}
