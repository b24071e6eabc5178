//! Wire payload codec for `MSG_MOUSE_EVENT` / `MSG_KEYBOARD_EVENT`.

use platform::{InputEvent, MouseButton};

use crate::error::{Result, SessionError};

const MOUSE_MOVE: u8 = 0;
const MOUSE_BUTTON: u8 = 1;
const MOUSE_WHEEL: u8 = 2;

/// `{ kind: u8, a: i32, b: i32 }` — `kind` selects which of move/button/wheel
/// this is; unused fields in `a`/`b` are zero.
pub const MOUSE_PAYLOAD_LEN: usize = 9;

/// `{ virtualKey: u16, scanCode: u16, down: u8, extended: u8 }`.
pub const KEY_PAYLOAD_LEN: usize = 6;

pub fn encode_mouse(event: InputEvent) -> [u8; MOUSE_PAYLOAD_LEN] {
    let mut buf = [0u8; MOUSE_PAYLOAD_LEN];
    match event {
        InputEvent::MouseMove { x, y } => {
            buf[0] = MOUSE_MOVE;
            buf[1..5].copy_from_slice(&x.to_le_bytes());
            buf[5..9].copy_from_slice(&y.to_le_bytes());
        }
        InputEvent::MouseButton { button, down } => {
            buf[0] = MOUSE_BUTTON;
            buf[1] = match button {
                MouseButton::Left => 0,
                MouseButton::Right => 1,
                MouseButton::Middle => 2,
            };
            buf[5] = u8::from(down);
        }
        InputEvent::MouseWheel { delta } => {
            buf[0] = MOUSE_WHEEL;
            buf[1..5].copy_from_slice(&delta.to_le_bytes());
        }
        InputEvent::Key { .. } => unreachable!("encode_mouse called with a key event"),
    }
    buf
}

/// Decodes a mouse payload, clamping `MouseMove` coordinates into
/// `[0, screen_width) x [0, screen_height)` rather than rejecting the event
/// — an out-of-bounds coordinate never drops the session.
pub fn decode_mouse(payload: &[u8], screen_width: u16, screen_height: u16) -> Result<InputEvent> {
    if payload.len() != MOUSE_PAYLOAD_LEN {
        return Err(SessionError::Protocol("mouse payload has the wrong length"));
    }
    let a = i32::from_le_bytes(payload[1..5].try_into().unwrap());
    let b = i32::from_le_bytes(payload[5..9].try_into().unwrap());

    match payload[0] {
        MOUSE_MOVE => {
            let clamp = |v: i32, max: u16| v.clamp(0, i32::from(max.saturating_sub(1)));
            Ok(InputEvent::MouseMove { x: clamp(a, screen_width), y: clamp(b, screen_height) })
        }
        MOUSE_BUTTON => {
            let button = match payload[1] {
                0 => MouseButton::Left,
                1 => MouseButton::Right,
                2 => MouseButton::Middle,
                _ => return Err(SessionError::Protocol("unknown mouse button code")),
            };
            Ok(InputEvent::MouseButton { button, down: payload[5] != 0 })
        }
        MOUSE_WHEEL => Ok(InputEvent::MouseWheel { delta: a }),
        _ => Err(SessionError::Protocol("unknown mouse event kind")),
    }
}

pub fn encode_key(virtual_key: u16, scan_code: u16, down: bool, extended: bool) -> [u8; KEY_PAYLOAD_LEN] {
    let mut buf = [0u8; KEY_PAYLOAD_LEN];
    buf[0..2].copy_from_slice(&virtual_key.to_le_bytes());
    buf[2..4].copy_from_slice(&scan_code.to_le_bytes());
    buf[4] = u8::from(down);
    buf[5] = u8::from(extended);
    buf
}

pub fn decode_key(payload: &[u8]) -> Result<InputEvent> {
    if payload.len() != KEY_PAYLOAD_LEN {
        return Err(SessionError::Protocol("key payload has the wrong length"));
    }
    Ok(InputEvent::Key {
        virtual_key: u16::from_le_bytes(payload[0..2].try_into().unwrap()),
        scan_code: u16::from_le_bytes(payload[2..4].try_into().unwrap()),
        down: payload[4] != 0,
        extended: payload[5] != 0,
    })
}
