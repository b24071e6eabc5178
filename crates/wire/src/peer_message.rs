//! Peer-frame `messageKind` byte values.
//!
//! `MSG_FILE_NONE` is deliberately assigned `0x1B` rather than reusing the
//! clipboard-request value: the byte that historically served both purposes
//! made a "no files in clipboard" reply indistinguishable on the wire from a
//! clipboard-request, which is the kind of collision this rework exists to
//! clean up.

pub const MSG_HANDSHAKE: u8 = 0x08;
pub const MSG_HANDSHAKE_ACK: u8 = 0x09;
pub const MSG_DISCONNECT: u8 = 0x0A;

pub const MSG_SCREEN_UPDATE: u8 = 0x01;
pub const MSG_FULL_SCREEN_REQ: u8 = 0x0C;

pub const MSG_MOUSE_EVENT: u8 = 0x03;
pub const MSG_KEYBOARD_EVENT: u8 = 0x04;

pub const MSG_CLIPBOARD_TEXT: u8 = 0x05;
pub const MSG_CLIPBOARD_FILES: u8 = 0x15;
pub const MSG_CLIPBOARD_REQ: u8 = 0x16;

pub const MSG_FILE_REQ: u8 = 0x1A;
pub const MSG_FILE_START: u8 = 0x10;
pub const MSG_FILE_DATA: u8 = 0x11;
pub const MSG_FILE_END: u8 = 0x12;
pub const MSG_FILE_ACK: u8 = 0x14;
pub const MSG_FILE_NONE: u8 = 0x1B;

pub const MSG_FOLDER_START: u8 = 0x17;
pub const MSG_FOLDER_ENTRY: u8 = 0x18;
pub const MSG_FOLDER_END: u8 = 0x19;

pub const MSG_PING: u8 = 0x06;
pub const MSG_PONG: u8 = 0x07;

/// Magic value required in `MSG_HANDSHAKE` / `MSG_HANDSHAKE_ACK`: ASCII
/// `"RD2K"` packed little-endian.
pub const HANDSHAKE_MAGIC: u32 = 0x4B32_4452;

pub const PROTOCOL_VERSION_MAJOR: u8 = 1;
pub const PROTOCOL_VERSION_MINOR: u8 = 0;

pub const COMPRESSION_NONE: u8 = 0x00;
pub const COMPRESSION_RLE: u8 = 0x01;
