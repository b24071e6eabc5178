//! The relay protocol's 8-byte frame: `{ messageKind: u8, flags: u8,
//! reserved: u16, payloadLength: u32 }` followed by payload. `flags` bit 0
//! marks the payload as ciphered; the relay itself never sets or inspects
//! that bit beyond forwarding it.

use crate::cancel::CancelToken;
use crate::error::{Result, WireError};
use crate::io::{exact_read, exact_write};
use cipher::Key;
use std::net::TcpStream;
use std::time::Duration;

pub const HEADER_LEN: usize = 8;
pub const CIPHERED_FLAG: u8 = 0b0000_0001;
pub const RELAY_IDLE_DEADLINE: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_PAYLOAD: u32 = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RelayFrame {
    pub message_kind: u8,
    pub flags: u8,
    pub payload: Vec<u8>,
}

impl RelayFrame {
    #[must_use]
    pub fn new(message_kind: u8, payload: Vec<u8>) -> Self {
        Self { message_kind, flags: 0, payload }
    }

    #[must_use]
    pub fn ciphered(message_kind: u8, payload: Vec<u8>) -> Self {
        let flags = if payload.is_empty() { 0 } else { CIPHERED_FLAG };
        Self { message_kind, flags, payload }
    }

    fn header_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[0] = self.message_kind;
        header[1] = self.flags;
        header[2..4].copy_from_slice(&0u16.to_le_bytes());
        header[4..8].copy_from_slice(&(self.payload.len() as u32).to_le_bytes());
        header
    }
}

/// Writes a relay frame, encrypting the payload in place first when `key`
/// is given and the frame requests ciphering. The relay itself calls this
/// with `key = None`: it forwards opaque bytes and never ciphers them.
pub fn write_relay_frame(
    stream: &TcpStream,
    mut frame: RelayFrame,
    key: Option<&Key>,
    cancel: &CancelToken,
) -> Result<()> {
    if frame.flags & CIPHERED_FLAG != 0 && !frame.payload.is_empty() {
        if let Some(key) = key {
            cipher::encrypt_in_place(&mut frame.payload, key)
                .map_err(|_| WireError::InvalidArgument("cipher rejected relay payload"))?;
        }
    }
    exact_write(stream, &frame.header_bytes(), cancel)?;
    exact_write(stream, &frame.payload, cancel)
}

/// Reads one relay frame. When `key` is `Some`, a ciphered payload is
/// decrypted before being returned; passing `None` (as the relay itself
/// does) returns the payload exactly as received, opaque.
pub fn read_relay_frame(
    stream: &TcpStream,
    max_payload: u32,
    idle_deadline: Duration,
    key: Option<&Key>,
    cancel: &CancelToken,
) -> Result<RelayFrame> {
    let mut header = [0u8; HEADER_LEN];
    exact_read(stream, &mut header, idle_deadline, cancel)?;

    let message_kind = header[0];
    let flags = header[1];
    let payload_length = u32::from_le_bytes(header[4..8].try_into().unwrap());

    if payload_length > max_payload {
        return Err(WireError::Protocol("relay payload length exceeds maximum"));
    }

    let mut payload = vec![0u8; payload_length as usize];
    if !payload.is_empty() {
        exact_read(stream, &mut payload, idle_deadline, cancel)?;
        if flags & CIPHERED_FLAG != 0 {
            if let Some(key) = key {
                cipher::decrypt_in_place(&mut payload, key)
                    .map_err(|_| WireError::Protocol("cipher rejected relay payload"))?;
            }
        }
    }

    Ok(RelayFrame { message_kind, flags, payload })
}
