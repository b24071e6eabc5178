//! The peer protocol's 12-byte frame: `{ messageKind: u8, flags: u8,
//! reserved: u16, payloadLength: u32, checksum: u32 }` followed by payload.

use crate::cancel::CancelToken;
use crate::checksum::checksum;
use crate::error::{Result, WireError};
use crate::io::{exact_read, exact_write};
use std::net::TcpStream;
use std::time::Duration;

pub const HEADER_LEN: usize = 12;

/// Receive-buffer ceiling enforced by [`read_peer_frame`] before the payload
/// is read. Oversize `payloadLength` is a protocol violation, not a reason
/// to allocate an attacker-chosen amount of memory.
pub const DEFAULT_MAX_PAYLOAD: u32 = 4 * 1024 * 1024;

/// Idle deadline used for frames on the control path (handshake, ping, small
/// messages). Bulk chunk reads use [`BULK_IDLE_DEADLINE`] instead.
pub const CONTROL_IDLE_DEADLINE: Duration = Duration::from_secs(5);
pub const BULK_IDLE_DEADLINE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct PeerFrame {
    pub message_kind: u8,
    pub flags: u8,
    pub payload: Vec<u8>,
}

impl PeerFrame {
    #[must_use]
    pub fn new(message_kind: u8, flags: u8, payload: Vec<u8>) -> Self {
        Self { message_kind, flags, payload }
    }

    fn header_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[0] = self.message_kind;
        header[1] = self.flags;
        header[2..4].copy_from_slice(&0u16.to_le_bytes());
        header[4..8].copy_from_slice(&(self.payload.len() as u32).to_le_bytes());
        header[8..12].copy_from_slice(&checksum(&self.payload).to_le_bytes());
        header
    }

    /// Encodes this frame to its header-plus-payload byte form without any
    /// socket I/O. Used to tunnel a peer frame as the opaque payload of a
    /// relay `MSG_DATA` frame.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&self.header_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Inverse of [`PeerFrame::to_bytes`]: parses a complete in-memory frame,
    /// enforcing `max_payload` and verifying the checksum exactly as
    /// [`read_peer_frame`] does for a socket-framed one.
    pub fn parse(bytes: &[u8], max_payload: u32) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WireError::Protocol("tunneled peer frame shorter than its header"));
        }
        let (header, rest) = bytes.split_at(HEADER_LEN);
        let message_kind = header[0];
        let flags = header[1];
        let payload_length = u32::from_le_bytes(header[4..8].try_into().unwrap());
        let expected_checksum = u32::from_le_bytes(header[8..12].try_into().unwrap());

        if payload_length > max_payload {
            return Err(WireError::Protocol("payload length exceeds receive-buffer maximum"));
        }
        if rest.len() != payload_length as usize {
            return Err(WireError::Protocol("tunneled peer frame payload length mismatch"));
        }
        if checksum(rest) != expected_checksum {
            return Err(WireError::Protocol("payload checksum mismatch"));
        }
        Ok(Self { message_kind, flags, payload: rest.to_vec() })
    }
}

/// Writes `frame`'s header then its payload, looping until both are
/// delivered in full. Checks `cancel` between the header and payload writes
/// so a bulk sender can abort mid-message.
pub fn write_peer_frame(stream: &TcpStream, frame: &PeerFrame, cancel: &CancelToken) -> Result<()> {
    exact_write(stream, &frame.header_bytes(), cancel)?;
    if cancel.is_cancelled() {
        return Err(WireError::Cancelled);
    }
    exact_write(stream, &frame.payload, cancel)
}

/// Reads one peer frame, enforcing `max_payload` and verifying the checksum.
pub fn read_peer_frame(
    stream: &TcpStream,
    max_payload: u32,
    idle_deadline: Duration,
    cancel: &CancelToken,
) -> Result<PeerFrame> {
    let mut header = [0u8; HEADER_LEN];
    exact_read(stream, &mut header, idle_deadline, cancel)?;

    let message_kind = header[0];
    let flags = header[1];
    let payload_length = u32::from_le_bytes(header[4..8].try_into().unwrap());
    let expected_checksum = u32::from_le_bytes(header[8..12].try_into().unwrap());

    if payload_length > max_payload {
        return Err(WireError::Protocol("payload length exceeds receive-buffer maximum"));
    }

    let mut payload = vec![0u8; payload_length as usize];
    if !payload.is_empty() {
        exact_read(stream, &mut payload, idle_deadline, cancel)?;
    }

    if checksum(&payload) != expected_checksum {
        return Err(WireError::Protocol("payload checksum mismatch"));
    }

    Ok(PeerFrame { message_kind, flags, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::net::TcpListener;
    use std::thread;

    fn loopback_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = thread::spawn(move || TcpStream::connect(addr).unwrap());
        let (server, _) = listener.accept().unwrap();
        (server, client.join().unwrap())
    }

    #[test]
    fn round_trips_a_frame() {
        let (server, client) = loopback_pair();
        let cancel = CancelToken::new();
        let frame = PeerFrame::new(7, 0, b"hello frame".to_vec());
        let writer = thread::spawn(move || write_peer_frame(&client, &frame, &cancel).unwrap());
        let received = read_peer_frame(&server, DEFAULT_MAX_PAYLOAD, CONTROL_IDLE_DEADLINE, &CancelToken::new()).unwrap();
        assert_eq!(received.message_kind, 7);
        assert_eq!(received.payload, b"hello frame");
        writer.join().unwrap();
    }

    #[test]
    fn rejects_flipped_checksum() {
        let (server, mut client) = loopback_pair();
        let frame = PeerFrame::new(1, 0, b"payload".to_vec());
        let mut header = frame.header_bytes();
        header[8] ^= 0xFF;
        let writer = thread::spawn(move || {
            client.write_all(&header).unwrap();
            client.write_all(&frame.payload).unwrap();
        });
        let err = read_peer_frame(&server, DEFAULT_MAX_PAYLOAD, CONTROL_IDLE_DEADLINE, &CancelToken::new());
        assert!(matches!(err, Err(WireError::Protocol(_))));
        writer.join().unwrap();
    }

    #[test]
    fn buffer_codec_round_trips_a_frame() {
        let frame = PeerFrame::new(9, 0, b"tunneled".to_vec());
        let bytes = frame.to_bytes();
        let parsed = PeerFrame::parse(&bytes, DEFAULT_MAX_PAYLOAD).unwrap();
        assert_eq!(parsed.message_kind, 9);
        assert_eq!(parsed.payload, b"tunneled");
    }

    #[test]
    fn buffer_codec_rejects_a_truncated_header() {
        assert!(matches!(PeerFrame::parse(&[0u8; 4], DEFAULT_MAX_PAYLOAD), Err(WireError::Protocol(_))));
    }

    #[test]
    fn rejects_oversize_payload_length() {
        let (server, mut client) = loopback_pair();
        let mut header = [0u8; HEADER_LEN];
        header[4..8].copy_from_slice(&(DEFAULT_MAX_PAYLOAD + 1).to_le_bytes());
        let writer = thread::spawn(move || client.write_all(&header).unwrap());
        let err = read_peer_frame(&server, DEFAULT_MAX_PAYLOAD, CONTROL_IDLE_DEADLINE, &CancelToken::new());
        assert!(matches!(err, Err(WireError::Protocol(_))));
        writer.join().unwrap();
    }
}
