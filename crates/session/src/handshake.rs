//! `MSG_HANDSHAKE` / `MSG_HANDSHAKE_ACK` payload codec and the host-side
//! acceptance check.

use std::net::TcpStream;

use wire::{
    read_peer_frame, write_peer_frame, CancelToken, PeerFrame, CONTROL_IDLE_DEADLINE, HANDSHAKE_MAGIC,
    MSG_HANDSHAKE, MSG_HANDSHAKE_ACK, PEER_DEFAULT_MAX_PAYLOAD, PROTOCOL_VERSION_MAJOR, PROTOCOL_VERSION_MINOR,
};

use crate::error::{Result, SessionError};

pub const PAYLOAD_LEN: usize = 20;

/// The handshake payload both directions exchange. `password` is zeroed by
/// the host in its ack — the field carries no meaning once accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    pub magic: u32,
    pub own_id: u32,
    pub password: u32,
    pub screen_width: u16,
    pub screen_height: u16,
    pub color_depth: u8,
    pub compression: u8,
    pub version_major: u8,
    pub version_minor: u8,
}

impl Handshake {
    #[must_use]
    pub fn new(own_id: u32, password: u32, screen_width: u16, screen_height: u16, compression: u8) -> Self {
        Self {
            magic: HANDSHAKE_MAGIC,
            own_id,
            password,
            screen_width,
            screen_height,
            color_depth: 24,
            compression,
            version_major: PROTOCOL_VERSION_MAJOR,
            version_minor: PROTOCOL_VERSION_MINOR,
        }
    }

    #[must_use]
    pub fn encode(&self) -> [u8; PAYLOAD_LEN] {
        let mut buf = [0u8; PAYLOAD_LEN];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..8].copy_from_slice(&self.own_id.to_le_bytes());
        buf[8..12].copy_from_slice(&self.password.to_le_bytes());
        buf[12..14].copy_from_slice(&self.screen_width.to_le_bytes());
        buf[14..16].copy_from_slice(&self.screen_height.to_le_bytes());
        buf[16] = self.color_depth;
        buf[17] = self.compression;
        buf[18] = self.version_major;
        buf[19] = self.version_minor;
        buf
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() != PAYLOAD_LEN {
            return Err(SessionError::Protocol("handshake payload has the wrong length"));
        }
        Ok(Self {
            magic: u32::from_le_bytes(payload[0..4].try_into().unwrap()),
            own_id: u32::from_le_bytes(payload[4..8].try_into().unwrap()),
            password: u32::from_le_bytes(payload[8..12].try_into().unwrap()),
            screen_width: u16::from_le_bytes(payload[12..14].try_into().unwrap()),
            screen_height: u16::from_le_bytes(payload[14..16].try_into().unwrap()),
            color_depth: payload[16],
            compression: payload[17],
            version_major: payload[18],
            version_minor: payload[19],
        })
    }

    #[must_use]
    pub fn with_zeroed_password(mut self) -> Self {
        self.password = 0;
        self
    }
}

/// Controller side: send `MSG_HANDSHAKE` then block for `MSG_HANDSHAKE_ACK`.
/// Any other message kind, or a magic mismatch in the reply, closes the
/// session with `AuthFailed` without revealing which check failed. `relayed`
/// selects whether the frame travels a bare socket or tunneled inside relay
/// `MSG_DATA` frames (`crate::relay_client`); the validation logic is
/// identical either way.
pub fn controller_perform(stream: &TcpStream, outbound: &Handshake, relayed: bool, cancel: &CancelToken) -> Result<Handshake> {
    let request = PeerFrame::new(MSG_HANDSHAKE, 0, outbound.encode().to_vec());
    if relayed {
        crate::relay_client::send_tunneled(stream, &request, cancel)?;
    } else {
        write_peer_frame(stream, &request, cancel)?;
    }

    let frame = read_handshake_ack(stream, relayed, cancel)?;
    if frame.message_kind != MSG_HANDSHAKE_ACK {
        return Err(SessionError::AuthFailed);
    }
    let ack = Handshake::decode(&frame.payload)?;
    if ack.magic != HANDSHAKE_MAGIC {
        return Err(SessionError::AuthFailed);
    }
    Ok(ack)
}

/// Reads the frame the controller expects to be `MSG_HANDSHAKE_ACK`. A host
/// that rejects the handshake closes the socket without ever sending an ack
/// (see `host_accept`), so a closed or lost connection encountered here is
/// itself evidence of rejection, not a generic transport failure — it is
/// remapped to `AuthFailed` rather than surfacing as `ConnectionClosed` or
/// `ConnectionLost`.
fn read_handshake_ack(stream: &TcpStream, relayed: bool, cancel: &CancelToken) -> Result<PeerFrame> {
    let outcome = if relayed {
        crate::relay_client::recv_tunneled(stream, PEER_DEFAULT_MAX_PAYLOAD, CONTROL_IDLE_DEADLINE, cancel)
    } else {
        read_peer_frame(stream, PEER_DEFAULT_MAX_PAYLOAD, CONTROL_IDLE_DEADLINE, cancel).map_err(SessionError::from)
    };
    outcome.map_err(|err| match err {
        SessionError::ConnectionClosed | SessionError::ConnectionLost(_) => SessionError::AuthFailed,
        other => other,
    })
}

/// Host side: block for `MSG_HANDSHAKE`, validate magic and password against
/// `active_password`, and on success write back `MSG_HANDSHAKE_ACK` mirroring
/// `local` with a zeroed password. Any failure — wrong message kind, magic
/// mismatch, or password mismatch — is reported uniformly as `AuthFailed`,
/// matching the "don't disclose which check failed" contract.
pub fn host_accept(
    stream: &TcpStream,
    local: &Handshake,
    active_password: u32,
    relayed: bool,
    cancel: &CancelToken,
) -> Result<Handshake> {
    let frame = if relayed {
        crate::relay_client::recv_tunneled(stream, PEER_DEFAULT_MAX_PAYLOAD, CONTROL_IDLE_DEADLINE, cancel)?
    } else {
        read_peer_frame(stream, PEER_DEFAULT_MAX_PAYLOAD, CONTROL_IDLE_DEADLINE, cancel)?
    };
    if frame.message_kind != MSG_HANDSHAKE {
        return Err(SessionError::AuthFailed);
    }
    let incoming = Handshake::decode(&frame.payload)?;
    if incoming.magic != HANDSHAKE_MAGIC || incoming.password != active_password {
        return Err(SessionError::AuthFailed);
    }

    let ack = local.with_zeroed_password();
    let reply = PeerFrame::new(MSG_HANDSHAKE_ACK, 0, ack.encode().to_vec());
    if relayed {
        crate::relay_client::send_tunneled(stream, &reply, cancel)?;
    } else {
        write_peer_frame(stream, &reply, cancel)?;
    }
    Ok(incoming)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    fn loopback_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = thread::spawn(move || TcpStream::connect(addr).unwrap());
        let (server, _) = listener.accept().unwrap();
        (server, client.join().unwrap())
    }

    #[test]
    fn encode_decode_round_trips() {
        let hs = Handshake::new(0x1234_5678, 54321, 1920, 1080, wire::COMPRESSION_RLE);
        let decoded = Handshake::decode(&hs.encode()).unwrap();
        assert_eq!(hs, decoded);
    }

    #[test]
    fn zeroed_password_only_clears_that_field() {
        let hs = Handshake::new(1, 99999, 800, 600, wire::COMPRESSION_NONE).with_zeroed_password();
        assert_eq!(hs.password, 0);
        assert_eq!(hs.screen_width, 800);
    }

    #[test]
    fn matching_password_completes_the_handshake() {
        let (host_stream, controller_stream) = loopback_pair();
        let host_local = Handshake::new(1, 0, 1024, 768, wire::COMPRESSION_RLE);
        let controller_outbound = Handshake::new(2, 12345, 1920, 1080, wire::COMPRESSION_RLE);

        let host = thread::spawn(move || {
            host_accept(&host_stream, &host_local, 12345, false, &CancelToken::new())
        });
        let ack = controller_perform(&controller_stream, &controller_outbound, false, &CancelToken::new()).unwrap();

        let accepted_from_controller = host.join().unwrap().unwrap();
        assert_eq!(accepted_from_controller.own_id, 2);
        assert_eq!(ack.screen_width, 1024);
        assert_eq!(ack.password, 0);
    }

    #[test]
    fn wrong_password_is_reported_as_auth_failed_on_both_sides() {
        let (host_stream, controller_stream) = loopback_pair();
        let host_local = Handshake::new(1, 0, 1024, 768, wire::COMPRESSION_RLE);
        let controller_outbound = Handshake::new(2, 11111, 1920, 1080, wire::COMPRESSION_RLE);

        let host = thread::spawn(move || {
            host_accept(&host_stream, &host_local, 22222, false, &CancelToken::new())
        });
        let controller_result =
            controller_perform(&controller_stream, &controller_outbound, false, &CancelToken::new());

        assert!(matches!(host.join().unwrap(), Err(SessionError::AuthFailed)));
        assert!(matches!(controller_result, Err(SessionError::AuthFailed)));
    }
}
