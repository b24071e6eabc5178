//! Client-side half of the relay registration/pairing protocol. `crates/relay`
//! is the server; this module is what a peer speaks against it to register an
//! id, request pairing with a partner, and then carry its peer-frame traffic
//! tunneled one-for-one inside `RELAY_MSG_DATA` frames (spec'd data flow:
//! "each peer's socket is the same TCP connection that runs both protocols").
//!
//! The relay's own `forward_data` rebuilds the `MSG_DATA` header it forwards
//! with `flags = 0`, dropping any cipher bit the sender set — so the tunnel
//! here sends the inner peer frame's bytes unciphered rather than relying on
//! a flag the relay doesn't actually preserve end to end.

use std::net::TcpStream;
use std::time::Duration;

use wire::{
    read_relay_frame, write_relay_frame, CancelToken, PeerFrame, RelayFrame, CONNECT_STATUS_OK,
    PEER_DEFAULT_MAX_PAYLOAD, REGISTER_STATUS_OK, RELAY_DEFAULT_MAX_PAYLOAD, RELAY_IDLE_DEADLINE,
    RELAY_MSG_CONNECT_REQUEST, RELAY_MSG_CONNECT_RESPONSE, RELAY_MSG_DATA, RELAY_MSG_PARTNER_CONNECTED,
    RELAY_MSG_PARTNER_DISCONNECTED, RELAY_MSG_REGISTER, RELAY_MSG_REGISTER_RESPONSE,
};

use crate::error::{Result, SessionError};

fn too_short() -> SessionError {
    SessionError::Protocol("relay message payload too short")
}

fn encode_u32(value: u32) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

fn decode_u32(payload: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = payload.get(0..4).ok_or_else(too_short)?.try_into().unwrap();
    Ok(u32::from_le_bytes(bytes))
}

fn encode_connect_request(partner_id: u32, password: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(6 + password.len());
    out.extend_from_slice(&partner_id.to_le_bytes());
    out.extend_from_slice(&(password.len() as u16).to_le_bytes());
    out.extend_from_slice(password);
    out
}

fn send(stream: &TcpStream, message_kind: u8, payload: Vec<u8>, cancel: &CancelToken) -> Result<()> {
    Ok(write_relay_frame(stream, RelayFrame::new(message_kind, payload), None, cancel)?)
}

fn recv(stream: &TcpStream, cancel: &CancelToken) -> Result<RelayFrame> {
    Ok(read_relay_frame(stream, RELAY_DEFAULT_MAX_PAYLOAD, RELAY_IDLE_DEADLINE, None, cancel)?)
}

/// Registers `client_id` with the relay already connected as `stream`.
/// `DuplicateId` on `REGISTER_STATUS_DUPLICATE`, matching §4.5's duplicate
/// protection.
pub fn register(stream: &TcpStream, client_id: u32, cancel: &CancelToken) -> Result<()> {
    send(stream, RELAY_MSG_REGISTER, encode_u32(client_id), cancel)?;
    let reply = recv(stream, cancel)?;
    if reply.message_kind != RELAY_MSG_REGISTER_RESPONSE {
        return Err(SessionError::Protocol("expected RELAY_MSG_REGISTER_RESPONSE"));
    }
    match decode_u32(&reply.payload)? {
        REGISTER_STATUS_OK => Ok(()),
        _ => Err(SessionError::DuplicateId),
    }
}

/// Issues `CONNECT_REQUEST` for `partner_id`, carrying `password` opaquely
/// (the relay never interprets it; the real handshake password exchange
/// happens over the tunnel once paired). `CONNECT_STATUS_ERR_CONNECT` covers
/// both "partner not registered" and "partner already paired" on the wire;
/// this maps it to `NotFound` since that is the far more common case for a
/// controller dialing a fresh Server-ID.
pub fn request_connect(stream: &TcpStream, partner_id: u32, password: &[u8], cancel: &CancelToken) -> Result<()> {
    send(stream, RELAY_MSG_CONNECT_REQUEST, encode_connect_request(partner_id, password), cancel)?;
    let reply = recv(stream, cancel)?;
    if reply.message_kind != RELAY_MSG_CONNECT_RESPONSE {
        return Err(SessionError::Protocol("expected RELAY_MSG_CONNECT_RESPONSE"));
    }
    match decode_u32(&reply.payload)? {
        CONNECT_STATUS_OK => Ok(()),
        _ => Err(SessionError::NotFound),
    }
}

/// Host side: blocks on the relay socket for the unsolicited
/// `MSG_PARTNER_CONNECTED` a registered-but-unpaired connection receives
/// once some controller's `CONNECT_REQUEST` names it. Returns the
/// controller's registered id.
pub fn await_partner_connected(stream: &TcpStream, cancel: &CancelToken) -> Result<u32> {
    let frame = recv(stream, cancel)?;
    if frame.message_kind != RELAY_MSG_PARTNER_CONNECTED {
        return Err(SessionError::Protocol("expected RELAY_MSG_PARTNER_CONNECTED"));
    }
    decode_u32(&frame.payload)
}

/// Tunnels `frame` as the payload of a `RELAY_MSG_DATA` frame.
pub fn send_tunneled(stream: &TcpStream, frame: &PeerFrame, cancel: &CancelToken) -> Result<()> {
    send(stream, RELAY_MSG_DATA, frame.to_bytes(), cancel)
}

/// Blocks for the next tunneled peer frame, skipping over relay-level
/// bookkeeping the relay might still forward on this socket. A
/// `PARTNER_DISCONNECTED` surfaces as `PartnerLeft` rather than a generic
/// protocol error, matching the direct-mode partner-loss path.
pub fn recv_tunneled(stream: &TcpStream, max_payload: u32, idle_deadline: Duration, cancel: &CancelToken) -> Result<PeerFrame> {
    loop {
        let outer = read_relay_frame(stream, RELAY_DEFAULT_MAX_PAYLOAD, idle_deadline, None, cancel)?;
        match outer.message_kind {
            RELAY_MSG_DATA => return Ok(PeerFrame::parse(&outer.payload, max_payload)?),
            RELAY_MSG_PARTNER_DISCONNECTED => return Err(SessionError::PartnerLeft),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    use wire::MSG_HANDSHAKE;

    fn loopback_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = thread::spawn(move || TcpStream::connect(addr).unwrap());
        let (server, _) = listener.accept().unwrap();
        (server, client.join().unwrap())
    }

    fn relay_recv(stream: &TcpStream) -> RelayFrame {
        read_relay_frame(stream, RELAY_DEFAULT_MAX_PAYLOAD, RELAY_IDLE_DEADLINE, None, &CancelToken::new()).unwrap()
    }

    fn relay_send(stream: &TcpStream, kind: u8, payload: Vec<u8>) {
        write_relay_frame(stream, RelayFrame::new(kind, payload), None, &CancelToken::new()).unwrap();
    }

    #[test]
    fn register_succeeds_on_status_ok() {
        let (relay_side, client_side) = loopback_pair();
        let server = thread::spawn(move || {
            let register = relay_recv(&relay_side);
            assert_eq!(register.message_kind, RELAY_MSG_REGISTER);
            relay_send(&relay_side, RELAY_MSG_REGISTER_RESPONSE, encode_u32(REGISTER_STATUS_OK));
        });
        register(&client_side, 42, &CancelToken::new()).unwrap();
        server.join().unwrap();
    }

    #[test]
    fn register_reports_duplicate_id() {
        let (relay_side, client_side) = loopback_pair();
        let server = thread::spawn(move || {
            relay_recv(&relay_side);
            relay_send(&relay_side, RELAY_MSG_REGISTER_RESPONSE, encode_u32(wire::REGISTER_STATUS_DUPLICATE));
        });
        let err = register(&client_side, 42, &CancelToken::new());
        assert!(matches!(err, Err(SessionError::DuplicateId)));
        server.join().unwrap();
    }

    #[test]
    fn request_connect_reports_not_found_on_err_connect() {
        let (relay_side, client_side) = loopback_pair();
        let server = thread::spawn(move || {
            relay_recv(&relay_side);
            relay_send(&relay_side, RELAY_MSG_CONNECT_RESPONSE, encode_u32(wire::CONNECT_STATUS_ERR_CONNECT));
        });
        let err = request_connect(&client_side, 7, b"pw", &CancelToken::new());
        assert!(matches!(err, Err(SessionError::NotFound)));
        server.join().unwrap();
    }

    #[test]
    fn tunneled_peer_frame_round_trips() {
        let (relay_side, client_side) = loopback_pair();
        let frame = PeerFrame::new(MSG_HANDSHAKE, 0, b"hello".to_vec());
        let sender = thread::spawn(move || send_tunneled(&client_side, &frame, &CancelToken::new()).unwrap());
        let received = recv_tunneled(&relay_side, PEER_DEFAULT_MAX_PAYLOAD, RELAY_IDLE_DEADLINE, &CancelToken::new()).unwrap();
        assert_eq!(received.message_kind, MSG_HANDSHAKE);
        assert_eq!(received.payload, b"hello");
        sender.join().unwrap();
    }

    #[test]
    fn partner_disconnected_surfaces_as_partner_left() {
        let (relay_side, client_side) = loopback_pair();
        let sender = thread::spawn(move || {
            relay_send(&client_side, RELAY_MSG_PARTNER_DISCONNECTED, encode_u32(0));
        });
        let err = recv_tunneled(&relay_side, PEER_DEFAULT_MAX_PAYLOAD, RELAY_IDLE_DEADLINE, &CancelToken::new());
        assert!(matches!(err, Err(SessionError::PartnerLeft)));
        sender.join().unwrap();
    }
}
