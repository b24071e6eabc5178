//! Payload layouts carried inside [`wire::RelayFrame`]s. The frame codec
//! itself only knows header/payload/checksum; these little-endian layouts
//! are specific to the relay's own registration and pairing protocol.

use crate::error::{RelayError, Result};

fn too_short() -> RelayError {
    RelayError::Wire(wire::WireError::Protocol("relay message payload too short"))
}

pub fn encode_register(client_id: u32) -> Vec<u8> {
    client_id.to_le_bytes().to_vec()
}

pub fn decode_register(payload: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = payload.get(0..4).ok_or_else(too_short)?.try_into().unwrap();
    Ok(u32::from_le_bytes(bytes))
}

pub fn encode_status(status: u32) -> Vec<u8> {
    status.to_le_bytes().to_vec()
}

pub fn decode_status(payload: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = payload.get(0..4).ok_or_else(too_short)?.try_into().unwrap();
    Ok(u32::from_le_bytes(bytes))
}

pub struct ConnectRequest {
    pub partner_id: u32,
    pub password: Vec<u8>,
}

pub fn decode_connect_request(payload: &[u8]) -> Result<ConnectRequest> {
    if payload.len() < 6 {
        return Err(too_short());
    }
    let partner_id = u32::from_le_bytes(payload[0..4].try_into().unwrap());
    let password_len = u16::from_le_bytes(payload[4..6].try_into().unwrap()) as usize;
    let password = payload.get(6..6 + password_len).ok_or_else(too_short)?.to_vec();
    Ok(ConnectRequest { partner_id, password })
}

pub fn encode_connect_request(req: &ConnectRequest) -> Vec<u8> {
    let mut out = Vec::with_capacity(6 + req.password.len());
    out.extend_from_slice(&req.partner_id.to_le_bytes());
    out.extend_from_slice(&(req.password.len() as u16).to_le_bytes());
    out.extend_from_slice(&req.password);
    out
}

pub fn encode_partner_connected(partner_id: u32) -> Vec<u8> {
    partner_id.to_le_bytes().to_vec()
}

pub fn decode_partner_connected(payload: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = payload.get(0..4).ok_or_else(too_short)?.try_into().unwrap();
    Ok(u32::from_le_bytes(bytes))
}

pub fn encode_partner_disconnected(reason: u32, partner_id: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    out.extend_from_slice(&reason.to_le_bytes());
    out.extend_from_slice(&partner_id.to_le_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_round_trips() {
        assert_eq!(decode_register(&encode_register(42)).unwrap(), 42);
    }

    #[test]
    fn connect_request_round_trips_with_a_password() {
        let req = ConnectRequest { partner_id: 99, password: b"hunter2".to_vec() };
        let encoded = encode_connect_request(&req);
        let decoded = decode_connect_request(&encoded).unwrap();
        assert_eq!(decoded.partner_id, 99);
        assert_eq!(decoded.password, b"hunter2");
    }

    #[test]
    fn truncated_connect_request_is_rejected() {
        assert!(decode_connect_request(&[1, 0, 0, 0, 5, 0]).is_err());
    }
}
