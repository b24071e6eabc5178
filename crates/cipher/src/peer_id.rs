//! Peer IDs: an encrypted 32-bit form of an IPv4 address, displayed as four
//! zero-padded decimal octets separated by spaces (e.g. `192 168 001 100`).

use crate::error::{CipherError, Result};
use crate::transform::{decrypt_ipv4, encrypt_ipv4, Key};
use std::net::Ipv4Addr;

/// Packs an IPv4 address into the host-endian `u32` the rest of this crate
/// operates on (octet 0 in the high byte, matching dotted-decimal order).
#[must_use]
pub fn ipv4_to_u32(ip: Ipv4Addr) -> u32 {
    u32::from(ip)
}

#[must_use]
pub fn u32_to_ipv4(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

/// Encrypts an IPv4 address into the 32-bit value exchanged on the wire as a
/// Peer ID.
#[must_use]
pub fn encrypt_peer_id(ip: Ipv4Addr, key: &Key) -> u32 {
    encrypt_ipv4(ipv4_to_u32(ip), key)
}

/// Decrypts a wire Peer ID and validates the result is usable for a direct
/// connection: not unspecified, loopback, broadcast, or multicast.
pub fn decrypt_peer_id(encrypted: u32, key: &Key) -> Result<Ipv4Addr> {
    let ip = u32_to_ipv4(decrypt_ipv4(encrypted, key));
    if is_routable_for_direct_connect(ip) {
        Ok(ip)
    } else {
        Err(CipherError::InvalidArgument("peer id decrypts to a non-routable address"))
    }
}

/// `0.x.x.x`, `127.x.x.x`, `255.255.255.255`, and `224.0.0.0/4` are all
/// rejected as direct-connect targets; everything else is accepted.
#[must_use]
pub fn is_routable_for_direct_connect(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    if octets[0] == 0 || octets[0] == 127 {
        return false;
    }
    if ip == Ipv4Addr::BROADCAST {
        return false;
    }
    if octets[0] & 0xF0 == 224 {
        return false;
    }
    true
}

/// Renders a decrypted peer ID as four space-separated, zero-padded octets.
#[must_use]
pub fn format_peer_id(ip: Ipv4Addr) -> String {
    let o = ip.octets();
    format!("{:03} {:03} {:03} {:03}", o[0], o[1], o[2], o[3])
}

/// Parses the textual peer-ID form. Accepts space, `.`, or `-` as the
/// separator between groups and tolerates collapsed whitespace.
pub fn parse_peer_id(text: &str) -> Result<Ipv4Addr> {
    let normalized = text.replace(['.', '-'], " ");
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    if parts.len() != 4 {
        return Err(CipherError::InvalidArgument("peer id must have four octets"));
    }
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(parts) {
        *slot = part
            .parse::<u16>()
            .ok()
            .filter(|&v| v <= 255)
            .ok_or(CipherError::InvalidArgument("peer id octet out of range"))? as u8;
    }
    Ok(Ipv4Addr::from(octets))
}
