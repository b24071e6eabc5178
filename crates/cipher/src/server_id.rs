//! Printable short codes that encode a relay endpoint's `(IPv4, port)` pair.

use crate::error::{CipherError, Result};
use crate::transform::{decrypt_in_place, encrypt_in_place, Key};

const ALPHABET: &[u8; 32] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const MARKER_BYTE: u8 = 0x2A;

fn alphabet_value(c: u8) -> Option<u8> {
    let upper = c.to_ascii_uppercase();
    ALPHABET.iter().position(|&a| a == upper).map(|p| p as u8)
}

/// Packs `bytes` five bits at a time into the Server-ID alphabet, MSB-first,
/// padding the final partial group with zero bits.
fn encode_base32(bytes: &[u8]) -> String {
    let mut bit_buffer: u32 = 0;
    let mut bit_count = 0u32;
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));

    for &byte in bytes {
        bit_buffer = (bit_buffer << 8) | u32::from(byte);
        bit_count += 8;
        while bit_count >= 5 {
            bit_count -= 5;
            let idx = ((bit_buffer >> bit_count) & 0x1F) as usize;
            out.push(ALPHABET[idx] as char);
        }
    }
    if bit_count > 0 {
        let idx = ((bit_buffer << (5 - bit_count)) & 0x1F) as usize;
        out.push(ALPHABET[idx] as char);
    }
    out
}

fn decode_base32(input: &str) -> Result<Vec<u8>> {
    let mut bit_buffer: u32 = 0;
    let mut bit_count = 0u32;
    let mut out = Vec::new();

    for c in input.bytes() {
        if c == b'-' {
            continue;
        }
        let value = alphabet_value(c).ok_or(CipherError::InvalidEncoding)?;
        bit_buffer = (bit_buffer << 5) | u32::from(value);
        bit_count += 5;
        if bit_count >= 8 {
            bit_count -= 8;
            out.push(((bit_buffer >> bit_count) & 0xFF) as u8);
        }
    }
    Ok(out)
}

fn insert_dashes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 4);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push('-');
        }
        out.push(c);
    }
    out
}

fn strip_dashes(formatted: &str) -> String {
    formatted.chars().filter(|&c| c != '-').collect()
}

/// Encodes `(ip, port)` as a dashed base32 Server-ID. Layout: 4 bytes IP, 2
/// bytes port (big-endian), 1 XOR-checksum byte of the preceding 6, 1 marker
/// byte — encrypted as one 8-byte block, then base32-encoded and dashed.
#[must_use]
pub fn encode_server_id(ip: [u8; 4], port: u16, key: &Key) -> String {
    let mut raw = [0u8; 8];
    raw[0..4].copy_from_slice(&ip);
    raw[4] = (port >> 8) as u8;
    raw[5] = port as u8;
    raw[6] = raw[0] ^ raw[1] ^ raw[2] ^ raw[3] ^ raw[4] ^ raw[5];
    raw[7] = MARKER_BYTE;

    encrypt_in_place(&mut raw, key).expect("fixed 8-byte buffer is never empty");
    insert_dashes(&encode_base32(&raw))
}

/// Inverse of [`encode_server_id`]. Rejects anything that doesn't decode to
/// exactly 8 bytes, fails the checksum, or carries the wrong marker byte.
pub fn decode_server_id(server_id: &str, key: &Key) -> Result<([u8; 4], u16)> {
    let raw = strip_dashes(server_id);
    let decoded = decode_base32(&raw)?;
    if decoded.len() != 8 {
        return Err(CipherError::InvalidEncoding);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&decoded);
    decrypt_in_place(&mut buf, key).expect("fixed 8-byte buffer is never empty");

    let checksum = buf[0] ^ buf[1] ^ buf[2] ^ buf[3] ^ buf[4] ^ buf[5];
    if checksum != buf[6] || buf[7] != MARKER_BYTE {
        return Err(CipherError::InvalidEncoding);
    }

    let ip = [buf[0], buf[1], buf[2], buf[3]];
    let port = u16::from(buf[4]) << 8 | u16::from(buf[5]);
    Ok((ip, port))
}

/// Cheap sanity check on shape alone (length, alphabet membership, dash
/// count) without decrypting — useful for live input validation in a UI
/// before committing to a full decode.
#[must_use]
pub fn validate_server_id_format(server_id: &str) -> bool {
    if server_id.len() < 10 || server_id.len() > 20 {
        return false;
    }
    let mut alpha_count = 0;
    let mut dash_count = 0;
    for c in server_id.bytes() {
        if c == b'-' {
            dash_count += 1;
            continue;
        }
        if alphabet_value(c).is_none() {
            return false;
        }
        alpha_count += 1;
    }
    (10..=16).contains(&alpha_count) && dash_count >= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbox::DEFAULT_KEY;

    #[test]
    fn round_trips_ip_and_port() {
        let ip = [192, 168, 1, 100];
        let id = encode_server_id(ip, 5000, &DEFAULT_KEY);
        assert!(id.len() >= 14 && id.len() <= 17, "len={}", id.len());
        let (decoded_ip, decoded_port) = decode_server_id(&id, &DEFAULT_KEY).unwrap();
        assert_eq!(decoded_ip, ip);
        assert_eq!(decoded_port, 5000);
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(decode_server_id("AAAA-AAAA-AAAA", &DEFAULT_KEY).is_err());
    }

    #[test]
    fn rejects_lowercase_tamper_free_round_trip() {
        let id = encode_server_id([10, 0, 0, 1], 1234, &DEFAULT_KEY);
        let lower = id.to_lowercase();
        assert_eq!(
            decode_server_id(&lower, &DEFAULT_KEY),
            decode_server_id(&id, &DEFAULT_KEY)
        );
    }

    #[test]
    fn bit_flip_is_overwhelmingly_rejected() {
        let id = encode_server_id([203, 0, 113, 42], 443, &DEFAULT_KEY);
        let mut rejected = 0;
        let mut total = 0;
        for (i, c) in id.char_indices() {
            if c == '-' {
                continue;
            }
            for replacement in ALPHABET.iter().map(|&b| b as char) {
                if replacement == c {
                    continue;
                }
                let mut tampered: Vec<char> = id.chars().collect();
                tampered[i] = replacement;
                let tampered: String = tampered.into_iter().collect();
                total += 1;
                if decode_server_id(&tampered, &DEFAULT_KEY).is_err() {
                    rejected += 1;
                }
            }
        }
        assert!(rejected as f64 / total as f64 > 0.99);
    }
}
