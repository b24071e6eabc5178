//! Obfuscation-grade symmetric byte cipher and the Server-ID / Peer-ID
//! textual encodings built on top of it.
//!
//! This is explicitly not a substitute for TLS: the transform is invertible
//! with a publicly known default key, and its job is to keep casual packet
//! inspection and URL-bar copy/paste from leaking a raw IP:port, not to
//! defend against a motivated attacker.

mod error;
mod peer_id;
mod sbox;
mod server_id;
mod transform;

pub use error::{CipherError, Result};
pub use peer_id::{
    decrypt_peer_id, encrypt_peer_id, format_peer_id, ipv4_to_u32, is_routable_for_direct_connect,
    parse_peer_id, u32_to_ipv4,
};
pub use sbox::DEFAULT_KEY;
pub use server_id::{decode_server_id, encode_server_id, validate_server_id_format};
pub use transform::{
    decrypt_dword, decrypt_in_place, decrypt_ipv4, encrypt_dword, encrypt_in_place, encrypt_ipv4,
    require_non_empty, Key,
};
