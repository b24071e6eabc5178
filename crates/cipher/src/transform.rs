use crate::error::{CipherError, Result};
use crate::sbox::{INV_SBOX, SBOX};

/// 16-byte symmetric key used by [`encrypt_in_place`] / [`decrypt_in_place`].
pub type Key = [u8; 16];

fn rotate_left(value: u8, shift: u8) -> u8 {
    value.rotate_left(u32::from(shift & 7))
}

fn rotate_right(value: u8, shift: u8) -> u8 {
    value.rotate_right(u32::from(shift & 7))
}

/// Transforms `data` in place: XOR with the rotating key, S-box substitute,
/// position-dependent left-rotate, then XOR with a position-derived byte.
/// An empty buffer is a no-op and always succeeds.
pub fn encrypt_in_place(data: &mut [u8], key: &Key) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    for (i, byte) in data.iter_mut().enumerate() {
        let key_byte = key[i % key.len()];
        let mut temp = *byte ^ key_byte;
        temp = SBOX[temp as usize];
        let rot_amount = ((i + 1) % 7) as u8 + 1;
        temp = rotate_left(temp, rot_amount);
        temp ^= ((i * 37) & 0xFF) as u8;
        *byte = temp;
    }
    Ok(())
}

/// Exact inverse of [`encrypt_in_place`].
pub fn decrypt_in_place(data: &mut [u8], key: &Key) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    for (i, byte) in data.iter_mut().enumerate() {
        let mut temp = *byte;
        temp ^= ((i * 37) & 0xFF) as u8;
        let rot_amount = ((i + 1) % 7) as u8 + 1;
        temp = rotate_right(temp, rot_amount);
        temp = INV_SBOX[temp as usize];
        temp ^= key[i % key.len()];
        *byte = temp;
    }
    Ok(())
}

/// Treats `value` as 4 little-endian bytes and runs [`encrypt_in_place`] over them.
#[must_use]
pub fn encrypt_dword(value: u32, key: &Key) -> u32 {
    let mut bytes = value.to_le_bytes();
    let _ = encrypt_in_place(&mut bytes, key);
    u32::from_le_bytes(bytes)
}

/// Exact inverse of [`encrypt_dword`].
#[must_use]
pub fn decrypt_dword(value: u32, key: &Key) -> u32 {
    let mut bytes = value.to_le_bytes();
    let _ = decrypt_in_place(&mut bytes, key);
    u32::from_le_bytes(bytes)
}

/// Alias of [`encrypt_dword`] over an IPv4 address held as a host-endian `u32`.
#[must_use]
pub fn encrypt_ipv4(ip: u32, key: &Key) -> u32 {
    encrypt_dword(ip, key)
}

/// Alias of [`decrypt_dword`] over an IPv4 address held as a host-endian `u32`.
#[must_use]
pub fn decrypt_ipv4(ip: u32, key: &Key) -> u32 {
    decrypt_dword(ip, key)
}

/// Guards against calling the transform on a null-equivalent (empty and
/// explicitly rejected, rather than silently accepted) buffer where the
/// caller expected a fixed-size payload.
pub fn require_non_empty(data: &[u8]) -> Result<()> {
    if data.is_empty() {
        return Err(CipherError::InvalidArgument("empty buffer"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_arbitrary_bytes() {
        let key = crate::sbox::DEFAULT_KEY;
        let original = b"the quick brown fox jumps over the lazy dog".to_vec();
        let mut buf = original.clone();
        encrypt_in_place(&mut buf, &key).unwrap();
        assert_ne!(buf, original);
        decrypt_in_place(&mut buf, &key).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn round_trip_empty_is_noop() {
        let key = crate::sbox::DEFAULT_KEY;
        let mut buf: Vec<u8> = Vec::new();
        encrypt_in_place(&mut buf, &key).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn dword_round_trip() {
        let key = crate::sbox::DEFAULT_KEY;
        for value in [0u32, 1, 0xFFFF_FFFF, 0xC0A8_0101, 42] {
            assert_eq!(decrypt_dword(encrypt_dword(value, &key), &key), value);
        }
    }

    #[test]
    fn literal_0xff_byte_survives_round_trip() {
        let key = crate::sbox::DEFAULT_KEY;
        let mut buf = vec![0xFFu8; 16];
        let original = buf.clone();
        encrypt_in_place(&mut buf, &key).unwrap();
        decrypt_in_place(&mut buf, &key).unwrap();
        assert_eq!(buf, original);
    }
}
