//! Per-rectangle wire layout carried inside a screen-update payload:
//! `{x:u16, y:u16, w:u16, h:u16, encoding:u8, reserved:u8, dataSize:u32}`
//! followed by `dataSize` bytes of pixel data.

use crate::dirty_rect::Rect;
use crate::error::{Result, ScreenCodecError};

pub const HEADER_LEN: usize = 14;

pub const ENCODING_NONE: u8 = 0x00;
pub const ENCODING_RLE: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectHeader {
    pub rect: Rect,
    pub encoding: u8,
    pub data_size: u32,
}

#[must_use]
pub fn encode_header(header: &RectHeader) -> [u8; HEADER_LEN] {
    let mut buf = [0u8; HEADER_LEN];
    buf[0..2].copy_from_slice(&header.rect.x.to_le_bytes());
    buf[2..4].copy_from_slice(&header.rect.y.to_le_bytes());
    buf[4..6].copy_from_slice(&header.rect.w.to_le_bytes());
    buf[6..8].copy_from_slice(&header.rect.h.to_le_bytes());
    buf[8] = header.encoding;
    buf[9] = 0;
    buf[10..14].copy_from_slice(&header.data_size.to_le_bytes());
    buf
}

#[must_use]
pub fn decode_header(buf: &[u8; HEADER_LEN]) -> RectHeader {
    RectHeader {
        rect: Rect {
            x: u16::from_le_bytes([buf[0], buf[1]]),
            y: u16::from_le_bytes([buf[2], buf[3]]),
            w: u16::from_le_bytes([buf[4], buf[5]]),
            h: u16::from_le_bytes([buf[6], buf[7]]),
        },
        encoding: buf[8],
        data_size: u32::from_le_bytes([buf[10], buf[11], buf[12], buf[13]]),
    }
}

/// Rejects a rectangle that falls outside the remote's declared screen
/// dimensions. The caller drops the offending rectangle rather than the
/// whole frame.
pub fn validate_against_screen(rect: Rect, remote_width: u16, remote_height: u16) -> Result<()> {
    let right = rect.x.checked_add(rect.w);
    let bottom = rect.y.checked_add(rect.h);
    let in_bounds = matches!(right, Some(r) if r <= remote_width) && matches!(bottom, Some(b) if b <= remote_height);
    if in_bounds {
        Ok(())
    } else {
        Err(ScreenCodecError::OutOfRange(rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = RectHeader {
            rect: Rect { x: 32, y: 64, w: 32, h: 32 },
            encoding: ENCODING_RLE,
            data_size: 512,
        };
        let encoded = encode_header(&header);
        assert_eq!(decode_header(&encoded), header);
    }

    #[test]
    fn in_bounds_rect_is_accepted() {
        let rect = Rect { x: 608, y: 448, w: 32, h: 32 };
        assert!(validate_against_screen(rect, 640, 480).is_ok());
    }

    #[test]
    fn rect_exceeding_remote_dimensions_is_rejected() {
        let rect = Rect { x: 620, y: 0, w: 32, h: 32 };
        assert!(validate_against_screen(rect, 640, 480).is_err());
    }
}
