//! Builds and applies `MSG_SCREEN_UPDATE` payloads: a rect-wire header
//! (§4.3) plus RLE-or-raw pixel bytes for exactly one dirty rectangle.

use platform::FrameBuffer;
use screencodec::{
    compress, decompress, decode_header, encode_header, find_dirty_rects, validate_against_screen, Rect,
    RectHeader, ENCODING_NONE, ENCODING_RLE, HEADER_LEN,
};

/// Diffs `previous` against `current` and returns one ready-to-send
/// `MSG_SCREEN_UPDATE` payload per dirty rectangle, in emission order. Each
/// rectangle's pixel bytes are RLE-compressed when that's smaller than the
/// raw bytes, otherwise sent uncompressed.
#[must_use]
pub fn build_update_payloads(previous: &FrameBuffer, current: &FrameBuffer, rect_cap: usize) -> Vec<Vec<u8>> {
    let rects = find_dirty_rects(
        &previous.pixels,
        &current.pixels,
        current.width,
        current.height,
        current.stride,
        rect_cap,
    );
    rects.into_iter().map(|rect| build_one_payload(current, rect)).collect()
}

fn extract_rect_bytes(frame: &FrameBuffer, rect: Rect) -> Vec<u8> {
    let mut out = Vec::with_capacity(rect.w as usize * rect.h as usize * 3);
    for row in 0..u32::from(rect.h) {
        let row_start = ((u32::from(rect.y) + row) * frame.stride + u32::from(rect.x) * 3) as usize;
        let row_end = row_start + rect.w as usize * 3;
        out.extend_from_slice(&frame.pixels[row_start..row_end]);
    }
    out
}

fn build_one_payload(frame: &FrameBuffer, rect: Rect) -> Vec<u8> {
    let raw = extract_rect_bytes(frame, rect);
    let compressed = compress(&raw);

    let (encoding, data) =
        if compressed.len() < raw.len() { (ENCODING_RLE, compressed) } else { (ENCODING_NONE, raw) };

    let header =
        RectHeader { rect, encoding, data_size: u32::try_from(data.len()).unwrap_or(u32::MAX) };
    let mut out = Vec::with_capacity(HEADER_LEN + data.len());
    out.extend_from_slice(&encode_header(&header));
    out.extend_from_slice(&data);
    out
}

/// Decodes one `MSG_SCREEN_UPDATE` payload and copies its pixels into
/// `dest`. Per the failure-semantics table, an out-of-range rectangle or a
/// truncated RLE stream drops just this rectangle — the caller should log
/// and continue the session rather than propagate an error.
pub fn apply_update_payload(dest: &mut FrameBuffer, payload: &[u8]) -> Option<()> {
    if payload.len() < HEADER_LEN {
        return None;
    }
    let mut header_buf = [0u8; HEADER_LEN];
    header_buf.copy_from_slice(&payload[..HEADER_LEN]);
    let header = decode_header(&header_buf);

    validate_against_screen(header.rect, u16::try_from(dest.width).ok()?, u16::try_from(dest.height).ok()?)
        .ok()?;

    let body = payload.get(HEADER_LEN..HEADER_LEN + header.data_size as usize)?;
    let pixel_count = header.rect.w as usize * header.rect.h as usize * 3;
    let pixels = match header.encoding {
        ENCODING_RLE => decompress(body, pixel_count).ok()?,
        ENCODING_NONE => body.to_vec(),
        _ => return None,
    };
    if pixels.len() != pixel_count {
        return None;
    }

    for row in 0..u32::from(header.rect.h) {
        let dest_start =
            ((u32::from(header.rect.y) + row) * dest.stride + u32::from(header.rect.x) * 3) as usize;
        let src_start = row as usize * header.rect.w as usize * 3;
        let len = header.rect.w as usize * 3;
        dest.pixels[dest_start..dest_start + len].copy_from_slice(&pixels[src_start..src_start + len]);
    }
    Some(())
}
