/// An axis-aligned pixel rectangle, always block-aligned when it comes out
/// of [`find_dirty_rects`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

pub const BLOCK_SIZE: u32 = 32;
pub const DEFAULT_RECT_CAP: usize = 2048;

/// Partitions `width x height` into (clipped) 32x32 blocks and returns, in
/// row-major block order, the rectangles where `prev` and `curr` differ by
/// at least one byte in at least one row. Stops at `cap` rectangles; the
/// remainder is left for the next capture tick rather than erroring.
///
/// `stride` is the per-row byte pitch of both buffers (RGB24 rows rounded
/// up to a 4-byte boundary); it may exceed `width * 3`.
#[must_use]
pub fn find_dirty_rects(prev: &[u8], curr: &[u8], width: u32, height: u32, stride: u32, cap: usize) -> Vec<Rect> {
    let mut rects = Vec::new();

    'rows: for block_y in (0..height).step_by(BLOCK_SIZE as usize) {
        let block_h = (height - block_y).min(BLOCK_SIZE);
        for block_x in (0..width).step_by(BLOCK_SIZE as usize) {
            let block_w = (width - block_x).min(BLOCK_SIZE);
            if block_differs(prev, curr, block_x, block_y, block_w, block_h, stride) {
                if rects.len() >= cap {
                    break 'rows;
                }
                rects.push(Rect {
                    x: block_x as u16,
                    y: block_y as u16,
                    w: block_w as u16,
                    h: block_h as u16,
                });
            }
        }
    }
    rects
}

fn block_differs(prev: &[u8], curr: &[u8], x: u32, y: u32, w: u32, h: u32, stride: u32) -> bool {
    let row_bytes = (w * 3) as usize;
    for row in 0..h {
        let offset = ((y + row) * stride + x * 3) as usize;
        if prev[offset..offset + row_bytes] != curr[offset..offset + row_bytes] {
            return true;
        }
    }
    false
}
