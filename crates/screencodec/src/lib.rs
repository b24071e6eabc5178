//! Dirty-rectangle discovery and run-length compression for screen frames.
//!
//! A capture tick diffs the previous framebuffer against the current one,
//! emits the changed 32x32 blocks as rectangles, and RLE-compresses each
//! rectangle's pixel bytes independently before it goes on the wire.

mod dirty_rect;
mod error;
mod rect_wire;
mod rle;

pub use dirty_rect::{find_dirty_rects, Rect, BLOCK_SIZE, DEFAULT_RECT_CAP};
pub use error::{Result, ScreenCodecError};
pub use rect_wire::{decode_header, encode_header, validate_against_screen, RectHeader, ENCODING_NONE, ENCODING_RLE, HEADER_LEN};
pub use rle::{compress, decompress};

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn rle_round_trip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let compressed = compress(&data);
            let decompressed = decompress(&compressed, data.len()).unwrap();
            prop_assert_eq!(decompressed, data);
        }

        #[test]
        fn identical_frames_never_produce_dirty_rects(
            width in 32u32..256,
            height in 32u32..256,
            fill in any::<u8>(),
        ) {
            let stride = width * 3;
            let frame = vec![fill; (stride * height) as usize];
            let rects = find_dirty_rects(&frame, &frame, width, height, stride, DEFAULT_RECT_CAP);
            prop_assert!(rects.is_empty());
        }
    }
}
