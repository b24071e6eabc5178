//! Run-length codec for dirty-rectangle pixel data.
//!
//! A run is encoded as `0xFF, count, value` with `count` in `1..=255`. A
//! literal `0xFF` byte in the source is never emitted bare: it is always
//! escaped as a one-count run (`0xFF 0x01 0xFF`), which keeps `0xFF` out of
//! the stream except as a run marker.

use crate::error::{Result, ScreenCodecError};

const MARKER: u8 = 0xFF;
const MIN_RUN: usize = 3;

/// Compresses `data` into the marker/count/value run encoding.
#[must_use]
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        let byte = data[i];
        let mut run_len = 1;
        while i + run_len < data.len() && data[i + run_len] == byte && run_len < 255 {
            run_len += 1;
        }

        if byte == MARKER || run_len >= MIN_RUN {
            let mut remaining = run_len;
            while remaining > 0 {
                let chunk = remaining.min(255);
                out.push(MARKER);
                out.push(chunk as u8);
                out.push(byte);
                remaining -= chunk;
            }
        } else {
            out.extend(std::iter::repeat(byte).take(run_len));
        }
        i += run_len;
    }
    out
}

/// Decompresses `data`, stopping once `expected_len` output bytes have been
/// produced. Returns [`ScreenCodecError::Truncated`] if the input runs out
/// first.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut i = 0;
    while i < data.len() && out.len() < expected_len {
        let byte = data[i];
        if byte == MARKER {
            if i + 2 >= data.len() {
                break;
            }
            let count = data[i + 1] as usize;
            let value = data[i + 2];
            let take = count.min(expected_len - out.len());
            out.extend(std::iter::repeat(value).take(take));
            i += 3;
        } else {
            out.push(byte);
            i += 1;
        }
    }

    if out.len() < expected_len {
        return Err(ScreenCodecError::Truncated {
            produced: out.len(),
            expected: expected_len,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_runs_and_literals() {
        let data = [1, 2, 2, 2, 2, 3, 3, 5, 5, 5, 5, 5, 5, 5, 5, 5];
        let compressed = compress(&data);
        let decompressed = decompress(&compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn literal_0xff_is_escaped_and_survives_round_trip() {
        let data = [1, 0xFF, 2, 0xFF, 0xFF, 0xFF];
        let compressed = compress(&data);
        assert!(compressed.chunks(3).all(|c| c[0] == MARKER));
        let decompressed = decompress(&compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn short_runs_stay_literal() {
        let data = [7, 7, 9];
        let compressed = compress(&data);
        assert_eq!(compressed, vec![7, 7, 9]);
    }

    #[test]
    fn truncated_stream_is_reported() {
        let data = [5u8; 10];
        let compressed = compress(&data);
        let err = decompress(&compressed[..compressed.len() - 2], 10).unwrap_err();
        match err {
            ScreenCodecError::Truncated { produced, expected } => {
                assert!(produced < expected);
                assert_eq!(expected, 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn long_run_is_split_across_255_byte_chunks() {
        let data = vec![9u8; 600];
        let compressed = compress(&data);
        assert_eq!(compressed.len(), 9);
        let decompressed = decompress(&compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }
}
