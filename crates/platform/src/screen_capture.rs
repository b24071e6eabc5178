use crate::error::Result;

/// A 24-bit RGB framebuffer snapshot: `width * height` pixels, packed rows
/// each rounded up to a 4-byte stride.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub pixels: Vec<u8>,
}

impl FrameBuffer {
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        let stride = (width * 3 + 3) & !3;
        Self { width, height, stride, pixels: vec![0u8; (stride * height) as usize] }
    }
}

/// Produces framebuffer snapshots of the local display.
pub trait ScreenCapture: Send {
    fn dimensions(&self) -> (u32, u32);
    fn capture(&mut self) -> Result<FrameBuffer>;
}

/// A fixed-size capture source used in tests and headless builds.
pub struct NullScreenCapture {
    frame: FrameBuffer,
}

impl NullScreenCapture {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { frame: FrameBuffer::blank(width, height) }
    }
}

impl ScreenCapture for NullScreenCapture {
    fn dimensions(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn capture(&mut self) -> Result<FrameBuffer> {
        Ok(self.frame.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_frame_has_rounded_stride() {
        let frame = FrameBuffer::blank(5, 2);
        assert_eq!(frame.stride, 16);
        assert_eq!(frame.pixels.len(), 32);
    }

    #[test]
    fn null_capture_reports_fixed_dimensions() {
        let mut capture = NullScreenCapture::new(640, 480);
        assert_eq!(capture.dimensions(), (640, 480));
        let frame = capture.capture().unwrap();
        assert_eq!((frame.width, frame.height), (640, 480));
    }
}
