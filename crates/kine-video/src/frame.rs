use kine_base::Vec2;

/// Bytes per pixel of every frame (RGB, 8 bits per channel).
pub const CHANNELS: usize = 3;

/// An owned RGB8 image, row-major, tightly packed.
///
/// Construction never fails; whether the buffer is usable is answered by
/// [`Frame::is_valid`], so a broken capture can still be handed through the
/// pipeline and rejected where it is consumed.
#[derive(Debug, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<u8>,
    size: Vec2<usize>,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            pixels,
            size: Vec2::new(width, height),
        }
    }

    /// A zero-sized frame with no pixels.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0)
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Give the pixel buffer back, e.g. to recycle it for the next capture.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Non-zero dimensions and a buffer of exactly `width * height * 3` bytes.
    pub fn is_valid(&self) -> bool {
        self.size.x > 0
            && self.size.y > 0
            && self
                .size
                .area()
                .checked_mul(CHANNELS)
                .is_some_and(|len| len == self.pixels.len())
    }

    /// RGB value at `(x, y)`, `None` outside the frame or on a short buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let offset = (y * self.size.x + x) * CHANNELS;
        let rgb = self.pixels.get(offset..offset + CHANNELS)?;
        Some([rgb[0], rgb[1], rgb[2]])
    }
}
