//! RGB color triple and packed pixel helpers.
//!
//! # Pixel format
//!
//! Packed pixels are 32-bit words laid out as `0xRRGGBBAA` (red in MSB,
//! alpha in LSB). Only the RGB channels take part in segmentation; alpha is
//! set to 255 when packing.

/// Shift amounts for extracting color channels from a packed pixel
pub const RED_SHIFT: u32 = 24;
pub const GREEN_SHIFT: u32 = 16;
pub const BLUE_SHIFT: u32 = 8;
pub const ALPHA_SHIFT: u32 = 0;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBBAA` pixel word, ignoring alpha.
    #[inline]
    pub fn from_pixel(pixel: u32) -> Self {
        Self {
            r: ((pixel >> RED_SHIFT) & 0xff) as u8,
            g: ((pixel >> GREEN_SHIFT) & 0xff) as u8,
            b: ((pixel >> BLUE_SHIFT) & 0xff) as u8,
        }
    }

    /// Pack into a `0xRRGGBBAA` pixel word with alpha = 255.
    #[inline]
    pub fn to_pixel(self) -> u32 {
        ((self.r as u32) << RED_SHIFT)
            | ((self.g as u32) << GREEN_SHIFT)
            | ((self.b as u32) << BLUE_SHIFT)
            | (255 << ALPHA_SHIFT)
    }

    /// Channels as an array, in R, G, B order.
    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}
