//! RgbImage - 24-bit color raster
//!
//! The source image of the segmentation pipeline. Pixels are stored
//! row-major, one [`Rgb`] per pixel. Once built, the pipeline only reads it.

use crate::color::Rgb;
use crate::error::{Error, Result};

/// W x H raster of RGB pixels.
///
/// # Examples
///
/// ```
/// use chromaseg_core::{Rgb, RgbImage};
///
/// let img = RgbImage::from_fn(4, 2, |x, _| if x < 2 { Rgb::BLACK } else { Rgb::WHITE }).unwrap();
/// assert_eq!(img.get(3, 1), Some(Rgb::WHITE));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<Rgb>,
}

impl RgbImage {
    /// Create a black image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![Rgb::BLACK; width as usize * height as usize],
        })
    }

    /// Wrap a row-major pixel vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero dimension and
    /// [`Error::InvalidParameter`] if `data.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<Rgb>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "pixel buffer holds {} pixels, expected {}",
                data.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; images have at least one pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a pixel, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    /// Get a pixel without bounds checking on `x`.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset is outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> Rgb {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Set a pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `(x, y)` is outside the image.
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        self.data[(y * self.width + x) as usize] = color;
        Ok(())
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.data
    }

    /// One row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgb] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.data[start..start + w]
    }
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let img = RgbImage::new(3, 2).unwrap();
        assert_eq!(img.len(), 6);
        assert!(img.pixels().iter().all(|&p| p == Rgb::BLACK));
    }

    #[test]
    fn test_zero_dimension() {
        assert!(matches!(
            RgbImage::new(0, 5),
            Err(Error::InvalidDimension { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_from_pixels_length_check() {
        assert!(RgbImage::from_pixels(2, 2, vec![Rgb::WHITE; 3]).is_err());
        assert!(RgbImage::from_pixels(2, 2, vec![Rgb::WHITE; 4]).is_ok());
    }

    #[test]
    fn test_get_set_row() {
        let mut img = RgbImage::new(4, 3).unwrap();
        img.set(2, 1, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(img.get(2, 1), Some(Rgb::new(1, 2, 3)));
        assert_eq!(img.row(1)[2], Rgb::new(1, 2, 3));
        assert_eq!(img.get(4, 0), None);
        assert!(img.set(0, 3, Rgb::WHITE).is_err());
    }
}
