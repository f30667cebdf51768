//! LabelImage - per-pixel palette indices
//!
//! The output raster of segmentation: one 8-bit label per pixel, each label
//! an index into a [`Palette`](crate::Palette). The palette is held
//! separately, so a label image on its own carries no colors.

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::image::{RgbImage, check_dimensions};
use crate::mask::BinaryMask;
use crate::palette::Palette;

/// W x H raster of 8-bit palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl LabelImage {
    /// Create a label image with every label 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        })
    }

    /// Wrap a row-major label vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `data.len() != width * height`.
    pub fn from_labels(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        if data.len() != width as usize * height as usize {
            return Err(Error::InvalidParameter(format!(
                "label buffer holds {} labels, expected {}",
                data.len(),
                width as usize * height as usize
            )));
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

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Set a label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `(x, y)` is outside the image.
    pub fn set(&mut self, x: u32, y: u32, label: u8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        self.data[(y * self.width + x) as usize] = label;
        Ok(())
    }

    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, label: u8) {
        self.data[y as usize * self.width as usize + x as usize] = label;
    }

    #[inline]
    pub fn labels(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn labels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Check that `(width, height)` matches this image.
    pub fn check_size(&self, width: u32, height: u32) -> Result<()> {
        if self.width != width || self.height != height {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: (self.width, self.height),
            });
        }
        Ok(())
    }

    /// Check that every label indexes into a palette of `len` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for the first offending label.
    pub fn check_labels(&self, len: usize) -> Result<()> {
        match self.data.iter().find(|&&l| l as usize >= len) {
            Some(&l) => Err(Error::IndexOutOfBounds {
                index: l as usize,
                len,
            }),
            None => Ok(()),
        }
    }

    /// Count pixels per label for labels `0..len`.
    ///
    /// Labels `>= len` are not counted.
    pub fn histogram(&self, len: usize) -> Vec<u32> {
        let mut counts = vec![0u32; len];
        for &l in &self.data {
            if let Some(c) = counts.get_mut(l as usize) {
                *c += 1;
            }
        }
        counts
    }

    /// Mask of the pixels carrying `label`.
    pub fn mask_from_label(&self, label: u8) -> Result<BinaryMask> {
        let mut mask = BinaryMask::new(self.width, self.height)?;
        for (y, row) in self.data.chunks_exact(self.width as usize).enumerate() {
            for (x, &l) in row.iter().enumerate() {
                if l == label {
                    mask.set_unchecked(x as u32, y as u32, true);
                }
            }
        }
        Ok(mask)
    }

    /// Mask of the pixels whose label is flagged in `lut`.
    ///
    /// Labels beyond the end of `lut` are treated as unflagged.
    pub fn mask_from_lut(&self, lut: &[bool]) -> Result<BinaryMask> {
        let mut mask = BinaryMask::new(self.width, self.height)?;
        for (y, row) in self.data.chunks_exact(self.width as usize).enumerate() {
            for (x, &l) in row.iter().enumerate() {
                if lut.get(l as usize).copied().unwrap_or(false) {
                    mask.set_unchecked(x as u32, y as u32, true);
                }
            }
        }
        Ok(mask)
    }

    /// Set every pixel under `mask` to `label`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the mask size differs.
    pub fn set_masked(&mut self, mask: &BinaryMask, label: u8) -> Result<()> {
        self.check_size(mask.width(), mask.height())?;
        let w = self.width as usize;
        for (y, row) in self.data.chunks_exact_mut(w).enumerate() {
            let words = mask.row(y as u32);
            for (x, l) in row.iter_mut().enumerate() {
                if (words[x / 32] >> (31 - (x & 31))) & 1 == 1 {
                    *l = label;
                }
            }
        }
        Ok(())
    }

    /// Rewrite every label through `map`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if a label has no entry in `map`
    /// or maps to `None`; labels are left untouched in that case.
    pub fn remap(&mut self, map: &[Option<u8>]) -> Result<()> {
        if let Some(&l) = self
            .data
            .iter()
            .find(|&&l| map.get(l as usize).copied().flatten().is_none())
        {
            return Err(Error::IndexOutOfBounds {
                index: l as usize,
                len: map.len(),
            });
        }
        for l in &mut self.data {
            if let Some(Some(new)) = map.get(*l as usize) {
                *l = *new;
            }
        }
        Ok(())
    }

    /// Replace every label by its palette color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if a label is not in `palette`.
    pub fn to_rgb(&self, palette: &Palette) -> Result<RgbImage> {
        self.check_labels(palette.len())?;
        let colors: Vec<Rgb> = palette.colors();
        let pixels = self.data.iter().map(|&l| colors[l as usize]).collect();
        RgbImage::from_pixels(self.width, self.height, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripes() -> LabelImage {
        // 0 0 1 1 2
        // 0 0 1 1 2
        LabelImage::from_labels(5, 2, vec![0, 0, 1, 1, 2, 0, 0, 1, 1, 2]).unwrap()
    }

    #[test]
    fn test_histogram() {
        let l = stripes();
        assert_eq!(l.histogram(3), vec![4, 4, 2]);
        assert_eq!(l.histogram(2), vec![4, 4]);
    }

    #[test]
    fn test_masks() {
        let l = stripes();
        let m = l.mask_from_label(1).unwrap();
        assert_eq!(m.count(), 4);
        assert!(m.get_unchecked(2, 1));
        let m = l.mask_from_lut(&[true, false, true]).unwrap();
        assert_eq!(m.count(), 6);
        assert!(!m.get_unchecked(3, 0));
    }

    #[test]
    fn test_set_masked() {
        let mut l = stripes();
        let m = l.mask_from_label(2).unwrap();
        l.set_masked(&m, 0).unwrap();
        assert_eq!(l.histogram(3), vec![6, 4, 0]);
    }

    #[test]
    fn test_remap() {
        let mut l = stripes();
        assert!(l.remap(&[Some(0), None, Some(1)]).is_err());
        assert_eq!(l, stripes());
        l.remap(&[Some(2), Some(0), Some(1)]).unwrap();
        assert_eq!(l.labels()[..5], [2, 2, 0, 0, 1]);
    }

    #[test]
    fn test_check_labels_and_render() {
        let l = stripes();
        assert!(l.check_labels(2).is_err());
        let palette =
            Palette::from_colors(&[Rgb::BLACK, Rgb::WHITE, Rgb::new(255, 0, 0)]).unwrap();
        let rgb = l.to_rgb(&palette).unwrap();
        assert_eq!(rgb.get(4, 1), Some(Rgb::new(255, 0, 0)));
        assert_eq!(rgb.get(2, 0), Some(Rgb::WHITE));
    }
}
