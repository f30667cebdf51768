//! BinaryMask - packed 1-bit raster
//!
//! # Pixel layout
//!
//! - Each row starts on a 32-bit word boundary (`wpl` words per line)
//! - Pixels are packed MSB to LSB within each word: pixel 0 is bit 31
//! - Bits past the image width in the last word of a row are kept at 0
//!
//! Word-level layout lets morphology shift whole rows at once.

use crate::error::{Error, Result};
use crate::image::check_dimensions;

/// W x H binary mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    wpl: u32,
    data: Vec<u32>,
}

impl BinaryMask {
    /// Create an all-zero mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let wpl = width.div_ceil(32);
        Ok(Self {
            width,
            height,
            wpl,
            data: vec![0; wpl as usize * height as usize],
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

    /// 32-bit words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.wpl
    }

    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Raw word access. Callers that write past the image width must call
    /// [`BinaryMask::clear_unused_bits`] afterwards.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Words of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.wpl as usize;
        &self.data[start..start + self.wpl as usize]
    }

    /// Get a bit, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get_unchecked(x, y))
    }

    /// Get a bit without checking `x` against the width.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> bool {
        let word = self.data[y as usize * self.wpl as usize + (x / 32) as usize];
        (word >> (31 - (x & 31))) & 1 == 1
    }

    /// Set or clear a bit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `(x, y)` is outside the mask.
    pub fn set(&mut self, x: u32, y: u32, on: bool) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.width as usize * self.height as usize,
            });
        }
        self.set_unchecked(x, y, on);
        Ok(())
    }

    /// Set or clear a bit without checking `x` against the width.
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, on: bool) {
        let idx = y as usize * self.wpl as usize + (x / 32) as usize;
        let bit = 1u32 << (31 - (x & 31));
        if on {
            self.data[idx] |= bit;
        } else {
            self.data[idx] &= !bit;
        }
    }

    /// Number of set pixels.
    pub fn count(&self) -> u64 {
        self.data.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// True if no pixel is set.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&w| w == 0)
    }

    /// Pixel-wise exclusive or.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the masks differ in size.
    pub fn xor(&self, other: &BinaryMask) -> Result<BinaryMask> {
        self.combine(other, |a, b| a ^ b)
    }

    /// Pixels set in `self` but not in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the masks differ in size.
    pub fn and_not(&self, other: &BinaryMask) -> Result<BinaryMask> {
        self.combine(other, |a, b| a & !b)
    }

    fn combine(&self, other: &BinaryMask, op: impl Fn(u32, u32) -> u32) -> Result<BinaryMask> {
        self.check_same_size(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| op(a, b))
            .collect();
        let mut out = BinaryMask { data, ..*self };
        out.clear_unused_bits();
        Ok(out)
    }

    /// Check that `other` has the same dimensions.
    pub fn check_same_size(&self, other: &BinaryMask) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (other.width, other.height),
            });
        }
        Ok(())
    }

    /// Zero the bits past the image width in the last word of each row.
    pub fn clear_unused_bits(&mut self) {
        let extra = self.width % 32;
        if extra == 0 {
            return;
        }
        let keep = !0u32 << (32 - extra);
        let wpl = self.wpl as usize;
        for row in self.data.chunks_exact_mut(wpl) {
            row[wpl - 1] &= keep;
        }
    }

    /// Surround the mask with a zero border.
    ///
    /// `left` must be a multiple of 32 so rows can be copied word by word.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `left` is not word-aligned.
    pub fn add_border(&self, left: u32, right: u32, top: u32, bottom: u32) -> Result<BinaryMask> {
        if !left.is_multiple_of(32) {
            return Err(Error::InvalidParameter(format!(
                "left border {left} is not a multiple of 32"
            )));
        }
        let mut out = BinaryMask::new(self.width + left + right, self.height + top + bottom)?;
        let left_words = (left / 32) as usize;
        let src_wpl = self.wpl as usize;
        let dst_wpl = out.wpl as usize;
        for y in 0..self.height as usize {
            let dst_start = (y + top as usize) * dst_wpl + left_words;
            out.data[dst_start..dst_start + src_wpl]
                .copy_from_slice(&self.data[y * src_wpl..(y + 1) * src_wpl]);
        }
        Ok(out)
    }

    /// Extract the `width` x `height` region at (`left`, `top`).
    ///
    /// Inverse of [`BinaryMask::add_border`]; `left` must be word-aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `left` is not word-aligned or
    /// the region does not fit.
    pub fn remove_border(
        &self,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) -> Result<BinaryMask> {
        if !left.is_multiple_of(32) {
            return Err(Error::InvalidParameter(format!(
                "left border {left} is not a multiple of 32"
            )));
        }
        if left + width > self.width || top + height > self.height {
            return Err(Error::InvalidParameter(format!(
                "region {width}x{height} at ({left}, {top}) exceeds {}x{}",
                self.width, self.height
            )));
        }
        let mut out = BinaryMask::new(width, height)?;
        let left_words = (left / 32) as usize;
        let src_wpl = self.wpl as usize;
        let dst_wpl = out.wpl as usize;
        for y in 0..height as usize {
            let src_start = (y + top as usize) * src_wpl + left_words;
            out.data[y * dst_wpl..(y + 1) * dst_wpl]
                .copy_from_slice(&self.data[src_start..src_start + dst_wpl]);
        }
        out.clear_unused_bits();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_order() {
        let mut m = BinaryMask::new(40, 2).unwrap();
        assert_eq!(m.wpl(), 2);
        m.set(0, 0, true).unwrap();
        m.set(33, 1, true).unwrap();
        assert_eq!(m.data()[0], 0x8000_0000);
        assert_eq!(m.data()[3], 0x4000_0000);
        assert_eq!(m.count(), 2);
        m.set(0, 0, false).unwrap();
        assert_eq!(m.get(0, 0), Some(false));
        assert_eq!(m.get(40, 0), None);
    }

    #[test]
    fn test_xor_and_not() {
        let mut a = BinaryMask::new(5, 1).unwrap();
        let mut b = BinaryMask::new(5, 1).unwrap();
        a.set(1, 0, true).unwrap();
        a.set(2, 0, true).unwrap();
        b.set(2, 0, true).unwrap();
        b.set(3, 0, true).unwrap();
        let x = a.xor(&b).unwrap();
        assert_eq!(x.count(), 2);
        assert!(x.get_unchecked(1, 0) && x.get_unchecked(3, 0));
        let d = b.and_not(&a).unwrap();
        assert_eq!(d.count(), 1);
        assert!(d.get_unchecked(3, 0));
    }

    #[test]
    fn test_size_mismatch() {
        let a = BinaryMask::new(5, 1).unwrap();
        let b = BinaryMask::new(5, 2).unwrap();
        assert!(matches!(a.xor(&b), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_border_round_trip() {
        let mut m = BinaryMask::new(7, 3).unwrap();
        m.set(6, 2, true).unwrap();
        m.set(0, 0, true).unwrap();
        let padded = m.add_border(32, 32, 2, 2).unwrap();
        assert_eq!(padded.width(), 71);
        assert_eq!(padded.height(), 7);
        assert!(padded.get_unchecked(32, 2));
        assert!(padded.get_unchecked(38, 4));
        assert_eq!(padded.count(), 2);
        assert_eq!(padded.remove_border(32, 2, 7, 3).unwrap(), m);
        assert!(m.add_border(3, 0, 0, 0).is_err());
    }
}
