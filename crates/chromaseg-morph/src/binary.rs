//! Binary morphology with brick structuring elements
//!
//! A `w x h` brick has its origin at `(w / 2, h / 2)`, so it covers the
//! offsets `-(w / 2) ..= w - 1 - w / 2` horizontally (likewise vertically).
//! Bricks are separable: each operation is a horizontal pass followed by a
//! vertical pass.
//!
//! Boundary condition is asymmetric: pixels outside the mask read as 0 for
//! both dilation and erosion. Erosion therefore eats into foreground that
//! touches the edge; [`close_safe_brick`] pads the mask first to avoid that.

use crate::{MorphError, MorphResult};
use chromaseg_core::BinaryMask;
use std::ops::RangeInclusive;

/// How shifted rows are merged into the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accumulate {
    /// Dilation: union of shifted copies
    Or,
    /// Erosion: intersection of shifted copies
    And,
}

impl Accumulate {
    #[inline]
    fn apply(self, dst: &mut u32, src: u32) {
        match self {
            Accumulate::Or => *dst |= src,
            Accumulate::And => *dst &= src,
        }
    }

    fn initial(self) -> u32 {
        match self {
            Accumulate::Or => 0,
            Accumulate::And => !0,
        }
    }
}

/// Dilate with a `width x height` brick.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if either size is zero.
pub fn dilate_brick(mask: &BinaryMask, width: u32, height: u32) -> MorphResult<BinaryMask> {
    check_brick(width, height)?;
    if width == 1 && height == 1 {
        return Ok(mask.clone());
    }
    let tmp = horizontal_pass(mask, width, Accumulate::Or)?;
    vertical_pass(&tmp, height, Accumulate::Or)
}

/// Erode with a `width x height` brick.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if either size is zero.
pub fn erode_brick(mask: &BinaryMask, width: u32, height: u32) -> MorphResult<BinaryMask> {
    check_brick(width, height)?;
    if width == 1 && height == 1 {
        return Ok(mask.clone());
    }
    let tmp = horizontal_pass(mask, width, Accumulate::And)?;
    vertical_pass(&tmp, height, Accumulate::And)
}

/// Close with a `width x height` brick.
///
/// Closing = dilation followed by erosion. Fills holes and gaps smaller
/// than the brick. Foreground touching the image edge may be eroded; use
/// [`close_safe_brick`] when that matters.
pub fn close_brick(mask: &BinaryMask, width: u32, height: u32) -> MorphResult<BinaryMask> {
    check_brick(width, height)?;
    if width == 1 && height == 1 {
        return Ok(mask.clone());
    }
    let dilated = dilate_brick(mask, width, height)?;
    erode_brick(&dilated, width, height)
}

/// Close with a brick, padding the mask so nothing is lost at the edges.
///
/// The mask is surrounded by a zero border at least as wide as the brick's
/// largest translation (horizontal part rounded up to a whole word), closed,
/// and cropped back. The result always contains the input.
pub fn close_safe_brick(mask: &BinaryMask, width: u32, height: u32) -> MorphResult<BinaryMask> {
    check_brick(width, height)?;
    if width == 1 && height == 1 {
        return Ok(mask.clone());
    }
    let maxtrans = (width / 2).max(height / 2);
    let xbord = maxtrans.div_ceil(32) * 32;
    let padded = mask.add_border(xbord, maxtrans, maxtrans, maxtrans)?;
    let closed = close_brick(&padded, width, height)?;
    Ok(closed.remove_border(xbord, maxtrans, mask.width(), mask.height())?)
}

fn check_brick(width: u32, height: u32) -> MorphResult<()> {
    if width == 0 || height == 0 {
        return Err(MorphError::InvalidParameters(format!(
            "brick size must be at least 1x1, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Offsets covered by a brick of `size` along one axis.
fn brick_offsets(size: u32) -> RangeInclusive<i32> {
    let origin = (size / 2) as i32;
    -origin..=(size as i32 - 1 - origin)
}

/// Merge shifted copies of every row.
///
/// Dilation places a copy of the row at each offset; erosion reads the
/// row back from each offset, i.e. shifts by the negated offset.
fn horizontal_pass(src: &BinaryMask, size: u32, acc: Accumulate) -> MorphResult<BinaryMask> {
    if size == 1 {
        return Ok(src.clone());
    }
    let mut out = BinaryMask::new(src.width(), src.height())?;
    let wpl = src.wpl() as usize;
    let offsets = brick_offsets(size);
    let dst_data = out.data_mut();
    dst_data.fill(acc.initial());

    for (y, dst_row) in dst_data.chunks_exact_mut(wpl).enumerate() {
        let src_row = src.row(y as u32);
        for dx in offsets.clone() {
            let shift = match acc {
                Accumulate::Or => dx,
                Accumulate::And => -dx,
            };
            for (i, dst) in dst_row.iter_mut().enumerate() {
                acc.apply(dst, shifted_word(src_row, i, shift));
            }
        }
    }
    out.clear_unused_bits();
    Ok(out)
}

/// Merge vertically shifted rows. Rows outside the mask read as 0.
fn vertical_pass(src: &BinaryMask, size: u32, acc: Accumulate) -> MorphResult<BinaryMask> {
    if size == 1 {
        return Ok(src.clone());
    }
    let mut out = BinaryMask::new(src.width(), src.height())?;
    let h = src.height() as i32;
    let wpl = src.wpl() as usize;
    let offsets = brick_offsets(size);
    let dst_data = out.data_mut();
    dst_data.fill(acc.initial());

    for (y, dst_row) in dst_data.chunks_exact_mut(wpl).enumerate() {
        for dy in offsets.clone() {
            let src_y = match acc {
                Accumulate::Or => y as i32 - dy,
                Accumulate::And => y as i32 + dy,
            };
            if src_y < 0 || src_y >= h {
                if acc == Accumulate::And {
                    dst_row.fill(0);
                }
                continue;
            }
            for (dst, &word) in dst_row.iter_mut().zip(src.row(src_y as u32)) {
                acc.apply(dst, word);
            }
        }
    }
    Ok(out)
}

/// Word `i` of `row` after moving its content `shift` pixels to the right
/// (left if negative). Bits shifted in from outside the row are 0.
///
/// MSB-first packing: moving content right means shifting bits toward the
/// LSB and carrying from the previous word.
#[inline]
fn shifted_word(row: &[u32], i: usize, shift: i32) -> u32 {
    let word = |j: isize| -> u32 {
        if j < 0 || j as usize >= row.len() {
            0
        } else {
            row[j as usize]
        }
    };
    let abs = shift.unsigned_abs();
    let word_shift = (abs / 32) as isize;
    let bit_shift = abs % 32;
    let i = i as isize;

    if shift >= 0 {
        let cur = word(i - word_shift);
        if bit_shift == 0 {
            cur
        } else {
            (cur >> bit_shift) | (word(i - word_shift - 1) << (32 - bit_shift))
        }
    } else {
        let cur = word(i + word_shift);
        if bit_shift == 0 {
            cur
        } else {
            (cur << bit_shift) | (word(i + word_shift + 1) >> (32 - bit_shift))
        }
    }
}
