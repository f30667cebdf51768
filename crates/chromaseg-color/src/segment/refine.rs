//! Phase 2: reassign pixels to their nearest palette color

use crate::ColorResult;
use crate::octree::{LookupOptions, OctreeIndex};
use chromaseg_core::{BinaryMask, LabelImage, Palette, Rgb, RgbImage};
use log::trace;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Relabel pixels with the nearest palette entry.
///
/// Nearest is decided by an [`OctreeIndex`] built from `palette` with
/// `lookup`. If `mask` is given, only pixels under it are relabeled and the
/// rest keep their current label.
///
/// Returns the number of pixels assigned to each palette entry by this
/// call (all pixels when unmasked, masked pixels otherwise).
///
/// # Errors
///
/// - [`ColorError::Core`](crate::ColorError::Core) if `labels` or `mask`
///   differ in size from `image`, or if a mask is given and some label is
///   not an index into `palette`
/// - [`ColorError::EmptyPalette`](crate::ColorError::EmptyPalette) if the
///   palette has no entries
pub fn assign_to_nearest_color(
    image: &RgbImage,
    labels: &mut LabelImage,
    palette: &Palette,
    mask: Option<&BinaryMask>,
    lookup: LookupOptions,
) -> ColorResult<Vec<u32>> {
    let (w, h) = image.dimensions();
    labels.check_size(w, h)?;
    if let Some(m) = mask {
        labels.check_size(m.width(), m.height())?;
        // pixels outside the mask keep their label
        labels.check_labels(palette.len())?;
    }

    let index = OctreeIndex::with_options(palette, &lookup)?;
    let counts = refine_rows(image, labels, mask, &index, palette.len());
    trace!(
        "assigned {} pixels over {} colors",
        counts.iter().map(|&n| n as u64).sum::<u64>(),
        palette.len()
    );
    Ok(counts)
}

#[cfg(not(feature = "threads"))]
fn refine_rows(
    image: &RgbImage,
    labels: &mut LabelImage,
    mask: Option<&BinaryMask>,
    index: &OctreeIndex,
    ncolors: usize,
) -> Vec<u32> {
    let w = image.width() as usize;
    let mut counts = vec![0u32; ncolors];
    for (y, row) in labels.labels_mut().chunks_exact_mut(w).enumerate() {
        let y = y as u32;
        refine_row(image.row(y), row, mask.map(|m| m.row(y)), index, &mut counts);
    }
    counts
}

#[cfg(feature = "threads")]
fn refine_rows(
    image: &RgbImage,
    labels: &mut LabelImage,
    mask: Option<&BinaryMask>,
    index: &OctreeIndex,
    ncolors: usize,
) -> Vec<u32> {
    let w = image.width() as usize;
    labels
        .labels_mut()
        .par_chunks_mut(w)
        .enumerate()
        .fold(
            || vec![0u32; ncolors],
            |mut counts, (y, row)| {
                let y = y as u32;
                refine_row(image.row(y), row, mask.map(|m| m.row(y)), index, &mut counts);
                counts
            },
        )
        .reduce(
            || vec![0u32; ncolors],
            |mut a, b| {
                for (x, n) in a.iter_mut().zip(b) {
                    *x += n;
                }
                a
            },
        )
}

/// Relabel one row. `mask_row` holds the packed mask words for the row.
#[inline]
fn refine_row(
    pixels: &[Rgb],
    labels: &mut [u8],
    mask_row: Option<&[u32]>,
    index: &OctreeIndex,
    counts: &mut [u32],
) {
    for (x, (&c, l)) in pixels.iter().zip(labels.iter_mut()).enumerate() {
        if let Some(words) = mask_row
            && (words[x / 32] >> (31 - (x & 31))) & 1 == 0
        {
            continue;
        }
        let k = index.lookup(c);
        *l = k;
        counts[k as usize] += 1;
    }
}
