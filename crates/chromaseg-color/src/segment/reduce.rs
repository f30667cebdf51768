//! Phase 4: reduce the palette to the most populous clusters

use super::rank_by_population;
use super::refine::assign_to_nearest_color;
use crate::octree::LookupOptions;
use crate::{ColorError, ColorResult};
use chromaseg_core::{LabelImage, Palette, RgbImage};
use log::debug;

/// Keep only the `final_colors` most populous clusters.
///
/// Pixels of the discarded clusters are reassigned to the nearest retained
/// color. Afterwards every palette entry that no longer labels any pixel
/// is removed and labels are renumbered to match, so the result holds at
/// most `final_colors` entries. Palette populations are recomputed from
/// the final labels.
///
/// Ranking uses `counts`, not the current labels. Leaves `labels` and
/// `palette` unchanged if the palette already has `final_colors` entries
/// or fewer; the labels are still validated in that case.
///
/// # Errors
///
/// - [`ColorError::InvalidParameters`] if `final_colors` is 0 or `counts`
///   does not match the palette
/// - [`ColorError::Core`] if `labels` does not match `image` or refers to
///   entries outside the palette
pub fn color_segment_remove_colors(
    image: &RgbImage,
    labels: &mut LabelImage,
    palette: &mut Palette,
    counts: &[u32],
    final_colors: u32,
    lookup: LookupOptions,
) -> ColorResult<()> {
    if final_colors == 0 {
        return Err(ColorError::InvalidParameters(
            "final_colors must be at least 1".to_string(),
        ));
    }
    let ncolors = palette.len();
    if counts.len() != ncolors {
        return Err(ColorError::InvalidParameters(format!(
            "{} counts for {ncolors} palette entries",
            counts.len()
        )));
    }
    let (w, h) = image.dimensions();
    labels.check_size(w, h)?;
    labels.check_labels(ncolors)?;
    if ncolors <= final_colors as usize {
        return Ok(());
    }

    let ranked = rank_by_population(counts);
    let retained = &ranked[..final_colors as usize];
    let mut discard = vec![true; ncolors];
    for &k in retained {
        discard[k] = false;
    }
    let mask = labels.mask_from_lut(&discard)?;

    // Park the discarded pixels on a retained label so those entries
    // become unused and drop out of the palette. The placeholder must
    // still own pixels outside the mask, or the masked refine could empty
    // it again.
    let before = labels.histogram(ncolors);
    let placeholder = retained
        .iter()
        .copied()
        .find(|&k| before[k] > 0)
        .unwrap_or(ranked[0]);
    labels.set_masked(&mask, placeholder as u8)?;
    let used: Vec<bool> = labels.histogram(ncolors).iter().map(|&n| n > 0).collect();
    let map = palette.compact(&used)?;
    labels.remap(&map)?;
    debug!(
        "reduced palette from {ncolors} to {} colors, reassigning {} pixels",
        palette.len(),
        mask.count()
    );

    assign_to_nearest_color(image, labels, palette, Some(&mask), lookup)?;
    palette.set_populations(&labels.histogram(palette.len()))?;
    Ok(())
}
