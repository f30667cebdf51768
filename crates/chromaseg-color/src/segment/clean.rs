//! Phase 3: spatial cleanup by morphological closing

use super::rank_by_population;
use crate::ColorResult;
use chromaseg_core::LabelImage;
use chromaseg_morph::close_safe_brick;
use log::trace;

/// Absorb small holes and gaps into the surrounding clusters.
///
/// Clusters are visited from most to least populous according to `counts`.
/// For each one, its pixel mask is closed with a `sel_size x sel_size`
/// brick and every pixel the closing adds is relabeled to that cluster.
/// Larger clusters therefore claim contested pixels first, and later
/// (smaller) clusters may take pixels back.
///
/// A `sel_size` of 0 or 1 leaves `labels` unchanged.
///
/// # Errors
///
/// Returns [`ColorError::Core`](crate::ColorError::Core) if some label has
/// no entry in `counts`.
pub fn color_segment_clean(
    labels: &mut LabelImage,
    counts: &[u32],
    sel_size: u32,
) -> ColorResult<()> {
    labels.check_labels(counts.len())?;
    if sel_size <= 1 {
        return Ok(());
    }

    for k in rank_by_population(counts) {
        let mask = labels.mask_from_label(k as u8)?;
        if mask.is_empty() {
            continue;
        }
        let closed = close_safe_brick(&mask, sel_size, sel_size)?;
        let added = closed.xor(&mask)?;
        if added.is_empty() {
            continue;
        }
        trace!("cluster {k}: closing adds {} pixels", added.count());
        labels.set_masked(&added, k as u8)?;
    }
    Ok(())
}
