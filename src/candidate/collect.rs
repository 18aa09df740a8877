//! Per-box arg-max and confidence thresholding.

use crate::candidate::Candidate;
use crate::geometry::Rect;
use crate::tensor::TensorView;
use crate::util::math::argmax_first;

/// Builds the candidate for box row `box_index`, if its best class clears
/// `threshold` (strictly).
///
/// The score must clear the threshold both at full precision and after
/// narrowing to the emitted `f32`, so a double just above the threshold that
/// rounds onto it is dropped.
#[inline]
fn candidate_for_row<C, P>(
    box_index: usize,
    scores: &[C],
    coords: &[P],
    threshold: f32,
) -> Option<Candidate>
where
    C: Copy + Into<f64>,
    P: Copy + Into<f64>,
{
    let (class_index, confidence) = argmax_first(scores);
    let narrowed = confidence as f32;
    if confidence <= f64::from(threshold) || narrowed <= threshold {
        return None;
    }
    let [cx, cy, w, h]: [f64; 4] = [
        coords[0].into(),
        coords[1].into(),
        coords[2].into(),
        coords[3].into(),
    ];
    Some(Candidate {
        box_index,
        class_index,
        confidence: narrowed,
        bounding_box: Rect::from_center(cx, cy, w, h),
    })
}

/// Collects candidates in ascending box order.
///
/// Both views must already agree on the row count, and coordinate rows must
/// hold four values.
pub(crate) fn collect_candidates<C, P>(
    confidence: TensorView<'_, C>,
    coordinates: TensorView<'_, P>,
    threshold: f32,
) -> Vec<Candidate>
where
    C: Copy + Into<f64>,
    P: Copy + Into<f64>,
{
    confidence
        .iter_rows()
        .zip(coordinates.iter_rows())
        .enumerate()
        .filter_map(|(idx, (scores, coords))| candidate_for_row(idx, scores, coords, threshold))
        .collect()
}

/// Row-parallel variant of [`collect_candidates`].
///
/// Rows are scored independently; the indexed collect keeps the result in box
/// order so ranking ties resolve exactly as in the sequential path.
#[cfg(feature = "rayon")]
pub(crate) fn collect_candidates_par<C, P>(
    confidence: TensorView<'_, C>,
    coordinates: TensorView<'_, P>,
    threshold: f32,
) -> Vec<Candidate>
where
    C: Copy + Into<f64> + Sync,
    P: Copy + Into<f64> + Sync,
{
    use rayon::prelude::*;

    let conf = confidence.as_slice();
    let coords = coordinates.as_slice();
    let classes = confidence.cols();

    conf.par_chunks(classes)
        .zip(coords.par_chunks(4))
        .enumerate()
        .filter_map(|(idx, (scores, row))| candidate_for_row(idx, scores, row, threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::collect_candidates;
    use crate::tensor::TensorView;

    #[test]
    fn threshold_is_strict() {
        let conf = [0.1f64, 0.2, 0.25, 0.0, 0.3, 0.26];
        let coords = [0.5f64, 0.5, 0.2, 0.2, 0.5, 0.5, 0.2, 0.2];
        let conf = TensorView::from_slice(&conf, 2, 3).unwrap();
        let coords = TensorView::from_slice(&coords, 2, 4).unwrap();

        let out = collect_candidates(conf, coords, 0.25);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].box_index, 1);
        assert_eq!(out[0].class_index, 1);
    }

    #[test]
    fn scores_that_round_onto_the_threshold_are_dropped() {
        let conf = [0.2500000001f64, 0.0, 0.9, 0.0];
        let coords = [0.2f64, 0.2, 0.1, 0.1, 0.8, 0.8, 0.1, 0.1];
        let conf = TensorView::from_slice(&conf, 2, 2).unwrap();
        let coords = TensorView::from_slice(&coords, 2, 4).unwrap();

        let out = collect_candidates(conf, coords, 0.25);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].box_index, 1);
        assert!(out.iter().all(|c| c.confidence > 0.25));
    }

    #[test]
    fn all_zero_row_is_dropped_even_at_zero_threshold() {
        let conf = [0.0f32, 0.0];
        let coords = [0.5f32, 0.5, 0.1, 0.1];
        let conf = TensorView::from_slice(&conf, 1, 2).unwrap();
        let coords = TensorView::from_slice(&coords, 1, 4).unwrap();
        assert!(collect_candidates(conf, coords, 0.0).is_empty());
    }
}
