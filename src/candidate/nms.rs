//! Greedy IoU non-maximum suppression for ranked candidates.

use crate::candidate::Candidate;
use crate::geometry::iou;

/// Which candidates are allowed to suppress each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuppressionMode {
    /// Any overlapping pair competes, regardless of class.
    #[default]
    ClassAgnostic,
    /// Only candidates with the same class index compete.
    PerClass,
}

/// Applies greedy suppression to candidates already ranked by confidence.
///
/// Walks the ranking once; every surviving candidate is emitted and marks each
/// later survivor whose IoU with it is strictly greater than `threshold`.
/// Output order is the ranking order.
pub(crate) fn suppress(
    ranked: &[Candidate],
    threshold: f32,
    mode: SuppressionMode,
) -> Vec<Candidate> {
    let mut keep = vec![true; ranked.len()];
    let mut out = Vec::new();

    for i in 0..ranked.len() {
        if !keep[i] {
            continue;
        }
        let current = &ranked[i];
        out.push(*current);
        for j in (i + 1)..ranked.len() {
            if !keep[j] {
                continue;
            }
            let other = &ranked[j];
            if mode == SuppressionMode::PerClass && other.class_index != current.class_index {
                continue;
            }
            if iou(&current.bounding_box, &other.bounding_box) > threshold {
                keep[j] = false;
            }
        }
    }

    out
}
