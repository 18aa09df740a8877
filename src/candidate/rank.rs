//! Confidence ranking for candidates.

use crate::candidate::Candidate;

/// Sorts candidates by descending confidence.
///
/// The sort is stable: equal confidences keep their collection order, which is
/// ascending box index.
pub(crate) fn rank_desc(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}
