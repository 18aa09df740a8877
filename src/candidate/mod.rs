//! Candidate selection and pruning utilities.
//!
//! Includes per-box arg-max collection, stable ranking and greedy IoU
//! suppression.

use crate::geometry::Rect;

pub(crate) mod collect;
pub(crate) mod nms;
pub(crate) mod rank;

/// Thresholded detection for one box row, before suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Row of the box in the input tensors.
    pub box_index: usize,
    /// Winning class column.
    pub class_index: usize,
    /// Score of the winning class.
    pub confidence: f32,
    /// Top-left anchored bounding box.
    pub bounding_box: Rect,
}
