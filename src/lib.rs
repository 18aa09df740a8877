//! detdecode turns raw object-detector outputs into labeled bounding boxes.
//!
//! The input is a pair of row-major tensors per frame: class confidences of
//! shape `[boxes, classes]` and box coordinates of shape `[boxes, 4]` holding
//! `(center_x, center_y, width, height)` in normalized units. [`decode`]
//! thresholds, ranks and suppresses them into a list of [`Prediction`]s.
//!
//! Two behaviors differ from common detection toolkits and are kept on
//! purpose for compatibility with existing consumers:
//!
//! * Suppression is class-agnostic by default: a box of one class can remove
//!   an overlapping box of another. [`SuppressionMode::PerClass`] opts out.
//! * [`iou`] divides by the area of the rectangle enclosing both boxes, not by
//!   the area of their set union.
//!
//! Row scoring can run in parallel with the `rayon` feature; the `tracing`
//! feature emits spans and counts for each decode call.

pub mod classify;
mod candidate;
pub mod decode;
pub mod geometry;
pub mod labels;
pub mod pipeline;
pub mod tensor;
mod trace;
pub mod util;

pub use candidate::nms::SuppressionMode;
pub use classify::{top_classifications, Classification, ClassifyConfig};
pub use decode::{decode, decode_outputs, DecodeConfig, Decoder, LabeledPrediction, Prediction};
pub use geometry::{iou, Rect};
pub use labels::LabelMap;
pub use pipeline::{FrameGate, InFlight};
pub use tensor::{OwnedTensor, TensorView};
pub use util::{DetectError, DetectResult, ShapeError};
