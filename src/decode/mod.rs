//! Detection decoding: tensors in, ranked and suppressed predictions out.
//!
//! A decode call runs four stages over one frame's model outputs:
//! per-box arg-max with a strict confidence threshold, conversion of
//! `(cx, cy, w, h)` rows to top-left rectangles, a stable descending sort,
//! and greedy IoU suppression. The call is pure; a malformed input fails the
//! whole call and never yields a partial list.

use crate::candidate::collect::collect_candidates;
use crate::candidate::nms::{suppress, SuppressionMode};
use crate::candidate::rank::rank_desc;
use crate::candidate::Candidate;
use crate::geometry::Rect;
use crate::labels::LabelMap;
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult, ShapeError};

/// Configuration for decoding detections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Boxes whose best class score is at or below this value are dropped.
    pub confidence_threshold: f32,
    /// A lower-ranked box is suppressed when its IoU with a kept box is
    /// strictly greater than this value.
    pub nms_threshold: f32,
    /// Which candidates compete during suppression.
    pub suppression: SuppressionMode,
    /// Score box rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            nms_threshold: 0.5,
            suppression: SuppressionMode::ClassAgnostic,
            parallel: false,
        }
    }
}

impl DecodeConfig {
    /// Checks that both thresholds are within range.
    pub fn validate(&self) -> DetectResult<()> {
        if !(0.0..1.0).contains(&self.confidence_threshold) {
            return Err(DetectError::InvalidThreshold {
                name: "confidence_threshold",
                value: self.confidence_threshold,
            });
        }
        if !(0.0..=1.0).contains(&self.nms_threshold) {
            return Err(DetectError::InvalidThreshold {
                name: "nms_threshold",
                value: self.nms_threshold,
            });
        }
        Ok(())
    }
}

/// A labeled bounding box emitted by [`decode`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    /// Class column that scored highest for this box.
    pub label_index: usize,
    /// Score of that class, strictly above the confidence threshold after
    /// narrowing to `f32`.
    pub confidence: f32,
    /// Top-left anchored box in normalized image coordinates, kept at the
    /// precision of the coordinate tensor.
    pub bounding_box: Rect,
}

impl From<Candidate> for Prediction {
    fn from(value: Candidate) -> Self {
        Self {
            label_index: value.class_index,
            confidence: value.confidence,
            bounding_box: value.bounding_box,
        }
    }
}

/// Prediction paired with its class name, when known.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabeledPrediction<'a> {
    pub prediction: Prediction,
    pub label: Option<&'a str>,
}

fn check_shapes<C, P>(
    confidence: &TensorView<'_, C>,
    coordinates: &TensorView<'_, P>,
) -> DetectResult<()> {
    if confidence.rows() != coordinates.rows() {
        return Err(ShapeError::BoxCount {
            confidence: confidence.rows(),
            coordinates: coordinates.rows(),
        }
        .into());
    }
    if coordinates.cols() != 4 {
        return Err(ShapeError::CoordinateWidth {
            got: coordinates.cols(),
        }
        .into());
    }
    if confidence.rows() > 0 && confidence.cols() == 0 {
        return Err(ShapeError::NoClasses {
            boxes: confidence.rows(),
        }
        .into());
    }
    Ok(())
}

/// Decodes one frame's confidence `[B, C]` and coordinate `[B, 4]` tensors.
///
/// Predictions come back in descending confidence order; equal confidences
/// keep ascending box order. Suppression is class-agnostic unless
/// `config.suppression` says otherwise.
pub fn decode<C, P>(
    confidence: TensorView<'_, C>,
    coordinates: TensorView<'_, P>,
    config: &DecodeConfig,
) -> DetectResult<Vec<Prediction>>
where
    C: Copy + Into<f64> + Sync,
    P: Copy + Into<f64> + Sync,
{
    config.validate()?;
    check_shapes(&confidence, &coordinates)?;

    let _span = trace_span!(
        "decode",
        boxes = confidence.rows(),
        classes = confidence.cols()
    )
    .entered();

    if confidence.is_empty() {
        return Ok(Vec::new());
    }

    let mut candidates = collect_stage(confidence, coordinates, config);
    trace_event!("decode_candidates", count = candidates.len());

    rank_desc(&mut candidates);
    let kept = suppress(&candidates, config.nms_threshold, config.suppression);
    trace_event!("decode_kept", count = kept.len());

    Ok(kept.into_iter().map(Prediction::from).collect())
}

#[cfg(feature = "rayon")]
fn collect_stage<C, P>(
    confidence: TensorView<'_, C>,
    coordinates: TensorView<'_, P>,
    config: &DecodeConfig,
) -> Vec<Candidate>
where
    C: Copy + Into<f64> + Sync,
    P: Copy + Into<f64> + Sync,
{
    if config.parallel {
        crate::candidate::collect::collect_candidates_par(
            confidence,
            coordinates,
            config.confidence_threshold,
        )
    } else {
        collect_candidates(confidence, coordinates, config.confidence_threshold)
    }
}

#[cfg(not(feature = "rayon"))]
fn collect_stage<C, P>(
    confidence: TensorView<'_, C>,
    coordinates: TensorView<'_, P>,
    config: &DecodeConfig,
) -> Vec<Candidate>
where
    C: Copy + Into<f64>,
    P: Copy + Into<f64>,
{
    collect_candidates(confidence, coordinates, config.confidence_threshold)
}

/// Decodes a model's raw output list.
///
/// Follows the detector's output order: index 0 holds the coordinates and
/// index 1 the class confidences. Missing entries fail with
/// [`DetectError::MissingInput`].
pub fn decode_outputs<T>(
    outputs: &[TensorView<'_, T>],
    config: &DecodeConfig,
) -> DetectResult<Vec<Prediction>>
where
    T: Copy + Into<f64> + Sync,
{
    let coordinates = outputs.first().copied().ok_or(DetectError::MissingInput {
        tensor: "coordinates",
    })?;
    let confidence = outputs.get(1).copied().ok_or(DetectError::MissingInput {
        tensor: "confidence",
    })?;
    decode(confidence, coordinates, config)
}

/// Reusable decoder holding a configuration and optional class names.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    config: DecodeConfig,
    labels: Option<LabelMap>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the decode configuration.
    pub fn with_config(mut self, config: DecodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches class names used by [`Decoder::decode_labeled`].
    pub fn with_labels(mut self, labels: LabelMap) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn labels(&self) -> Option<&LabelMap> {
        self.labels.as_ref()
    }

    pub fn decode<C, P>(
        &self,
        confidence: TensorView<'_, C>,
        coordinates: TensorView<'_, P>,
    ) -> DetectResult<Vec<Prediction>>
    where
        C: Copy + Into<f64> + Sync,
        P: Copy + Into<f64> + Sync,
    {
        decode(confidence, coordinates, &self.config)
    }

    /// Decodes and attaches the class name of each prediction.
    pub fn decode_labeled<C, P>(
        &self,
        confidence: TensorView<'_, C>,
        coordinates: TensorView<'_, P>,
    ) -> DetectResult<Vec<LabeledPrediction<'_>>>
    where
        C: Copy + Into<f64> + Sync,
        P: Copy + Into<f64> + Sync,
    {
        let predictions = self.decode(confidence, coordinates)?;
        Ok(predictions
            .into_iter()
            .map(|prediction| LabeledPrediction {
                prediction,
                label: self
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.name(prediction.label_index)),
            })
            .collect())
    }
}
