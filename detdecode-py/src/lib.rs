//! Python bindings for detdecode.
//!
//! Exposes `decode` over numpy arrays plus the `iou` helper.

use numpy::{Element, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use detdecode::{
    DecodeConfig, DetectError, Prediction as RustPrediction, Rect, SuppressionMode, TensorView,
};

fn to_py_err(err: DetectError) -> PyErr {
    match err {
        DetectError::InvalidThreshold { .. } => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Decoded detection: class index, confidence and normalized box.
#[pyclass]
#[derive(Clone)]
pub struct Prediction {
    /// Index of the winning class.
    #[pyo3(get)]
    pub label_index: usize,
    #[pyo3(get)]
    pub confidence: f32,
    /// Top-left x in normalized units.
    #[pyo3(get)]
    pub x: f64,
    /// Top-left y in normalized units.
    #[pyo3(get)]
    pub y: f64,
    #[pyo3(get)]
    pub width: f64,
    #[pyo3(get)]
    pub height: f64,
}

#[pymethods]
impl Prediction {
    /// Box as an `(x, y, width, height)` tuple.
    fn bbox(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }

    /// Box scaled to a frame of `width x height` pixels.
    fn pixel_bbox(&self, width: f64, height: f64) -> (f64, f64, f64, f64) {
        let rect = Rect::new(self.x, self.y, self.width, self.height).to_pixels(width, height);
        (rect.x, rect.y, rect.width, rect.height)
    }

    fn __repr__(&self) -> String {
        format!(
            "Prediction(label_index={}, confidence={:.4}, x={:.4}, y={:.4}, width={:.4}, height={:.4})",
            self.label_index, self.confidence, self.x, self.y, self.width, self.height
        )
    }
}

impl From<RustPrediction> for Prediction {
    fn from(p: RustPrediction) -> Self {
        Self {
            label_index: p.label_index,
            confidence: p.confidence,
            x: p.bounding_box.x,
            y: p.bounding_box.y,
            width: p.bounding_box.width,
            height: p.bounding_box.height,
        }
    }
}

/// 2-D model output as handed over from numpy, in either float width.
#[derive(FromPyObject)]
enum FloatArray2<'py> {
    F32(PyReadonlyArray2<'py, f32>),
    F64(PyReadonlyArray2<'py, f64>),
}

fn view2<'a, T: Element>(
    array: &'a PyReadonlyArray2<'_, T>,
    name: &'static str,
) -> PyResult<TensorView<'a, T>> {
    let shape = array.shape();
    let data = array.as_slice()?;
    TensorView::from_shape(data, shape, name).map_err(to_py_err)
}

fn decode_views<C, P>(
    confidence: &PyReadonlyArray2<'_, C>,
    coordinates: &PyReadonlyArray2<'_, P>,
    config: &DecodeConfig,
) -> PyResult<Vec<Prediction>>
where
    C: Element + Copy + Into<f64> + Sync,
    P: Element + Copy + Into<f64> + Sync,
{
    let conf_view = view2(confidence, "confidence")?;
    let coord_view = view2(coordinates, "coordinates")?;
    let predictions = detdecode::decode(conf_view, coord_view, config).map_err(to_py_err)?;
    Ok(predictions.into_iter().map(Prediction::from).collect())
}

/// Decode raw detector outputs into predictions.
///
/// Args:
///     confidence: float32 or float64 array of shape (boxes, classes)
///     coordinates: float32 or float64 array of shape (boxes, 4), rows (cx, cy, w, h)
///     confidence_threshold: boxes at or below this score are dropped
///     nms_threshold: boxes overlapping a kept box by more than this are dropped
///     suppression: "class_agnostic" (default) or "per_class"
///     parallel: score rows in parallel
///
/// Returns:
///     List of Prediction objects, highest confidence first
#[pyfunction]
#[pyo3(signature = (confidence, coordinates, confidence_threshold=0.25, nms_threshold=0.5, suppression="class_agnostic", parallel=false))]
fn decode(
    confidence: FloatArray2<'_>,
    coordinates: FloatArray2<'_>,
    confidence_threshold: f32,
    nms_threshold: f32,
    suppression: &str,
    parallel: bool,
) -> PyResult<Vec<Prediction>> {
    let suppression = match suppression.to_lowercase().as_str() {
        "class_agnostic" => SuppressionMode::ClassAgnostic,
        "per_class" => SuppressionMode::PerClass,
        _ => {
            return Err(PyValueError::new_err(
                "suppression must be 'class_agnostic' or 'per_class'",
            ))
        }
    };
    let config = DecodeConfig {
        confidence_threshold,
        nms_threshold,
        suppression,
        parallel,
    };

    match (&confidence, &coordinates) {
        (FloatArray2::F32(conf), FloatArray2::F32(coords)) => decode_views(conf, coords, &config),
        (FloatArray2::F32(conf), FloatArray2::F64(coords)) => decode_views(conf, coords, &config),
        (FloatArray2::F64(conf), FloatArray2::F32(coords)) => decode_views(conf, coords, &config),
        (FloatArray2::F64(conf), FloatArray2::F64(coords)) => decode_views(conf, coords, &config),
    }
}

/// Overlap of two `(x, y, width, height)` boxes, divided by the area of the
/// rectangle enclosing both.
#[pyfunction]
fn iou(a: (f64, f64, f64, f64), b: (f64, f64, f64, f64)) -> f32 {
    let a = Rect::new(a.0, a.1, a.2, a.3);
    let b = Rect::new(b.0, b.1, b.2, b.3);
    detdecode::iou(&a, &b)
}

#[pymodule]
fn _detdecode(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Prediction>()?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(iou, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
