//! Error types for detdecode.

use thiserror::Error;

/// Result alias for detdecode operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Ways in which the input tensors can disagree with the expected layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The confidence and coordinate tensors describe different box counts.
    #[error("confidence tensor has {confidence} boxes but coordinate tensor has {coordinates}")]
    BoxCount {
        confidence: usize,
        coordinates: usize,
    },
    /// A tensor was not two-dimensional.
    #[error("{tensor} tensor must have rank 2, got rank {rank}")]
    Rank { tensor: &'static str, rank: usize },
    /// Coordinate rows must hold exactly `(cx, cy, w, h)`.
    #[error("coordinate rows must have 4 values, got {got}")]
    CoordinateWidth { got: usize },
    /// The backing buffer does not match the declared shape.
    #[error("buffer holds {got} elements but shape needs {needed}")]
    BufferLength { needed: usize, got: usize },
    /// A confidence tensor with boxes but no classes.
    #[error("confidence tensor has {boxes} boxes but no classes")]
    NoClasses { boxes: usize },
}

/// Errors that can occur when decoding detections.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DetectError {
    /// Tensor shapes are malformed or disagree with each other.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeError),
    /// A required model output was not supplied.
    #[error("missing input: {tensor} tensor")]
    MissingInput { tensor: &'static str },
    /// A threshold lies outside its accepted range.
    #[error("invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
}
