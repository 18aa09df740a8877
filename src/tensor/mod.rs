//! Borrowed and owned 2-D tensors.
//!
//! `TensorView` is a row-major view into a 1D buffer as handed over by an
//! inference runtime. Unlike image views there is no row padding: the buffer
//! must hold exactly `rows * cols` elements. A view with zero rows is valid and
//! describes a model output with no candidate boxes.

use crate::util::{DetectResult, ShapeError};

/// Borrowed row-major 2-D tensor view.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
}

impl<'a, T> TensorView<'a, T> {
    /// Creates a view of `rows x cols` elements.
    pub fn from_slice(data: &'a [T], rows: usize, cols: usize) -> DetectResult<Self> {
        let needed = rows
            .checked_mul(cols)
            .ok_or(ShapeError::BufferLength {
                needed: usize::MAX,
                got: data.len(),
            })?;
        if data.len() != needed {
            return Err(ShapeError::BufferLength {
                needed,
                got: data.len(),
            }
            .into());
        }
        Ok(Self { data, rows, cols })
    }

    /// Creates a view from a runtime-reported shape, which must have rank 2.
    ///
    /// `tensor` names the output in the error when the rank is wrong.
    pub fn from_shape(data: &'a [T], shape: &[usize], tensor: &'static str) -> DetectResult<Self> {
        match *shape {
            [rows, cols] => Self::from_slice(data, rows, cols),
            _ => Err(ShapeError::Rank {
                tensor,
                rank: shape.len(),
            }
            .into()),
        }
    }

    /// Returns the number of rows (boxes).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns per row.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns row `r` if it is within bounds.
    pub fn row(&self, r: usize) -> Option<&'a [T]> {
        if r >= self.rows {
            return None;
        }
        let start = r.checked_mul(self.cols)?;
        self.data.get(start..start + self.cols)
    }

    /// Returns the element at `(r, c)` if it is within bounds.
    pub fn get(&self, r: usize, c: usize) -> Option<&'a T> {
        if c >= self.cols {
            return None;
        }
        self.row(r)?.get(c)
    }

    /// Iterates over all rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [T]> + 'a {
        let cols = self.cols;
        let data = self.data;
        (0..self.rows).map(move |r| &data[r * cols..(r + 1) * cols])
    }
}

/// Owned row-major 2-D tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedTensor<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> OwnedTensor<T> {
    /// Wraps a buffer of exactly `rows * cols` elements.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> DetectResult<Self> {
        TensorView::from_slice(&data, rows, cols)?;
        Ok(Self { data, rows, cols })
    }

    /// Builds a tensor from equally sized rows.
    ///
    /// An empty row list yields a `0 x cols` tensor.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R], cols: usize) -> DetectResult<Self>
    where
        T: Copy,
    {
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(ShapeError::BufferLength {
                    needed: cols,
                    got: row.len(),
                }
                .into());
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the backing buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a borrowed view of this tensor.
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OwnedTensor, TensorView};
    use crate::util::{DetectError, ShapeError};

    #[test]
    fn rows_are_contiguous_slices() {
        let data: Vec<f32> = (0..6).map(|v| v as f32).collect();
        let view = TensorView::from_slice(&data, 2, 3).unwrap();
        assert_eq!(view.shape(), [2, 3]);
        assert_eq!(view.row(1).unwrap(), &[3.0, 4.0, 5.0]);
        assert_eq!(view.get(0, 2).copied(), Some(2.0));
        assert!(view.get(0, 3).is_none());
        assert!(view.row(2).is_none());
        assert_eq!(view.iter_rows().count(), 2);
    }

    #[test]
    fn zero_rows_is_a_valid_view() {
        let data: [f64; 0] = [];
        let view = TensorView::from_slice(&data, 0, 4).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.iter_rows().count(), 0);
    }

    #[test]
    fn buffer_length_must_match_shape() {
        let data = [0.0f32; 5];
        let err = TensorView::from_slice(&data, 2, 3).unwrap_err();
        assert_eq!(
            err,
            DetectError::ShapeMismatch(ShapeError::BufferLength { needed: 6, got: 5 })
        );
    }

    #[test]
    fn from_shape_rejects_wrong_rank() {
        let data = [0.0f32; 8];
        let err = TensorView::from_shape(&data, &[2, 1, 4], "coordinates").unwrap_err();
        assert_eq!(
            err,
            DetectError::ShapeMismatch(ShapeError::Rank {
                tensor: "coordinates",
                rank: 3,
            })
        );
        assert!(TensorView::from_shape(&data, &[2, 4], "coordinates").is_ok());
    }

    #[test]
    fn owned_from_rows_checks_width() {
        let tensor = OwnedTensor::from_rows(&[[0.1f32, 0.2], [0.3, 0.4]], 2).unwrap();
        assert_eq!(tensor.view().row(1).unwrap(), &[0.3, 0.4]);

        let ragged: Vec<Vec<f32>> = vec![vec![0.1, 0.2], vec![0.3]];
        assert!(OwnedTensor::from_rows(&ragged, 2).is_err());
    }
}
