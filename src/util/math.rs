//! Small numeric helpers shared by the decoding stages.

/// Returns the index and value of the strictly greatest element.
///
/// The scan starts from `(0, 0.0)`, so ties keep the lowest index and a row
/// with no positive value reports index 0 with confidence 0.0.
pub(crate) fn argmax_first<T>(row: &[T]) -> (usize, f64)
where
    T: Copy + Into<f64>,
{
    let mut max_index = 0usize;
    let mut max_value = 0.0f64;
    for (idx, value) in row.iter().copied().enumerate() {
        let value: f64 = value.into();
        if value > max_value {
            max_value = value;
            max_index = idx;
        }
    }
    (max_index, max_value)
}

#[cfg(test)]
mod tests {
    use super::argmax_first;

    #[test]
    fn argmax_first_keeps_lowest_index_on_ties() {
        assert_eq!(argmax_first(&[0.4f32, 0.4, 0.1]), (0, 0.4f32 as f64));
        assert_eq!(argmax_first(&[0.1f64, 0.7, 0.7]), (1, 0.7));
    }

    #[test]
    fn argmax_first_defaults_to_zero_for_non_positive_rows() {
        assert_eq!(argmax_first(&[0.0f64, 0.0, 0.0]), (0, 0.0));
        assert_eq!(argmax_first(&[-1.0f32, -0.5]), (0, 0.0));
        assert_eq!(argmax_first::<f32>(&[]), (0, 0.0));
    }

    #[test]
    fn argmax_first_ignores_nan() {
        assert_eq!(argmax_first(&[f64::NAN, 0.3, f64::NAN]), (1, 0.3));
    }
}
