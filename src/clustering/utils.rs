use ndarray::{stack, Array1, ArrayView1, Axis};

/// Coordinate-wise mean of `rows`, `None` when there are no rows or their
/// lengths disagree.
pub fn compute_mean(rows: &[ArrayView1<f64>]) -> Option<Array1<f64>> {
    if rows.is_empty() {
        return None;
    }
    let stacked = stack(Axis(0), rows).ok()?;
    stacked.mean_axis(Axis(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_compute_mean() {
        let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let rows = vec![data.row(0), data.row(2)]; // Select the first and third rows

        let result = compute_mean(&rows).unwrap();
        let expected = array![3.0, 4.0]; // Mean of [1.0, 2.0] and [5.0, 6.0]

        assert_eq!(result, expected);
    }

    #[test]
    fn test_compute_mean_empty() {
        assert!(compute_mean(&[]).is_none());
    }

    #[test]
    fn test_compute_mean_ragged() {
        let a = array![1.0, 2.0];
        let b = array![1.0];
        assert!(compute_mean(&[a.view(), b.view()]).is_none());
    }
}
