use crate::error::{ClusteringError, Result};
use ndarray::ArrayView1;
use ndarray_stats::errors::MultiInputError;
use ndarray_stats::DeviationExt;

/// [Euclidean Distance](https://en.wikipedia.org/wiki/Euclidean_distance)
///
/// Fails with `DimensionMismatch` when the vectors differ in length. Two
/// zero-length vectors are at distance `0.0`.
#[inline]
pub fn euclidean(point1: &ArrayView1<f64>, point2: &ArrayView1<f64>) -> Result<f64> {
    check_lengths(point1, point2)?;
    match point1.l2_dist(point2) {
        Ok(distance) => Ok(distance),
        Err(MultiInputError::EmptyInput) => Ok(0.0),
        Err(MultiInputError::ShapeMismatch(_)) => Err(ClusteringError::DimensionMismatch {
            expected: point1.len(),
            actual: point2.len(),
        }),
    }
}

/// Squared Euclidean distance, same contract as [`euclidean`]
#[inline]
pub fn squared_euclidean(point1: &ArrayView1<f64>, point2: &ArrayView1<f64>) -> Result<f64> {
    check_lengths(point1, point2)?;
    match point1.sq_l2_dist(point2) {
        Ok(distance) => Ok(distance),
        Err(MultiInputError::EmptyInput) => Ok(0.0),
        Err(MultiInputError::ShapeMismatch(_)) => Err(ClusteringError::DimensionMismatch {
            expected: point1.len(),
            actual: point2.len(),
        }),
    }
}

fn check_lengths(point1: &ArrayView1<f64>, point2: &ArrayView1<f64>) -> Result<()> {
    if point1.len() != point2.len() {
        return Err(ClusteringError::DimensionMismatch {
            expected: point1.len(),
            actual: point2.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_euclidean_distance() {
        let point1 = array![1.0, 2.0, 3.0];
        let point2 = array![4.0, 5.0, 6.0];

        let result = euclidean(&point1.view(), &point2.view()).unwrap();
        let expected = 27.0_f64.sqrt();

        assert!((result - expected).abs() < 1e-12, "Expected {}, got {}", expected, result);
    }

    #[test]
    fn test_squared_euclidean_distance() {
        let point1 = array![1.0, 2.0, 3.0];
        let point2 = array![4.0, 5.0, 6.0];

        let result = squared_euclidean(&point1.view(), &point2.view()).unwrap();
        assert_eq!(result, 27.0); // (4-1)^2 + (5-2)^2 + (6-3)^2
    }

    #[test]
    fn test_zero_distance() {
        let point = array![1.0, 2.0, 3.0];
        assert_eq!(euclidean(&point.view(), &point.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_vectors() {
        let empty = Array1::<f64>::zeros(0);
        assert_eq!(euclidean(&empty.view(), &empty.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_mismatched_lengths() {
        let point1 = array![1.0, 2.0, 3.0];
        let point2 = array![1.0, 2.0];
        let err = euclidean(&point1.view(), &point2.view()).unwrap_err();
        assert!(matches!(
            err,
            ClusteringError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }
}
