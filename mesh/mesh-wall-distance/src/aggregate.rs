//! Cross-curve minimum of per-curve distance matrices.

use crate::error::{WallDistanceError, WallDistanceResult};
use crate::field::DistanceMatrix;

/// Point-wise minimum over `matrices`, in xi-fastest order.
///
/// Each output entry is copied from one of the inputs, so a curve that is
/// closest everywhere reproduces its own matrix exactly.
///
/// # Errors
///
/// Returns [`WallDistanceError::EmptyWall`] if `matrices` is empty, or
/// [`WallDistanceError::ShapeMismatch`] if the matrices differ in shape.
pub fn minimum_distance(matrices: &[DistanceMatrix]) -> WallDistanceResult<DistanceMatrix> {
    let Some((first, rest)) = matrices.split_first() else {
        return Err(WallDistanceError::EmptyWall);
    };

    let mut minimum = first.clone();
    for matrix in rest {
        if matrix.shape() != first.shape() {
            return Err(WallDistanceError::ShapeMismatch {
                expected: first.shape(),
                actual: matrix.shape(),
            });
        }
        for (current, &value) in minimum.values_mut().iter_mut().zip(matrix.values()) {
            if value < *current {
                *current = value;
            }
        }
    }
    Ok(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(values: &[f64]) -> DistanceMatrix {
        DistanceMatrix::from_values(2, 2, values.to_vec()).unwrap()
    }

    #[test]
    fn test_minimum_of_two() {
        let a = matrix(&[1.0, 5.0, 3.0, 0.5]);
        let b = matrix(&[2.0, 4.0, 3.0, 0.25]);
        let min = minimum_distance(&[a, b]).unwrap();
        assert_eq!(min.values(), &[1.0, 4.0, 3.0, 0.25]);
    }

    #[test]
    fn test_closest_curve_reproduced_exactly() {
        let near = matrix(&[0.1, 0.2, 0.3, 0.4]);
        let far = matrix(&[1.1, 1.2, 1.3, 1.4]);
        let min = minimum_distance(&[far, near.clone()]).unwrap();
        assert_eq!(min, near);
    }

    #[test]
    fn test_single_matrix() {
        let only = matrix(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(minimum_distance(&[only.clone()]).unwrap(), only);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            minimum_distance(&[]),
            Err(WallDistanceError::EmptyWall)
        ));

        let a = matrix(&[1.0; 4]);
        let b = DistanceMatrix::new(4, 1);
        assert!(matches!(
            minimum_distance(&[a, b]),
            Err(WallDistanceError::ShapeMismatch {
                expected: (2, 2),
                actual: (4, 1)
            })
        ));
    }
}
