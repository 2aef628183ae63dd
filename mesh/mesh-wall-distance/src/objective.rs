//! Closest-point objective.

use nalgebra::Point2;
use patch_types::Curve;

/// Squared Euclidean distance between `curve(s)` and `point`.
///
/// This is the objective every root-finding step minimizes.
#[inline]
pub fn squared_distance<C: Curve + ?Sized>(curve: &C, point: &Point2<f64>, s: f64) -> f64 {
    (curve.evaluate(s) - point).norm_squared()
}

/// Euclidean distance between `curve(s)` and `point`.
#[inline]
pub fn point_distance<C: Curve + ?Sized>(curve: &C, point: &Point2<f64>, s: f64) -> f64 {
    squared_distance(curve, point, s).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use patch_types::Polyline;

    #[test]
    fn test_distance_to_line() {
        let line = Polyline::line(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 2);
        let point = Point2::new(1.0, 3.0);

        assert_relative_eq!(squared_distance(&line, &point, 0.5), 9.0, epsilon = 1e-12);
        assert_relative_eq!(point_distance(&line, &point, 0.5), 3.0, epsilon = 1e-12);
        assert_relative_eq!(point_distance(&line, &point, 0.0), 10.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_objective_through_trait_object() {
        let line = Polyline::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), 1);
        let curve: &dyn Curve = &line;
        assert_relative_eq!(squared_distance(curve, &Point2::new(0.25, -2.0), 0.25), 4.0);
    }
}
