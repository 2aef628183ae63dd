//! B-spline curves.
//!
//! B-splines give local control through a knot vector: moving a control
//! point only affects the spans it supports. Wall edges exported by
//! [`BSplineSurface`](crate::BSplineSurface) are B-splines.

use crate::traits::distinct_knots;
use crate::{Curve, GeometryError, Result};
use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A planar B-spline curve of arbitrary degree.
///
/// # Knot Vector
///
/// The knot vector must be non-decreasing and have length `n + p + 1`, where
/// `n` is the number of control points and `p` is the degree. The valid
/// domain is `[knots[p], knots[n]]`, and [`Curve::knots`] reports the distinct
/// knot values inside it.
///
/// # Example
///
/// ```
/// use patch_types::{BSpline, Curve};
/// use nalgebra::Point2;
///
/// let control_points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 2.0),
///     Point2::new(3.0, 2.0),
///     Point2::new(4.0, 0.0),
///     Point2::new(5.0, -1.0),
/// ];
///
/// let spline = BSpline::clamped(control_points, 3).unwrap();
///
/// // Clamped splines interpolate their end control points
/// let end = spline.evaluate(1.0);
/// assert!((end.x - 5.0).abs() < 1e-10);
/// assert_eq!(spline.knots(), &[0.0, 0.5, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BSpline {
    /// Control points.
    control_points: Vec<Point2<f64>>,
    /// Full knot vector, including end multiplicities.
    knot_vector: Vec<f64>,
    /// Degree of the B-spline.
    degree: usize,
    /// Distinct knots inside the domain.
    breakpoints: Vec<f64>,
}

impl BSpline {
    /// Create a B-spline with explicit knot vector.
    ///
    /// # Parameters
    ///
    /// - `control_points`: The control points
    /// - `knot_vector`: The knot vector (must have length `n + degree + 1`)
    /// - `degree`: The polynomial degree (at least 1)
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The degree is zero
    /// - Fewer than `degree + 1` control points
    /// - Knot vector has incorrect length, is decreasing, or spans an empty domain
    pub fn new(control_points: Vec<Point2<f64>>, knot_vector: Vec<f64>, degree: usize) -> Result<Self> {
        let n = control_points.len();
        validate_knot_vector(n, degree, &knot_vector)?;
        Ok(Self::from_validated(control_points, knot_vector, degree))
    }

    /// Create a clamped (open) B-spline with uniform interior knots on `[0, 1]`.
    ///
    /// Clamped B-splines pass through their first and last control points.
    ///
    /// # Errors
    ///
    /// Returns error if the degree is zero or there are fewer than
    /// `degree + 1` control points.
    pub fn clamped(control_points: Vec<Point2<f64>>, degree: usize) -> Result<Self> {
        let knot_vector = clamped_knot_vector(control_points.len(), degree)?;
        Self::new(control_points, knot_vector, degree)
    }

    /// Build from parts that already passed [`validate_knot_vector`].
    pub(crate) fn from_validated(
        control_points: Vec<Point2<f64>>,
        knot_vector: Vec<f64>,
        degree: usize,
    ) -> Self {
        let n = control_points.len();
        let breakpoints = distinct_knots(&knot_vector[degree..=n]);
        Self {
            control_points,
            knot_vector,
            degree,
            breakpoints,
        }
    }

    /// Get the control points.
    #[must_use]
    pub fn control_points(&self) -> &[Point2<f64>] {
        &self.control_points
    }

    /// Get the full knot vector.
    #[must_use]
    pub fn knot_vector(&self) -> &[f64] {
        &self.knot_vector
    }

    /// Get the degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }
}

impl Curve for BSpline {
    fn evaluate(&self, s: f64) -> Point2<f64> {
        let n = self.control_points.len();
        let p = self.degree;
        let span = find_span(&self.knot_vector, n, p, s);
        let basis = basis_functions(&self.knot_vector, p, span, s);

        let mut point = Vector2::zeros();
        for (i, b) in basis.iter().enumerate() {
            point += self.control_points[span - p + i].coords * *b;
        }
        Point2::from(point)
    }

    fn knots(&self) -> &[f64] {
        &self.breakpoints
    }
}

/// Check a knot vector against the control point count and degree.
pub(crate) fn validate_knot_vector(n: usize, degree: usize, knots: &[f64]) -> Result<()> {
    if degree == 0 {
        return Err(GeometryError::InvalidDegree {
            degree,
            min: 1,
            max: n.saturating_sub(1).max(1),
        });
    }

    // Need at least degree + 1 control points
    if n < degree + 1 {
        return Err(GeometryError::insufficient_points(degree + 1, n));
    }

    let expected = n + degree + 1;
    if knots.len() != expected {
        return Err(GeometryError::invalid_knot_vector(format!(
            "expected {} knots for {} control points and degree {}, got {}",
            expected,
            n,
            degree,
            knots.len()
        )));
    }

    if knots.iter().any(|k| !k.is_finite()) {
        return Err(GeometryError::invalid_knot_vector("knots must be finite"));
    }

    for i in 1..knots.len() {
        if knots[i] < knots[i - 1] {
            return Err(GeometryError::invalid_knot_vector(format!(
                "knot vector is not non-decreasing at index {} ({} < {})",
                i,
                knots[i],
                knots[i - 1]
            )));
        }
    }

    if knots[n] <= knots[degree] {
        return Err(GeometryError::invalid_knot_vector("domain has zero length"));
    }

    Ok(())
}

/// Clamped knot vector on `[0, 1]` with uniform interior knots.
pub(crate) fn clamped_knot_vector(n: usize, degree: usize) -> Result<Vec<f64>> {
    if degree == 0 {
        return Err(GeometryError::InvalidDegree {
            degree,
            min: 1,
            max: n.saturating_sub(1).max(1),
        });
    }
    if n < degree + 1 {
        return Err(GeometryError::insufficient_points(degree + 1, n));
    }

    let mut knots = Vec::with_capacity(n + degree + 1);
    knots.extend(std::iter::repeat_n(0.0, degree + 1));
    let num_interior = n - degree - 1;
    for i in 1..=num_interior {
        knots.push(i as f64 / (num_interior + 1) as f64);
    }
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    Ok(knots)
}

/// Find the knot span index for parameter `u`.
///
/// Returns `i` such that `knots[i] <= u < knots[i+1]`, clamped to the first
/// and last non-empty spans so out-of-domain parameters extrapolate the end
/// polynomial pieces.
pub(crate) fn find_span(knots: &[f64], n: usize, p: usize, u: f64) -> usize {
    if u >= knots[n] {
        // Last non-empty span
        let mut span = n - 1;
        while span > p && knots[span] >= knots[span + 1] {
            span -= 1;
        }
        return span;
    }
    if u <= knots[p] {
        let mut span = p;
        while span < n - 1 && knots[span] >= knots[span + 1] {
            span += 1;
        }
        return span;
    }

    // Binary search
    let mut low = p;
    let mut high = n;
    while low < high {
        let mid = (low + high) / 2;
        if knots[mid] > u {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    low - 1
}

/// Compute the `p + 1` non-zero basis functions at parameter `u`.
pub(crate) fn basis_functions(knots: &[f64], p: usize, span: usize, u: f64) -> Vec<f64> {
    let mut n_basis = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];

    n_basis[0] = 1.0;

    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;

        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            if denom.abs() > 1e-15 {
                let temp = n_basis[r] / denom;
                n_basis[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            } else {
                n_basis[r] = saved;
                saved = 0.0;
            }
        }
        n_basis[j] = saved;
    }

    n_basis
}
