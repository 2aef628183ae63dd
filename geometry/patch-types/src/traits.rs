//! Core kernel traits.
//!
//! These are the only capabilities wall-distance code needs from a geometry
//! kernel: point evaluation, knot sequences and (for surfaces) boundary edges.

use crate::{GeometryError, Result};
use nalgebra::Point2;

/// A planar parametric curve sampled by its knot sequence.
///
/// The parameter domain is `[knots[0], knots[last]]`.
///
/// # Implementors
///
/// - [`Polyline`](crate::Polyline) - Piecewise linear
/// - [`Arc`](crate::Arc) - Circular arc, parameterized by angle
/// - [`BSpline`](crate::BSpline) - B-spline of arbitrary degree
pub trait Curve {
    /// Evaluate the curve at parameter `s`.
    ///
    /// Implementations must extrapolate smoothly for parameters slightly
    /// outside the domain; finite-difference stencils sample just past the
    /// end knots.
    fn evaluate(&self, s: f64) -> Point2<f64>;

    /// Knot values in non-decreasing order.
    ///
    /// Kernel curves return distinct values and at least two entries; callers
    /// must still tolerate a zero-length span.
    fn knots(&self) -> &[f64];

    /// The parameter domain `(s_min, s_max)`.
    fn domain(&self) -> (f64, f64) {
        let knots = self.knots();
        match (knots.first(), knots.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 0.0),
        }
    }

    /// Clamp `s` into the curve's domain.
    fn clamp_parameter(&self, s: f64) -> f64 {
        let (lo, hi) = self.domain();
        s.max(lo).min(hi)
    }
}

/// A planar parametric surface patch.
///
/// A surface carries a knot sequence in each parametric direction and an
/// ordered list of boundary edges.
pub trait Surface {
    /// Evaluate the surface at `(xi, eta)`.
    fn evaluate(&self, xi: f64, eta: f64) -> Point2<f64>;

    /// Distinct knot values along xi and eta.
    fn knots(&self) -> (&[f64], &[f64]);

    /// Boundary edges in the kernel's edge order.
    fn edges(&self) -> Vec<Box<dyn Curve>>;

    /// Look up a boundary edge by its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EdgeOutOfRange`] for edge 0 or a number past
    /// the last edge.
    fn edge(&self, number: usize) -> Result<Box<dyn Curve>> {
        let mut edges = self.edges();
        let count = edges.len();
        if number == 0 || number > count {
            return Err(GeometryError::EdgeOutOfRange {
                edge: number,
                count,
            });
        }
        Ok(edges.swap_remove(number - 1))
    }

    /// Number of grid points spanned by the two knot sequences.
    fn grid_len(&self) -> usize {
        let (xi, eta) = self.knots();
        xi.len() * eta.len()
    }
}

impl<T: Curve + ?Sized> Curve for &T {
    fn evaluate(&self, s: f64) -> Point2<f64> {
        (**self).evaluate(s)
    }

    fn knots(&self) -> &[f64] {
        (**self).knots()
    }
}

impl<T: Curve + ?Sized> Curve for Box<T> {
    fn evaluate(&self, s: f64) -> Point2<f64> {
        (**self).evaluate(s)
    }

    fn knots(&self) -> &[f64] {
        (**self).knots()
    }
}

impl<T: Surface + ?Sized> Surface for &T {
    fn evaluate(&self, xi: f64, eta: f64) -> Point2<f64> {
        (**self).evaluate(xi, eta)
    }

    fn knots(&self) -> (&[f64], &[f64]) {
        (**self).knots()
    }

    fn edges(&self) -> Vec<Box<dyn Curve>> {
        (**self).edges()
    }
}

impl<T: Surface + ?Sized> Surface for Box<T> {
    fn evaluate(&self, xi: f64, eta: f64) -> Point2<f64> {
        (**self).evaluate(xi, eta)
    }

    fn knots(&self) -> (&[f64], &[f64]) {
        (**self).knots()
    }

    fn edges(&self) -> Vec<Box<dyn Curve>> {
        (**self).edges()
    }
}

/// Collapse a non-decreasing knot vector to its distinct values.
pub(crate) fn distinct_knots(knots: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(knots.len());
    for &k in knots {
        if out.last().is_none_or(|&last| k > last) {
            out.push(k);
        }
    }
    out
}

/// Uniformly spaced values from `start` to `end` inclusive.
pub(crate) fn uniform_knots(start: f64, end: f64, segments: usize) -> Vec<f64> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| start + (end - start) * (i as f64 / segments as f64))
        .collect()
}
