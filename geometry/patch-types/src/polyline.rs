//! Polyline (piecewise linear) curves.
//!
//! A polyline is a sequence of connected line segments with one knot per
//! vertex. It is the usual representation of straight walls and of
//! linear spline edges.

use crate::traits::uniform_knots;
use crate::{Curve, GeometryError, Result};
use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A piecewise linear curve with one knot per vertex.
///
/// # Parameterization
///
/// Vertex `i` sits at knot `i`; between vertices the curve interpolates
/// linearly in the parameter. Outside the domain the first and last
/// segments are extended.
///
/// # Example
///
/// ```
/// use patch_types::{Curve, Polyline};
/// use nalgebra::Point2;
///
/// let line = Polyline::line(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), 4);
///
/// // Five knots, uniformly spaced over [0, 1]
/// assert_eq!(line.knots().len(), 5);
///
/// let mid = line.evaluate(0.5);
/// assert!((mid.x - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polyline {
    /// The vertices of the polyline.
    vertices: Vec<Point2<f64>>,
    /// Knot value of each vertex, strictly increasing.
    knots: Vec<f64>,
}

impl Polyline {
    /// Create a polyline with knots uniformly spaced over `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than two vertices are given.
    pub fn new(vertices: Vec<Point2<f64>>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(GeometryError::insufficient_points(2, vertices.len()));
        }
        let knots = uniform_knots(0.0, 1.0, vertices.len() - 1);
        Ok(Self { vertices, knots })
    }

    /// Create a polyline with an explicit knot per vertex.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Fewer than two vertices
    /// - Knot count differs from vertex count
    /// - Knots are not strictly increasing or not finite
    pub fn with_knots(vertices: Vec<Point2<f64>>, knots: Vec<f64>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(GeometryError::insufficient_points(2, vertices.len()));
        }
        if knots.len() != vertices.len() {
            return Err(GeometryError::invalid_knot_vector(format!(
                "expected {} knots for {} vertices, got {}",
                vertices.len(),
                vertices.len(),
                knots.len()
            )));
        }
        if knots.iter().any(|k| !k.is_finite()) {
            return Err(GeometryError::invalid_knot_vector("knots must be finite"));
        }
        for i in 1..knots.len() {
            if knots[i] <= knots[i - 1] {
                return Err(GeometryError::invalid_knot_vector(format!(
                    "knots are not strictly increasing at index {} ({} <= {})",
                    i,
                    knots[i],
                    knots[i - 1]
                )));
            }
        }
        Ok(Self { vertices, knots })
    }

    /// A straight segment from `start` to `end`, split into `segments`
    /// equal pieces so the knot sequence has `segments + 1` entries.
    #[must_use]
    pub fn line(start: Point2<f64>, end: Point2<f64>, segments: usize) -> Self {
        let segments = segments.max(1);
        let knots = uniform_knots(0.0, 1.0, segments);
        let vertices = knots.iter().map(|&t| start + (end - start) * t).collect();
        Self { vertices, knots }
    }

    /// Get the vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Total Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum()
    }

    /// Index of the segment used to evaluate `s`.
    fn segment_index(&self, s: f64) -> usize {
        let last = self.knots.len() - 2;
        // partition_point gives the first knot strictly greater than s
        let upper = self.knots.partition_point(|&k| k <= s);
        upper.saturating_sub(1).min(last)
    }
}

impl Curve for Polyline {
    fn evaluate(&self, s: f64) -> Point2<f64> {
        let i = self.segment_index(s);
        let (k0, k1) = (self.knots[i], self.knots[i + 1]);
        let local = (s - k0) / (k1 - k0);
        let p0 = self.vertices[i];
        let p1 = self.vertices[i + 1];
        p0 + (p1 - p0) * local
    }

    fn knots(&self) -> &[f64] {
        &self.knots
    }
}
