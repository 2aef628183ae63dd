//! Circular arcs.
//!
//! Arcs use direct trigonometric evaluation with the polar angle as the
//! curve parameter, so knots are angles in radians.

use crate::traits::uniform_knots;
use crate::{Curve, GeometryError, Result};
use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of knot intervals along an arc.
const DEFAULT_SEGMENTS: usize = 8;

/// A circular arc in the plane.
///
/// The parameter is the polar angle about the centre; the arc runs from
/// `start_angle` to `end_angle` (counter-clockwise when `end > start`).
///
/// # Example
///
/// ```
/// use patch_types::{Arc, Curve};
/// use nalgebra::Point2;
/// use std::f64::consts::PI;
///
/// // Upper half of the unit circle
/// let arc = Arc::new(Point2::origin(), 1.0, 0.0, PI).unwrap();
///
/// let start = arc.evaluate(0.0);
/// assert!((start.x - 1.0).abs() < 1e-12);
///
/// let top = arc.evaluate(PI / 2.0);
/// assert!((top.y - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arc {
    /// Center of the arc.
    center: Point2<f64>,
    /// Radius of the arc.
    radius: f64,
    /// Knot angles, from start to end angle.
    knots: Vec<f64>,
}

impl Arc {
    /// Create an arc from centre, radius and start/end angles.
    ///
    /// The knot sequence splits the sweep into eight equal intervals; use
    /// [`Self::with_segments`] to change that.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The radius is not positive and finite
    /// - The angles are not finite or `end_angle <= start_angle`
    pub fn new(center: Point2<f64>, radius: f64, start_angle: f64, end_angle: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if !(start_angle.is_finite() && end_angle.is_finite()) {
            return Err(GeometryError::degenerate("arc angles must be finite"));
        }
        if end_angle <= start_angle {
            return Err(GeometryError::degenerate(format!(
                "arc sweep must be positive (start {start_angle}, end {end_angle})"
            )));
        }

        Ok(Self {
            center,
            radius,
            knots: uniform_knots(start_angle, end_angle, DEFAULT_SEGMENTS),
        })
    }

    /// Re-sample the knot sequence with `segments` equal angular intervals.
    #[must_use]
    pub fn with_segments(mut self, segments: usize) -> Self {
        let (start, end) = self.domain();
        self.knots = uniform_knots(start, end, segments);
        self
    }

    /// Get the center.
    #[must_use]
    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    /// Get the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Sweep angle in radians.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        let (start, end) = self.domain();
        end - start
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep()
    }
}

impl Curve for Arc {
    fn evaluate(&self, s: f64) -> Point2<f64> {
        let (sin, cos) = s.sin_cos();
        Point2::new(
            self.center.x + self.radius * cos,
            self.center.y + self.radius * sin,
        )
    }

    fn knots(&self) -> &[f64] {
        &self.knots
    }
}
