//! Error types for kernel geometry construction and queries.

use thiserror::Error;

/// Errors raised while building curves and patches or looking up their edges.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// Too few points or control points for the requested geometry.
    #[error("{actual} points given, geometry needs {required} or more")]
    InsufficientPoints {
        /// Smallest accepted count.
        required: usize,
        /// Count supplied.
        actual: usize,
    },

    /// Spline degree outside the supported range.
    #[error("spline degree {degree} not in {min}..={max}")]
    InvalidDegree {
        /// Requested degree.
        degree: usize,
        /// Lowest supported degree.
        min: usize,
        /// Highest supported degree.
        max: usize,
    },

    /// Knot sequence rejected.
    #[error("bad knot sequence: {reason}")]
    InvalidKnotVector {
        /// Why the knots were rejected.
        reason: String,
    },

    /// Arc radius is zero, negative or not finite.
    #[error("arc radius {0} is not a positive finite number")]
    InvalidRadius(f64),

    /// Control grid does not match the declared dimensions.
    #[error("control grid has {actual} points, expected {n_xi} x {n_eta}")]
    GridSizeMismatch {
        /// Control points along xi.
        n_xi: usize,
        /// Control points along eta.
        n_eta: usize,
        /// Number of points supplied.
        actual: usize,
    },

    /// Requested edge does not exist on the surface.
    #[error("edge {edge} is out of range (surface has {count} edges, numbered from 1)")]
    EdgeOutOfRange {
        /// Requested 1-based edge number.
        edge: usize,
        /// Number of edges on the surface.
        count: usize,
    },

    /// Input collapses the geometry, e.g. an arc with no sweep.
    #[error("degenerate geometry: {reason}")]
    Degenerate {
        /// What collapsed.
        reason: String,
    },
}

impl GeometryError {
    /// Shorthand for [`GeometryError::InsufficientPoints`].
    #[must_use]
    pub fn insufficient_points(required: usize, actual: usize) -> Self {
        Self::InsufficientPoints { required, actual }
    }

    /// Shorthand for [`GeometryError::InvalidKnotVector`].
    #[must_use]
    pub fn invalid_knot_vector(reason: impl Into<String>) -> Self {
        Self::InvalidKnotVector {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`GeometryError::Degenerate`].
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }

    /// True for [`GeometryError::InsufficientPoints`].
    #[must_use]
    pub fn is_insufficient_points(&self) -> bool {
        matches!(self, Self::InsufficientPoints { .. })
    }

    /// True for [`GeometryError::EdgeOutOfRange`].
    #[must_use]
    pub fn is_edge_out_of_range(&self) -> bool {
        matches!(self, Self::EdgeOutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_values() {
        assert_eq!(
            GeometryError::insufficient_points(4, 2).to_string(),
            "2 points given, geometry needs 4 or more"
        );
        assert_eq!(
            GeometryError::InvalidDegree { degree: 9, min: 1, max: 5 }.to_string(),
            "spline degree 9 not in 1..=5"
        );
        assert_eq!(
            GeometryError::EdgeOutOfRange { edge: 5, count: 4 }.to_string(),
            "edge 5 is out of range (surface has 4 edges, numbered from 1)"
        );
        assert!(GeometryError::InvalidRadius(-0.5).to_string().contains("-0.5"));
    }

    #[test]
    fn test_kind_checks() {
        let short = GeometryError::insufficient_points(2, 1);
        assert!(short.is_insufficient_points());
        assert!(!short.is_edge_out_of_range());

        let missing = GeometryError::EdgeOutOfRange { edge: 0, count: 4 };
        assert!(missing.is_edge_out_of_range());
        assert!(!missing.is_insufficient_points());
    }

    #[test]
    fn test_reason_is_kept() {
        let knots = GeometryError::invalid_knot_vector("knots decrease at index 3");
        assert_eq!(knots.to_string(), "bad knot sequence: knots decrease at index 3");

        let flat = GeometryError::degenerate("arc sweep is zero");
        assert!(matches!(flat, GeometryError::Degenerate { ref reason } if reason == "arc sweep is zero"));
    }
}
