//! Error types for wall-distance computation.

use patch_types::GeometryError;
use thiserror::Error;

/// Errors that can occur while computing a wall-distance field.
///
/// Only configuration problems surface here. Slow or failed convergence of a
/// single root-find is absorbed by the solvers and reported through
/// [`Projection`](crate::Projection) diagnostics instead.
#[derive(Debug, Error)]
pub enum WallDistanceError {
    /// Root-finding policy name not recognized.
    #[error("Unsupported root-finding policy {0:?} (expected \"quad+newton\", \"quad\" or \"newton\")")]
    UnsupportedPolicy(String),

    /// The wall specification names no edges.
    #[error("Wall specification names no edges")]
    EmptyWall,

    /// No surfaces were supplied.
    #[error("No surfaces supplied")]
    NoSurfaces,

    /// A 1-based patch index is zero or past the last surface.
    #[error("Patch {patch} out of range (model has {count} surfaces)")]
    PatchOutOfRange {
        /// The requested patch number.
        patch: usize,
        /// Number of surfaces available.
        count: usize,
    },

    /// A wall edge does not exist on its patch.
    #[error("Edge {edge} out of range on patch {patch} (patch has {count} edges)")]
    EdgeOutOfRange {
        /// Patch the edge was looked up on.
        patch: usize,
        /// The requested edge number.
        edge: usize,
        /// Number of edges on the patch.
        count: usize,
    },

    /// A knot sequence cannot drive sampling.
    #[error("Invalid knots for {context}: {reason}")]
    InvalidKnots {
        /// Which curve or surface direction was rejected.
        context: String,
        /// What is wrong with the knots.
        reason: String,
    },

    /// Solver parameters are out of range.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Distance matrices fed to one aggregation differ in shape.
    #[error("Distance matrix shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Shape of the first matrix.
        expected: (usize, usize),
        /// Shape of the offending matrix.
        actual: (usize, usize),
    },

    /// Geometry kernel error.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl WallDistanceError {
    /// Create an invalid-knots error.
    pub fn invalid_knots(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKnots {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-parameters error.
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams(reason.into())
    }

    /// Check if this is a configuration error the caller can fix by changing
    /// its request (policy, wall or patch selection).
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPolicy(_)
                | Self::EmptyWall
                | Self::NoSurfaces
                | Self::PatchOutOfRange { .. }
                | Self::EdgeOutOfRange { .. }
                | Self::InvalidParams(_)
        )
    }
}

/// Result type for wall-distance operations.
pub type WallDistanceResult<T> = std::result::Result<T, WallDistanceError>;
