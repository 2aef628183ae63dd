//! Planar parametric curve and surface patches.
//!
//! This crate is the geometry kernel behind wall-distance computation on
//! multi-patch planar domains. It provides a small set of curve and patch
//! primitives, each exposing the knot sequences that drive sampling:
//!
//! - [`Polyline`] - Piecewise linear curves, one knot per vertex
//! - [`Arc`] - Circular arcs parameterized by polar angle
//! - [`BSpline`] - B-spline curves with arbitrary degree
//! - [`BSplineSurface`] - Tensor-product B-spline patches
//!
//! # Core Traits
//!
//! - [`Curve`]: point evaluation, knot sequence, parameter domain
//! - [`Surface`]: point evaluation, knot sequences in xi and eta, and the
//!   boundary edges numbered from 1
//!
//! # Edge Numbering
//!
//! Patch boundaries are numbered 1 to 4 (see [`PatchEdge`]):
//!
//! | Number | Edge      |
//! |--------|-----------|
//! | 1      | `eta` min |
//! | 2      | `xi` max  |
//! | 3      | `eta` max |
//! | 4      | `xi` min  |
//!
//! # Example
//!
//! ```
//! use patch_types::{BSplineSurface, Curve, Surface};
//! use nalgebra::{Point2, Vector2};
//!
//! // A 4 x 1 rectangle split into 4 x 2 cells
//! let patch = BSplineSurface::rectangle(Point2::origin(), Vector2::new(4.0, 1.0), (4, 2)).unwrap();
//!
//! let (xi, eta) = patch.knots();
//! assert_eq!(xi.len(), 5);
//! assert_eq!(eta.len(), 3);
//!
//! // Edge 3 is the top boundary
//! let top = patch.edge(3).unwrap();
//! let p = top.evaluate(top.domain().0);
//! assert!((p.y - 1.0).abs() < 1e-12);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::cast_precision_loss,
    clippy::needless_range_loop,
    clippy::return_self_not_must_use
)]

mod arc;
mod bspline;
mod error;
mod polyline;
mod surface;
mod traits;

// Re-export core types
pub use arc::Arc;
pub use bspline::BSpline;
pub use error::GeometryError;
pub use polyline::Polyline;
pub use surface::{BSplineSurface, PatchEdge};
pub use traits::{Curve, Surface};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
