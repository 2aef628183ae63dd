//! Wall distance fields over parametric surface grids.
//!
//! For every grid point of a set of planar surface patches, this crate finds
//! the shortest distance to a wall made of patch boundary edges. The result
//! is the boundary-layer distance function used when grading meshes towards
//! walls.
//!
//! Each grid point is projected onto each wall curve with a 1-D closest-point
//! root finder, and the per-curve distances are reduced to a point-wise
//! minimum. Three root-finding policies are available:
//!
//! - **quad+newton** (default): rounds of parabolic interpolation on a
//!   shrinking four-slot bracket, each followed by a finite-difference
//!   Newton step
//! - **quad**: parabolic interpolation only, warm-started along each xi row
//! - **newton**: Newton iteration from the previous result, with random knot
//!   restarts when it stalls
//!
//! Convergence is judged against a tolerance scaled by the local knot
//! interval, so coarse and fine regions of a curve are resolved alike.
//!
//! # Examples
//!
//! Distances inside a channel bounded by two walls:
//!
//! ```
//! use mesh_wall_distance::{WallDistanceParams, WallSpec, compute_distance_field};
//! use patch_types::BSplineSurface;
//! use nalgebra::{Point2, Vector2};
//!
//! // Patch 1 is the channel, patch 2 a strip along its centre line
//! let surfaces = vec![
//!     BSplineSurface::rectangle(Point2::origin(), Vector2::new(4.0, 1.0), (4, 2))?,
//!     BSplineSurface::rectangle(Point2::new(0.0, 0.5), Vector2::new(4.0, 0.0), (4, 1))?,
//! ];
//!
//! // Floor and ceiling of the channel
//! let wall = WallSpec::new().with_edges(1, [1, 3]);
//!
//! let field = compute_distance_field(&surfaces, &wall, &[2], &WallDistanceParams::default())?;
//! for d in &field.surfaces[0].values {
//!     assert!((d - 0.5).abs() < 1e-9);
//! }
//! # Ok::<(), mesh_wall_distance::WallDistanceError>(())
//! ```
//!
//! Selecting the policy by name:
//!
//! ```
//! use mesh_wall_distance::{WallSpec, distance_field};
//! use patch_types::BSplineSurface;
//! use nalgebra::{Point2, Vector2};
//!
//! let surfaces = [BSplineSurface::rectangle(Point2::origin(), Vector2::new(2.0, 2.0), (2, 2))?];
//! let wall = WallSpec::new().with_edge(1, 4);
//!
//! let coefficients = distance_field(&surfaces, &wall, &[], "newton")?;
//! assert_eq!(coefficients[0].len(), 9);
//!
//! assert!(distance_field(&surfaces, &wall, &[], "bisection").is_err());
//! # Ok::<(), mesh_wall_distance::WallDistanceError>(())
//! ```
//!
//! # Grid Order
//!
//! Grid points are the cross product of a surface's xi and eta knots. Every
//! matrix and field is stored xi-fastest: point `(i, j)` is at index
//! `j * n_xi + i`.

#![warn(missing_docs)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod aggregate;
mod distance;
mod error;
mod field;
mod newton;
mod objective;
mod params;
mod policy;
mod quadratic;
mod solver;
mod sweep;
mod tolerance;
mod wall;

pub use aggregate::minimum_distance;
pub use distance::{compute_distance_field, distance_field};
pub use error::{WallDistanceError, WallDistanceResult};
pub use field::{DistanceField, DistanceMatrix, SurfaceDistanceField, SweepStatistics};
pub use newton::{
    MAX_WIDENINGS, NEWTON_WIDTH, STENCIL_WIDENING, adaptive_newton_step, newton_step,
};
pub use objective::{point_distance, squared_distance};
pub use params::{DEFAULT_MAX_ITERATIONS, WallDistanceParams};
pub use policy::RootFindingPolicy;
pub use quadratic::{Bracket, DEGENERATE_DENOMINATOR, quadratic_min_step};
pub use solver::{
    NewtonSolver, Projection, ProjectionSolver, QuadNewtonSolver, QuadSolver, WarmStart,
    WarmStartScope, build_solver,
};
pub use sweep::{SurfaceGrid, sweep_curve, sweep_surface};
pub use tolerance::{RELATIVE_TOLERANCE, adaptive_tolerance, nearest_knot};
pub use wall::{WallSpec, resolve_wall_curves, resolve_work_surfaces};
