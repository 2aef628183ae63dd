//! Distance-field orchestration.

use crate::aggregate::minimum_distance;
use crate::error::{WallDistanceError, WallDistanceResult};
use crate::field::{DistanceField, SurfaceDistanceField};
use crate::params::WallDistanceParams;
use crate::policy::RootFindingPolicy;
use crate::solver::build_solver;
use crate::sweep::{SurfaceGrid, sweep_surface};
use crate::wall::{WallSpec, resolve_wall_curves, resolve_work_surfaces, validate_surface_knots};
use patch_types::Surface;
use tracing::info;

/// Compute the minimum wall distance at every grid point of the selected
/// surfaces.
///
/// # Arguments
///
/// * `surfaces` - All surfaces of the model, numbered from 1
/// * `wall` - Patch edges forming the wall
/// * `patches` - 1-based patch numbers to process; empty processes all
/// * `params` - Solver parameters
///
/// # Returns
///
/// One [`SurfaceDistanceField`] per processed surface, in the order given by
/// `patches` (or model order).
///
/// # Errors
///
/// Returns an error for invalid parameters, an empty model or wall, an
/// out-of-range patch or edge, or unusable knot sequences. Slow convergence
/// is never an error; see [`SweepStatistics`](crate::SweepStatistics).
///
/// # Example
///
/// ```
/// use mesh_wall_distance::{WallDistanceParams, WallSpec, compute_distance_field};
/// use patch_types::BSplineSurface;
/// use nalgebra::{Point2, Vector2};
///
/// let channel = BSplineSurface::rectangle(Point2::origin(), Vector2::new(4.0, 1.0), (4, 2))?;
/// // Floor of the channel is the wall
/// let wall = WallSpec::new().with_edge(1, 1);
///
/// let field = compute_distance_field(&[channel], &wall, &[], &WallDistanceParams::default())?;
///
/// let surface = &field.surfaces[0];
/// assert_eq!(surface.shape, (5, 3));
/// assert!((surface.get(2, 1).unwrap() - 0.5).abs() < 1e-9);
/// # Ok::<(), mesh_wall_distance::WallDistanceError>(())
/// ```
pub fn compute_distance_field<S: Surface>(
    surfaces: &[S],
    wall: &WallSpec,
    patches: &[usize],
    params: &WallDistanceParams,
) -> WallDistanceResult<DistanceField> {
    params.validate()?;
    if surfaces.is_empty() {
        return Err(WallDistanceError::NoSurfaces);
    }

    let work = resolve_work_surfaces(surfaces.len(), patches)?;
    let curves = resolve_wall_curves(surfaces, wall)?;
    let mut solver = build_solver(params)?;

    info!(
        policy = %params.policy,
        surfaces = work.len(),
        wall_curves = curves.len(),
        "Computing wall distance field"
    );

    let mut field = DistanceField {
        surfaces: Vec::with_capacity(work.len()),
    };

    for (position, &index) in work.iter().enumerate() {
        let surface = &surfaces[index];
        let patch = index + 1;

        let (knots_xi, knots_eta) = surface.knots();
        validate_surface_knots(knots_xi, &format!("xi direction of patch {patch}"))?;
        validate_surface_knots(knots_eta, &format!("eta direction of patch {patch}"))?;

        let grid = SurfaceGrid::evaluate(surface);
        info!(
            patch,
            surface = position + 1,
            of = work.len(),
            grid_points = grid.points().len(),
            "Working on surface"
        );

        let (matrices, stats) = sweep_surface(solver.as_mut(), &grid, &curves);
        let minimum = minimum_distance(&matrices)?;

        if !stats.all_converged() {
            info!(
                patch,
                unconverged = stats.unconverged,
                projections = stats.projections,
                "Surface finished with unconverged projections"
            );
        }

        field.surfaces.push(SurfaceDistanceField {
            patch,
            shape: minimum.shape(),
            values: minimum.into_values(),
            stats,
        });
    }

    Ok(field)
}

/// Distance-field coefficients using the named root-finding policy and
/// default parameters.
///
/// `policy` is one of `"quad+newton"`, `"quad"` or `"newton"`.
///
/// # Errors
///
/// Returns [`WallDistanceError::UnsupportedPolicy`] for any other policy
/// name, plus everything [`compute_distance_field`] can return.
pub fn distance_field<S: Surface>(
    surfaces: &[S],
    wall: &WallSpec,
    patches: &[usize],
    policy: &str,
) -> WallDistanceResult<Vec<Vec<f64>>> {
    let policy: RootFindingPolicy = policy.parse()?;
    let params = WallDistanceParams::default().with_policy(policy);
    compute_distance_field(surfaces, wall, patches, &params).map(DistanceField::into_coefficients)
}
