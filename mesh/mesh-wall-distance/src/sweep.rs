//! Grid sweep: project every grid point of a surface onto each wall curve.

use crate::field::{DistanceMatrix, SweepStatistics};
use crate::solver::{ProjectionSolver, WarmStart, WarmStartScope};
use nalgebra::Point2;
use patch_types::{Curve, Surface};
use tracing::debug;

/// Surface points at every `(xi, eta)` knot pair, evaluated once.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    n_xi: usize,
    n_eta: usize,
    points: Vec<Point2<f64>>,
}

impl SurfaceGrid {
    /// Evaluate `surface` on the cross product of its knot sequences.
    pub fn evaluate<S: Surface + ?Sized>(surface: &S) -> Self {
        let (knots_xi, knots_eta) = surface.knots();
        let mut points = Vec::with_capacity(knots_xi.len() * knots_eta.len());
        for &eta in knots_eta {
            for &xi in knots_xi {
                points.push(surface.evaluate(xi, eta));
            }
        }
        Self {
            n_xi: knots_xi.len(),
            n_eta: knots_eta.len(),
            points,
        }
    }

    /// Grid shape `(n_xi, n_eta)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_xi, self.n_eta)
    }

    /// Grid points in xi-fastest order.
    #[must_use]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Point at xi index `i`, eta index `j`.
    #[must_use]
    pub fn point(&self, i: usize, j: usize) -> Option<&Point2<f64>> {
        if i < self.n_xi && j < self.n_eta {
            self.points.get(j * self.n_xi + i)
        } else {
            None
        }
    }
}

/// Distances from every grid point to one curve.
///
/// Visits xi rows in order and eta samples within each row, threading the
/// solver's warm start along the way. The warm start is reset per curve, and
/// additionally per xi row for [`WarmStartScope::Row`] solvers.
pub fn sweep_curve(
    solver: &mut dyn ProjectionSolver,
    grid: &SurfaceGrid,
    curve: &dyn Curve,
    stats: &mut SweepStatistics,
) -> DistanceMatrix {
    let (n_xi, n_eta) = grid.shape();
    let mut matrix = DistanceMatrix::new(n_xi, n_eta);
    let mut warm = WarmStart::new();
    let scope = solver.warm_start_scope();

    for i in 0..n_xi {
        if scope == WarmStartScope::Row {
            warm.reset();
        }
        for j in 0..n_eta {
            if let Some(point) = grid.point(i, j) {
                let projection = solver.project(curve, point, &mut warm);
                matrix.set(i, j, projection.distance);
                stats.record(&projection);
            }
        }
    }
    matrix
}

/// One distance matrix per wall curve, in curve order, plus the combined
/// statistics.
pub fn sweep_surface<C: Curve>(
    solver: &mut dyn ProjectionSolver,
    grid: &SurfaceGrid,
    curves: &[C],
) -> (Vec<DistanceMatrix>, SweepStatistics) {
    let mut stats = SweepStatistics::default();
    let mut matrices = Vec::with_capacity(curves.len());

    for (index, curve) in curves.iter().enumerate() {
        let mut curve_stats = SweepStatistics::default();
        let matrix = sweep_curve(solver, grid, curve, &mut curve_stats);
        debug!(
            curve = index + 1,
            projections = curve_stats.projections,
            unconverged = curve_stats.unconverged,
            mean_iterations = curve_stats.mean_iterations(),
            "Swept wall curve"
        );
        stats.merge(&curve_stats);
        matrices.push(matrix);
    }
    (matrices, stats)
}
