//! End-to-end wall distance scenarios.
//!
//! Run with: cargo test -p mesh-wall-distance --test scenarios

use approx::assert_relative_eq;
use mesh_wall_distance::{
    RootFindingPolicy, SweepStatistics, SurfaceGrid, WallDistanceError, WallDistanceParams,
    WallSpec, WarmStart, adaptive_tolerance, build_solver, compute_distance_field, distance_field,
    minimum_distance, sweep_curve, sweep_surface,
};
use nalgebra::{Point2, Vector2};
use patch_types::{Arc, BSplineSurface, Curve, PatchEdge, Polyline, Surface};
use std::f64::consts::PI;

// =============================================================================
// Fixtures
// =============================================================================

/// A curve collapsed onto a single point with a zero-length knot span.
struct CollapsedCurve {
    point: Point2<f64>,
    knots: [f64; 2],
}

impl Curve for CollapsedCurve {
    fn evaluate(&self, _s: f64) -> Point2<f64> {
        self.point
    }

    fn knots(&self) -> &[f64] {
        &self.knots
    }
}

fn params_for(policy: RootFindingPolicy) -> WallDistanceParams {
    WallDistanceParams::default().with_policy(policy).with_seed(17)
}

/// Patch 1: channel [0, 4] x [0, 1]. Patch 2: collapsed strip along y = 0.5.
fn channel_with_centre_line() -> Vec<BSplineSurface> {
    vec![
        BSplineSurface::rectangle(Point2::origin(), Vector2::new(4.0, 1.0), (4, 2)).unwrap(),
        BSplineSurface::rectangle(Point2::new(0.0, 0.5), Vector2::new(4.0, 0.0), (4, 1)).unwrap(),
    ]
}

// =============================================================================
// Single projections
// =============================================================================

#[test]
fn line_projection_matches_orthogonal_foot() {
    let line = Polyline::line(Point2::new(1.0, 1.0), Point2::new(5.0, 3.0), 6);
    let point: Point2<f64> = Point2::new(2.0, 4.0);

    // Foot of the perpendicular from `point` onto the infinite line
    let dir = Vector2::new(4.0, 2.0);
    let t = (point - Point2::new(1.0, 1.0)).dot(&dir) / dir.norm_squared();
    let foot = Point2::new(1.0, 1.0) + dir * t;
    let expected = (point - foot).norm();

    for policy in RootFindingPolicy::ALL {
        let mut solver = build_solver(&params_for(policy)).unwrap();
        let projection = solver.project(&line, &point, &mut WarmStart::new());

        assert_relative_eq!(projection.distance, expected, epsilon = 1e-9);
        assert_relative_eq!(projection.parameter, t, epsilon = 1e-6);
        assert_relative_eq!(projection.foot_point(&line), foot, epsilon = 1e-5);

        if policy.uses_newton() {
            let tol = adaptive_tolerance(line.knots(), t, 1e-10);
            assert!(projection.converged);
            assert!((projection.parameter - t).abs() <= 10.0 * tol.max(1e-12));
        }
    }
}

#[test]
fn arc_centre_distance_is_radius() {
    let arc = Arc::new(Point2::origin(), 1.0, 0.0, PI).unwrap();
    let centre = Point2::origin();

    for policy in RootFindingPolicy::ALL {
        let mut solver = build_solver(&params_for(policy).with_max_iterations(Some(2_000))).unwrap();
        let projection = solver.project(&arc, &centre, &mut WarmStart::new());

        assert_relative_eq!(projection.distance, 1.0, epsilon = 1e-6);
        assert!(projection.distance.is_finite());
    }
}

#[test]
fn endpoint_coincidence_returns_endpoint() {
    let line = Polyline::line(Point2::new(0.0, 0.0), Point2::new(3.0, 0.0), 3);
    let (lo, hi) = line.domain();

    for policy in RootFindingPolicy::ALL {
        let mut solver = build_solver(&params_for(policy)).unwrap();

        for (target, endpoint) in [(Point2::new(0.0, 0.0), lo), (Point2::new(3.0, 0.0), hi)] {
            let projection = solver.project(&line, &target, &mut WarmStart::new());
            let tol = adaptive_tolerance(line.knots(), endpoint, 1e-10);

            if policy.uses_newton() {
                assert!(
                    (projection.parameter - endpoint).abs() <= tol,
                    "{policy}: {projection:?}"
                );
            } else {
                assert!((projection.parameter - endpoint).abs() < 1e-6, "{policy}: {projection:?}");
            }
            assert!(projection.distance < 1e-6);
        }
    }
}

#[test]
fn degenerate_curve_terminates() {
    let curve = CollapsedCurve {
        point: Point2::new(1.0, 2.0),
        knots: [0.5, 0.5],
    };
    let point = Point2::new(4.0, 6.0);

    for policy in RootFindingPolicy::ALL {
        let mut solver = build_solver(&params_for(policy)).unwrap();
        let projection = solver.project(&curve, &point, &mut WarmStart::new());

        assert!(projection.converged, "{policy}: {projection:?}");
        assert_relative_eq!(projection.parameter, 0.5);
        assert_relative_eq!(projection.distance, 5.0, epsilon = 1e-12);
        assert!(projection.iterations <= 2);
    }
}

#[test]
fn seeded_newton_restarts_reach_minimum() {
    // Point inside the arc at radius 0.5 and angle 0.8. Starting from the
    // first knot, plain Newton bounces between the arc ends.
    let theta = 0.8;
    let arc = Arc::new(Point2::origin(), 1.0, theta - 1.2, theta + 1.2).unwrap();
    let point = Point2::new(0.5 * theta.cos(), 0.5 * theta.sin());

    let params = WallDistanceParams::newton().with_seed(42);
    let run = || {
        let mut solver = build_solver(&params).unwrap();
        solver.project(&arc, &point, &mut WarmStart::new())
    };

    let first = run();
    assert!(first.perturbations >= 1);
    assert!(first.converged);
    assert_relative_eq!(first.distance, 0.5, epsilon = 1e-9);
    assert_relative_eq!(first.parameter, theta, epsilon = 1e-8);

    // Same seed, same restarts
    assert_eq!(run(), first);

    let mut hybrid = build_solver(&WallDistanceParams::quad_newton()).unwrap();
    let reference = hybrid.project(&arc, &point, &mut WarmStart::new());
    assert_relative_eq!(first.distance, reference.distance, epsilon = 1e-9);
}

// =============================================================================
// Surfaces
// =============================================================================

#[test]
fn parallel_walls_give_half_spacing() {
    let surfaces = channel_with_centre_line();
    let wall = WallSpec::new().with_edges(1, [1, 3]);

    for policy in RootFindingPolicy::ALL {
        let field = compute_distance_field(&surfaces, &wall, &[2], &params_for(policy)).unwrap();

        assert_eq!(field.len(), 1);
        let strip = &field.surfaces[0];
        assert_eq!(strip.patch, 2);
        assert_eq!(strip.shape, (5, 2));
        for &d in &strip.values {
            assert_relative_eq!(d, 0.5, epsilon = 1e-9);
        }
    }
}

#[test]
fn distances_are_finite_and_non_negative() {
    let surfaces = channel_with_centre_line();
    let wall = WallSpec::new().with_edges(1, [1, 2, 3, 4]);

    for policy in RootFindingPolicy::ALL {
        let coefficients = distance_field(&surfaces, &wall, &[], policy.name()).unwrap();

        assert_eq!(coefficients.len(), 2);
        let (n_xi, n_eta) = (5, 3);
        assert_eq!(coefficients[0].len(), n_xi * n_eta);
        for d in coefficients.iter().flatten() {
            assert!(d.is_finite() && *d >= 0.0, "{policy}: {d}");
        }

        // Grid points on the wall itself
        assert!(coefficients[0][0] < 1e-9);
        // Centre of the channel: 0.5 from floor and ceiling
        assert_relative_eq!(coefficients[0][n_xi + 2], 0.5, epsilon = 1e-9);
    }
}

#[test]
fn cross_curve_minimum_is_exact() {
    // Patch 1 spans [-1, 3] x [-3, 0.5]; its top edge is closer than its
    // bottom edge to every point of patch 2.
    let surfaces = vec![
        BSplineSurface::rectangle(Point2::new(-1.0, -3.0), Vector2::new(4.0, 3.5), (4, 1))
            .unwrap(),
        BSplineSurface::rectangle(Point2::new(0.0, 1.0), Vector2::new(2.0, 1.0), (3, 2)).unwrap(),
    ];

    for policy in [RootFindingPolicy::QuadNewton, RootFindingPolicy::Quad] {
        let params = params_for(policy);
        let both = compute_distance_field(
            &surfaces,
            &WallSpec::new().with_edges(1, [1, 3]),
            &[2],
            &params,
        )
        .unwrap();
        let top_only =
            compute_distance_field(&surfaces, &WallSpec::new().with_edge(1, 3), &[2], &params)
                .unwrap();

        assert_eq!(both.surfaces[0].values, top_only.surfaces[0].values);

        // Same through the lower-level API
        let grid = SurfaceGrid::evaluate(&surfaces[1]);
        let curves = vec![
            surfaces[0].boundary(PatchEdge::EtaMax),
            surfaces[0].boundary(PatchEdge::EtaMin),
        ];
        let mut solver = build_solver(&params).unwrap();
        let (matrices, stats) = sweep_surface(solver.as_mut(), &grid, &curves);
        let minimum = minimum_distance(&matrices).unwrap();

        assert_eq!(minimum, matrices[0]);
        assert_eq!(stats.projections, 2 * grid.points().len());
    }
}

#[test]
fn repeated_runs_are_identical() {
    let surfaces = channel_with_centre_line();
    let wall = WallSpec::new().with_edges(1, [1, 4]);

    for policy in RootFindingPolicy::ALL {
        let params = params_for(policy);
        let first = compute_distance_field(&surfaces, &wall, &[], &params).unwrap();
        let second = compute_distance_field(&surfaces, &wall, &[], &params).unwrap();
        assert_eq!(first, second, "{policy}");
    }
}

#[test]
fn heterogeneous_surfaces_as_trait_objects() {
    let surfaces: Vec<Box<dyn Surface>> = channel_with_centre_line()
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn Surface>)
        .collect();
    let wall = WallSpec::new().with_edge(1, 1);

    let coefficients = distance_field(&surfaces, &wall, &[2, 1], "quad+newton").unwrap();
    assert_eq!(coefficients.len(), 2);
    assert_eq!(coefficients[0].len(), 10);
    assert_eq!(coefficients[1].len(), 15);
}

#[test]
fn sweep_resets_row_warm_start() {
    let grid = SurfaceGrid::evaluate(&channel_with_centre_line()[0]);
    let floor = Polyline::line(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), 4);

    let mut solver = build_solver(&WallDistanceParams::quad()).unwrap();
    let mut stats = SweepStatistics::default();
    let matrix = sweep_curve(solver.as_mut(), &grid, &floor, &mut stats);

    assert_eq!(stats.projections, 15);
    for i in 0..5 {
        assert_relative_eq!(matrix.get(i, 2).unwrap(), 1.0, epsilon = 1e-9);
    }
}

// =============================================================================
// Configuration errors
// =============================================================================

#[test]
fn configuration_errors_fail_fast() {
    let surfaces = channel_with_centre_line();
    let wall = WallSpec::new().with_edge(1, 1);

    let err = distance_field(&surfaces, &wall, &[], "golden-section").unwrap_err();
    assert!(matches!(err, WallDistanceError::UnsupportedPolicy(ref name) if name == "golden-section"));
    assert!(err.is_configuration_error());

    assert!(matches!(
        distance_field(&surfaces, &WallSpec::new(), &[], "quad"),
        Err(WallDistanceError::EmptyWall)
    ));
    assert!(matches!(
        distance_field(&surfaces, &wall, &[1, 5], "quad"),
        Err(WallDistanceError::PatchOutOfRange { patch: 5, count: 2 })
    ));
    assert!(matches!(
        distance_field(&surfaces, &WallSpec::new().with_edge(2, 9), &[], "newton"),
        Err(WallDistanceError::EdgeOutOfRange {
            patch: 2,
            edge: 9,
            count: 4
        })
    ));
    assert!(matches!(
        distance_field(&surfaces, &WallSpec::new().with_edge(4, 1), &[], "newton"),
        Err(WallDistanceError::PatchOutOfRange { patch: 4, .. })
    ));
}
