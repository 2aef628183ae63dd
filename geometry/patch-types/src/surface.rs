//! Tensor-product B-spline surface patches.
//!
//! A patch maps `(xi, eta)` to a point in the plane. Its boundary is made of
//! four B-spline edges, which is where wall curves come from.

use crate::bspline::{basis_functions, clamped_knot_vector, find_span, validate_knot_vector};
use crate::traits::distinct_knots;
use crate::{BSpline, Curve, GeometryError, Result, Surface};
use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Edge numbers of a [`BSplineSurface`], in [`Surface::edges`] order.
///
/// Edges run along increasing xi (edges 1 and 3) or increasing eta
/// (edges 2 and 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PatchEdge {
    /// `eta = eta_min`.
    EtaMin = 1,
    /// `xi = xi_max`.
    XiMax = 2,
    /// `eta = eta_max`.
    EtaMax = 3,
    /// `xi = xi_min`.
    XiMin = 4,
}

impl PatchEdge {
    /// All edges in numbering order.
    pub const ALL: [Self; 4] = [Self::EtaMin, Self::XiMax, Self::EtaMax, Self::XiMin];

    /// The 1-based edge number.
    #[must_use]
    pub const fn number(self) -> usize {
        self as usize
    }
}

/// A planar tensor-product B-spline patch.
///
/// Control points are stored xi-fastest: point `(i, j)` lives at index
/// `j * n_xi + i`.
///
/// # Example
///
/// ```
/// use patch_types::{BSplineSurface, Surface};
/// use nalgebra::{Point2, Vector2};
///
/// // A 4 x 2 rectangle with 3 x 3 cells
/// let patch = BSplineSurface::rectangle(Point2::origin(), Vector2::new(4.0, 2.0), (3, 3)).unwrap();
///
/// let (xi, eta) = patch.knots();
/// assert_eq!(xi.len(), 4);
/// assert_eq!(eta.len(), 4);
///
/// let corner = patch.evaluate(1.0, 1.0);
/// assert!((corner.x - 4.0).abs() < 1e-12);
/// assert!((corner.y - 2.0).abs() < 1e-12);
/// assert_eq!(patch.edges().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BSplineSurface {
    /// Control net, xi-fastest.
    control_points: Vec<Point2<f64>>,
    /// Control points along xi.
    n_xi: usize,
    /// Control points along eta.
    n_eta: usize,
    /// Full knot vector along xi.
    knot_vector_xi: Vec<f64>,
    /// Full knot vector along eta.
    knot_vector_eta: Vec<f64>,
    /// Degree along xi.
    degree_xi: usize,
    /// Degree along eta.
    degree_eta: usize,
    /// Distinct domain knots along xi.
    breakpoints_xi: Vec<f64>,
    /// Distinct domain knots along eta.
    breakpoints_eta: Vec<f64>,
}

impl BSplineSurface {
    /// Create a surface from a control net and knot vectors.
    ///
    /// # Parameters
    ///
    /// - `control_points`: `n_xi * n_eta` points, xi-fastest
    /// - `(n_xi, n_eta)`: control net dimensions
    /// - `(knot_vector_xi, knot_vector_eta)`: full knot vectors
    /// - `(degree_xi, degree_eta)`: polynomial degrees
    ///
    /// # Errors
    ///
    /// Returns error if the control net size does not match the dimensions or
    /// either knot vector is invalid for its direction.
    pub fn new(
        control_points: Vec<Point2<f64>>,
        (n_xi, n_eta): (usize, usize),
        (knot_vector_xi, knot_vector_eta): (Vec<f64>, Vec<f64>),
        (degree_xi, degree_eta): (usize, usize),
    ) -> Result<Self> {
        if control_points.len() != n_xi * n_eta {
            return Err(GeometryError::GridSizeMismatch {
                n_xi,
                n_eta,
                actual: control_points.len(),
            });
        }
        validate_knot_vector(n_xi, degree_xi, &knot_vector_xi)?;
        validate_knot_vector(n_eta, degree_eta, &knot_vector_eta)?;

        let breakpoints_xi = distinct_knots(&knot_vector_xi[degree_xi..=n_xi]);
        let breakpoints_eta = distinct_knots(&knot_vector_eta[degree_eta..=n_eta]);

        Ok(Self {
            control_points,
            n_xi,
            n_eta,
            knot_vector_xi,
            knot_vector_eta,
            degree_xi,
            degree_eta,
            breakpoints_xi,
            breakpoints_eta,
        })
    }

    /// Create a clamped surface on `[0, 1]^2` with uniform interior knots.
    ///
    /// # Errors
    ///
    /// Returns error if the control net is too small for the degrees.
    pub fn clamped(
        control_points: Vec<Point2<f64>>,
        (n_xi, n_eta): (usize, usize),
        (degree_xi, degree_eta): (usize, usize),
    ) -> Result<Self> {
        let knots_xi = clamped_knot_vector(n_xi, degree_xi)?;
        let knots_eta = clamped_knot_vector(n_eta, degree_eta)?;
        Self::new(
            control_points,
            (n_xi, n_eta),
            (knots_xi, knots_eta),
            (degree_xi, degree_eta),
        )
    }

    /// An axis-aligned bilinear rectangle split into `cells_xi x cells_eta`
    /// knot intervals.
    ///
    /// Edge 1 lies along `origin.y`, edge 3 along `origin.y + size.y`.
    /// A zero extent is allowed and yields a collapsed strip.
    ///
    /// # Errors
    ///
    /// Returns error if either cell count is zero.
    pub fn rectangle(
        origin: Point2<f64>,
        size: Vector2<f64>,
        (cells_xi, cells_eta): (usize, usize),
    ) -> Result<Self> {
        if cells_xi == 0 || cells_eta == 0 {
            return Err(GeometryError::insufficient_points(
                2,
                cells_xi.min(cells_eta) + 1,
            ));
        }
        let (n_xi, n_eta) = (cells_xi + 1, cells_eta + 1);

        let mut control_points = Vec::with_capacity(n_xi * n_eta);
        for j in 0..n_eta {
            let v = j as f64 / cells_eta as f64;
            for i in 0..n_xi {
                let u = i as f64 / cells_xi as f64;
                control_points.push(origin + Vector2::new(size.x * u, size.y * v));
            }
        }

        Self::clamped(control_points, (n_xi, n_eta), (1, 1))
    }

    /// Control net dimensions `(n_xi, n_eta)`.
    #[must_use]
    pub fn control_net_size(&self) -> (usize, usize) {
        (self.n_xi, self.n_eta)
    }

    /// Degrees `(degree_xi, degree_eta)`.
    #[must_use]
    pub fn degrees(&self) -> (usize, usize) {
        (self.degree_xi, self.degree_eta)
    }

    /// Get the control net.
    #[must_use]
    pub fn control_points(&self) -> &[Point2<f64>] {
        &self.control_points
    }

    fn control_point(&self, i: usize, j: usize) -> Point2<f64> {
        self.control_points[j * self.n_xi + i]
    }

    /// Extract the boundary curve for `edge`.
    ///
    /// The edge's control points are the net rows (or columns) blended with
    /// the basis functions at the fixed boundary parameter, so the edge is
    /// exact for clamped and unclamped knot vectors alike.
    #[must_use]
    pub fn boundary(&self, edge: PatchEdge) -> BSpline {
        let (xi_lo, xi_hi) = (
            self.knot_vector_xi[self.degree_xi],
            self.knot_vector_xi[self.n_xi],
        );
        let (eta_lo, eta_hi) = (
            self.knot_vector_eta[self.degree_eta],
            self.knot_vector_eta[self.n_eta],
        );

        match edge {
            PatchEdge::EtaMin | PatchEdge::EtaMax => {
                let eta = if edge == PatchEdge::EtaMin { eta_lo } else { eta_hi };
                let span = find_span(&self.knot_vector_eta, self.n_eta, self.degree_eta, eta);
                let basis = basis_functions(&self.knot_vector_eta, self.degree_eta, span, eta);
                let points = (0..self.n_xi)
                    .map(|i| {
                        let mut acc = Vector2::zeros();
                        for (k, b) in basis.iter().enumerate() {
                            acc += self.control_point(i, span - self.degree_eta + k).coords * *b;
                        }
                        Point2::from(acc)
                    })
                    .collect();
                BSpline::from_validated(points, self.knot_vector_xi.clone(), self.degree_xi)
            }
            PatchEdge::XiMin | PatchEdge::XiMax => {
                let xi = if edge == PatchEdge::XiMin { xi_lo } else { xi_hi };
                let span = find_span(&self.knot_vector_xi, self.n_xi, self.degree_xi, xi);
                let basis = basis_functions(&self.knot_vector_xi, self.degree_xi, span, xi);
                let points = (0..self.n_eta)
                    .map(|j| {
                        let mut acc = Vector2::zeros();
                        for (k, b) in basis.iter().enumerate() {
                            acc += self.control_point(span - self.degree_xi + k, j).coords * *b;
                        }
                        Point2::from(acc)
                    })
                    .collect();
                BSpline::from_validated(points, self.knot_vector_eta.clone(), self.degree_eta)
            }
        }
    }
}

impl Surface for BSplineSurface {
    fn evaluate(&self, xi: f64, eta: f64) -> Point2<f64> {
        let span_xi = find_span(&self.knot_vector_xi, self.n_xi, self.degree_xi, xi);
        let span_eta = find_span(&self.knot_vector_eta, self.n_eta, self.degree_eta, eta);
        let basis_xi = basis_functions(&self.knot_vector_xi, self.degree_xi, span_xi, xi);
        let basis_eta = basis_functions(&self.knot_vector_eta, self.degree_eta, span_eta, eta);

        let mut point = Vector2::zeros();
        for (l, b_eta) in basis_eta.iter().enumerate() {
            let j = span_eta - self.degree_eta + l;
            for (k, b_xi) in basis_xi.iter().enumerate() {
                let i = span_xi - self.degree_xi + k;
                point += self.control_point(i, j).coords * (*b_xi * *b_eta);
            }
        }
        Point2::from(point)
    }

    fn knots(&self) -> (&[f64], &[f64]) {
        (&self.breakpoints_xi, &self.breakpoints_eta)
    }

    fn edges(&self) -> Vec<Box<dyn Curve>> {
        PatchEdge::ALL
            .iter()
            .map(|&edge| Box::new(self.boundary(edge)) as Box<dyn Curve>)
            .collect()
    }
}
