//! Closest-point root-finding drivers.
//!
//! Each [`RootFindingPolicy`] maps to one [`ProjectionSolver`]. A solver
//! projects a single grid point onto a single wall curve; any state carried
//! from one grid point to the next lives in an explicit [`WarmStart`] that the
//! sweep resets according to the solver's [`WarmStartScope`].
//!
//! All three drivers iterate until two successive estimates agree within the
//! knot-relative tolerance of [`adaptive_tolerance`]. The tolerance is zero
//! only on a zero-length knot span, where an unchanged estimate counts as
//! converged. A Newton step rejected at every stencil width moves nothing and
//! proves nothing: it counts towards the stall limit and never as
//! convergence. Stalls trigger the policy's recovery heuristic; the optional
//! iteration ceiling stops the search and returns the best candidate seen.

use crate::newton::adaptive_newton_step;
use crate::objective::{point_distance, squared_distance};
use crate::params::WallDistanceParams;
use crate::policy::RootFindingPolicy;
use crate::quadratic::{Bracket, quadratic_min_step};
use crate::tolerance::adaptive_tolerance;
use crate::WallDistanceResult;
use nalgebra::Point2;
use patch_types::Curve;
use rand::prelude::*;
use std::fmt;
use tracing::{trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Factor applied to the convergence reference when the hybrid driver stalls.
const STALL_ESTIMATE_FACTOR: f64 = 1.1;

/// Factor applied to the quadratic bracket when the hybrid driver stalls.
const STALL_BRACKET_FACTOR: f64 = 0.9;

/// Outcome of projecting one point onto one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Projection {
    /// Curve parameter of the foot point.
    pub parameter: f64,
    /// Distance from the point to the foot point.
    pub distance: f64,
    /// Iterations taken.
    pub iterations: usize,
    /// Whether the tolerance was met. `false` means the iteration ceiling
    /// stopped the search and `parameter` is the best candidate seen.
    pub converged: bool,
    /// Stall recoveries (perturbations, shifts or restarts) applied.
    pub perturbations: usize,
}

impl Projection {
    /// The foot point on `curve`.
    #[must_use]
    pub fn foot_point<C: Curve + ?Sized>(&self, curve: &C) -> Point2<f64> {
        curve.evaluate(self.parameter)
    }
}

/// How far a solver's warm start carries along the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmStartScope {
    /// Carried across every grid point of one curve.
    Curve,
    /// Reset at the start of every xi row.
    Row,
}

/// Parameter carried from one root-find to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WarmStart {
    /// Result of the previous root-find, if any.
    pub previous: Option<f64>,
}

impl WarmStart {
    /// An empty warm start.
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Forget the carried parameter.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// A closest-point strategy.
pub trait ProjectionSolver {
    /// The policy this solver implements.
    fn policy(&self) -> RootFindingPolicy;

    /// When the sweep must reset the warm start.
    fn warm_start_scope(&self) -> WarmStartScope;

    /// Project `point` onto `curve`, reading and updating `warm`.
    fn project(
        &mut self,
        curve: &dyn Curve,
        point: &Point2<f64>,
        warm: &mut WarmStart,
    ) -> Projection;
}

/// Build the solver selected by `params.policy`.
///
/// # Errors
///
/// Returns [`WallDistanceError::InvalidParams`](crate::WallDistanceError::InvalidParams)
/// if the parameters fail validation.
pub fn build_solver(params: &WallDistanceParams) -> WallDistanceResult<Box<dyn ProjectionSolver>> {
    params.validate()?;
    Ok(match params.policy {
        RootFindingPolicy::QuadNewton => Box::new(QuadNewtonSolver::new(params)),
        RootFindingPolicy::Quad => Box::new(QuadSolver::new(params)),
        RootFindingPolicy::Newton => Box::new(NewtonSolver::new(params)),
    })
}

/// Convergence test and iteration ceiling shared by all drivers.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Convergence {
    relative_tolerance: f64,
    max_iterations: Option<usize>,
}

impl Convergence {
    fn from_params(params: &WallDistanceParams) -> Self {
        Self {
            relative_tolerance: params.relative_tolerance,
            max_iterations: params.max_iterations,
        }
    }

    fn reached(&self, knots: &[f64], estimate: f64, change: f64) -> bool {
        let tolerance = adaptive_tolerance(knots, estimate, self.relative_tolerance);
        change < tolerance || (tolerance == 0.0 && change == 0.0)
    }

    /// True when the knot span around `estimate` has zero length, so there is
    /// nothing left to search.
    fn settled(&self, knots: &[f64], estimate: f64) -> bool {
        adaptive_tolerance(knots, estimate, self.relative_tolerance) == 0.0
    }

    fn exhausted(&self, iterations: usize) -> bool {
        self.max_iterations.is_some_and(|max| iterations >= max)
    }
}

/// Lowest-objective parameter seen during one root-find.
#[derive(Debug, Clone, Copy)]
struct BestCandidate {
    parameter: f64,
    objective: f64,
}

impl BestCandidate {
    fn new(seed: f64) -> Self {
        Self {
            parameter: seed,
            objective: f64::INFINITY,
        }
    }

    fn offer(&mut self, curve: &dyn Curve, point: &Point2<f64>, s: f64) {
        let objective = squared_distance(curve, point, s);
        if objective < self.objective {
            self.parameter = s;
            self.objective = objective;
        }
    }
}

/// Bookkeeping for one root-find.
#[derive(Debug, Clone, Copy, Default)]
struct Progress {
    iterations: usize,
    perturbations: usize,
}

impl Progress {
    fn converged(self, curve: &dyn Curve, point: &Point2<f64>, parameter: f64) -> Projection {
        Projection {
            parameter,
            distance: point_distance(curve, point, parameter),
            iterations: self.iterations,
            converged: true,
            perturbations: self.perturbations,
        }
    }

    fn stopped(
        self,
        policy: RootFindingPolicy,
        curve: &dyn Curve,
        point: &Point2<f64>,
        best: BestCandidate,
    ) -> Projection {
        warn!(
            policy = %policy,
            iterations = self.iterations,
            perturbations = self.perturbations,
            x = point.x,
            y = point.y,
            "Iteration ceiling reached without convergence, using best candidate"
        );
        Projection {
            parameter: best.parameter,
            distance: point_distance(curve, point, best.parameter),
            iterations: self.iterations,
            converged: false,
            perturbations: self.perturbations,
        }
    }
}

/// Quadratic bracket refinement followed by a Newton step.
///
/// Each iteration runs `quadratic_rounds` of {parabola step, bracket update}
/// from a bracket seeded at the 10/50/90% knots, then takes one Newton step
/// from the lowest bracket sample. Convergence compares successive Newton
/// outputs; the previous grid point's result is the first reference. A
/// rejected Newton step falls back to the lowest bracket sample without
/// testing convergence. On a stall the reference is scaled by 1.1 and the
/// bracket by 0.9.
#[derive(Debug, Clone)]
pub struct QuadNewtonSolver {
    convergence: Convergence,
    newton_width: f64,
    quadratic_rounds: usize,
    stall_limit: usize,
}

impl QuadNewtonSolver {
    /// Create a hybrid solver from `params`.
    #[must_use]
    pub fn new(params: &WallDistanceParams) -> Self {
        Self {
            convergence: Convergence::from_params(params),
            newton_width: params.newton_width,
            quadratic_rounds: params.quadratic_rounds,
            stall_limit: params.quad_stall_limit,
        }
    }
}

impl ProjectionSolver for QuadNewtonSolver {
    fn policy(&self) -> RootFindingPolicy {
        RootFindingPolicy::QuadNewton
    }

    fn warm_start_scope(&self) -> WarmStartScope {
        WarmStartScope::Curve
    }

    fn project(
        &mut self,
        curve: &dyn Curve,
        point: &Point2<f64>,
        warm: &mut WarmStart,
    ) -> Projection {
        let knots = curve.knots();
        let mut bracket = Bracket::from_knot_fractions(knots);
        let mut reference = warm.previous.unwrap_or(f64::INFINITY);
        let mut best = BestCandidate::new(bracket.lowest());
        let mut progress = Progress::default();
        let mut stall = 0;

        loop {
            for _ in 0..self.quadratic_rounds {
                let candidate = quadratic_min_step(curve, point, bracket.samples());
                bracket.propose(candidate);
                bracket.update(curve, point);
            }

            let step = adaptive_newton_step(curve, point, bracket.lowest(), self.newton_width);
            progress.iterations += 1;
            let estimate = step.unwrap_or_else(|| bracket.lowest());
            best.offer(curve, point, estimate);

            let converged = if step.is_some() {
                let change = (estimate - reference).abs();
                reference = estimate;
                self.convergence.reached(knots, estimate, change)
            } else {
                self.convergence.settled(knots, estimate)
            };

            if converged {
                warm.previous = Some(estimate);
                return progress.converged(curve, point, estimate);
            }
            if self.convergence.exhausted(progress.iterations) {
                warm.previous = Some(best.parameter);
                return progress.stopped(self.policy(), curve, point, best);
            }

            if stall > self.stall_limit {
                reference = curve.clamp_parameter(reference * STALL_ESTIMATE_FACTOR);
                bracket.scale(STALL_BRACKET_FACTOR, curve);
                stall = 0;
                progress.perturbations += 1;
                trace!(
                    iterations = progress.iterations,
                    reference,
                    "Perturbing stalled quadratic bracket"
                );
            }
            stall += 1;
        }
    }
}

/// Quadratic bracket refinement only.
///
/// Convergence compares successive parabola vertices and reports the
/// lowest-objective vertex seen, since a vertex the bracket rejects repeats
/// unchanged. The first point of every xi row seeds the bracket at the
/// 10/50/90% knots; later points seed it on the knot interval nearest the
/// previous result. On a stall the bracket samples shift down one rank by
/// objective.
#[derive(Debug, Clone)]
pub struct QuadSolver {
    convergence: Convergence,
    stall_limit: usize,
}

impl QuadSolver {
    /// Create a quadratic-only solver from `params`.
    #[must_use]
    pub fn new(params: &WallDistanceParams) -> Self {
        Self {
            convergence: Convergence::from_params(params),
            stall_limit: params.quad_stall_limit,
        }
    }
}

impl ProjectionSolver for QuadSolver {
    fn policy(&self) -> RootFindingPolicy {
        RootFindingPolicy::Quad
    }

    fn warm_start_scope(&self) -> WarmStartScope {
        WarmStartScope::Row
    }

    fn project(
        &mut self,
        curve: &dyn Curve,
        point: &Point2<f64>,
        warm: &mut WarmStart,
    ) -> Projection {
        let knots = curve.knots();
        let mut bracket = match warm.previous {
            Some(previous) => Bracket::around_knot(knots, previous),
            None => Bracket::from_knot_fractions(knots),
        };
        let mut reference = f64::INFINITY;
        let mut best = BestCandidate::new(bracket.lowest());
        let mut progress = Progress::default();
        let mut stall = 1;

        loop {
            let candidate = quadratic_min_step(curve, point, bracket.samples());
            bracket.propose(candidate);
            progress.iterations += 1;
            best.offer(curve, point, candidate);

            let change = (candidate - reference).abs();
            reference = candidate;

            if self.convergence.reached(knots, candidate, change) {
                warm.previous = Some(best.parameter);
                return progress.converged(curve, point, best.parameter);
            }
            if self.convergence.exhausted(progress.iterations) {
                warm.previous = Some(best.parameter);
                return progress.stopped(self.policy(), curve, point, best);
            }

            bracket.update(curve, point);
            stall += 1;
            if stall > self.stall_limit {
                bracket.shift_down(curve, point);
                stall = 0;
                progress.perturbations += 1;
                trace!(
                    iterations = progress.iterations,
                    "Shifting stalled quadratic bracket"
                );
            }
        }
    }
}

/// Newton iteration from a running seed.
///
/// The seed is the previous result along the curve's sweep, or the first
/// knot for a fresh curve. Convergence compares successive Newton outputs; a
/// rejected step keeps the estimate and only advances the stall count. On a
/// stall the iteration restarts from a uniformly drawn knot.
pub struct NewtonSolver {
    convergence: Convergence,
    newton_width: f64,
    stall_limit: usize,
    rng: Box<dyn RngCore>,
}

impl NewtonSolver {
    /// Create a Newton solver from `params`, seeding the restart generator
    /// from `params.seed` when given.
    #[must_use]
    pub fn new(params: &WallDistanceParams) -> Self {
        let rng: Box<dyn RngCore> = if let Some(seed) = params.seed {
            Box::new(rand::rngs::StdRng::seed_from_u64(seed))
        } else {
            Box::new(rand::thread_rng())
        };
        Self {
            convergence: Convergence::from_params(params),
            newton_width: params.newton_width,
            stall_limit: params.newton_stall_limit,
            rng,
        }
    }

    fn random_knot(&mut self, knots: &[f64]) -> Option<f64> {
        if knots.is_empty() {
            return None;
        }
        knots.get(self.rng.gen_range(0..knots.len())).copied()
    }
}

impl fmt::Debug for NewtonSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewtonSolver")
            .field("convergence", &self.convergence)
            .field("newton_width", &self.newton_width)
            .field("stall_limit", &self.stall_limit)
            .finish_non_exhaustive()
    }
}

impl ProjectionSolver for NewtonSolver {
    fn policy(&self) -> RootFindingPolicy {
        RootFindingPolicy::Newton
    }

    fn warm_start_scope(&self) -> WarmStartScope {
        WarmStartScope::Curve
    }

    fn project(
        &mut self,
        curve: &dyn Curve,
        point: &Point2<f64>,
        warm: &mut WarmStart,
    ) -> Projection {
        let knots = curve.knots();
        let mut estimate = warm.previous.unwrap_or_else(|| curve.domain().0);
        let mut best = BestCandidate::new(estimate);
        let mut progress = Progress::default();
        let mut stall = 0;

        loop {
            let step = adaptive_newton_step(curve, point, estimate, self.newton_width);
            progress.iterations += 1;

            let converged = match step {
                Some(next) => {
                    let change = (next - estimate).abs();
                    estimate = next;
                    self.convergence.reached(knots, estimate, change)
                }
                None => self.convergence.settled(knots, estimate),
            };
            best.offer(curve, point, estimate);

            if converged {
                warm.previous = Some(estimate);
                return progress.converged(curve, point, estimate);
            }
            if self.convergence.exhausted(progress.iterations) {
                warm.previous = Some(best.parameter);
                return progress.stopped(self.policy(), curve, point, best);
            }

            if stall > self.stall_limit {
                if let Some(restart) = self.random_knot(knots) {
                    estimate = restart;
                }
                stall = 0;
                progress.perturbations += 1;
                trace!(
                    iterations = progress.iterations,
                    restart = estimate,
                    "Restarting stalled Newton iteration from random knot"
                );
            }
            stall += 1;
        }
    }
}
