//! Wall-distance solver parameters.

use crate::error::{WallDistanceError, WallDistanceResult};
use crate::newton::NEWTON_WIDTH;
use crate::policy::RootFindingPolicy;
use crate::tolerance::RELATIVE_TOLERANCE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default iteration ceiling for one root-find.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Parameters for wall-distance computation.
///
/// # Example
///
/// ```
/// use mesh_wall_distance::{RootFindingPolicy, WallDistanceParams};
///
/// let params = WallDistanceParams::newton()
///     .with_seed(42)
///     .with_max_iterations(Some(500));
///
/// assert_eq!(params.policy, RootFindingPolicy::Newton);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WallDistanceParams {
    /// Root-finding strategy.
    pub policy: RootFindingPolicy,

    /// Convergence threshold relative to the local knot interval.
    pub relative_tolerance: f64,

    /// Finite-difference step of the Newton stencil.
    pub newton_width: f64,

    /// Quadratic refinements per hybrid iteration.
    pub quadratic_rounds: usize,

    /// Iterations without convergence before the quadratic bracket is
    /// perturbed (hybrid) or shifted down (quad-only).
    pub quad_stall_limit: usize,

    /// Iterations without convergence before Newton restarts from a random
    /// knot.
    pub newton_stall_limit: usize,

    /// Hard ceiling on iterations per root-find. `None` retries forever.
    pub max_iterations: Option<usize>,

    /// Seed for the Newton restart generator. `None` uses the thread RNG.
    pub seed: Option<u64>,
}

impl Default for WallDistanceParams {
    fn default() -> Self {
        Self {
            policy: RootFindingPolicy::QuadNewton,
            relative_tolerance: RELATIVE_TOLERANCE,
            newton_width: NEWTON_WIDTH,
            quadratic_rounds: 5,
            quad_stall_limit: 100,
            newton_stall_limit: 50,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            seed: None,
        }
    }
}

impl WallDistanceParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hybrid quadratic + Newton preset (the default).
    #[must_use]
    pub fn quad_newton() -> Self {
        Self::default()
    }

    /// Quadratic-only preset.
    #[must_use]
    pub fn quad() -> Self {
        Self {
            policy: RootFindingPolicy::Quad,
            ..Self::default()
        }
    }

    /// Newton-only preset.
    #[must_use]
    pub fn newton() -> Self {
        Self {
            policy: RootFindingPolicy::Newton,
            ..Self::default()
        }
    }

    /// Default settings without an iteration ceiling.
    ///
    /// Root-finds then rely on the stall heuristics alone and may not
    /// terminate on pathological geometry.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_iterations: None,
            ..Self::default()
        }
    }

    /// Set the root-finding policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RootFindingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the relative convergence tolerance.
    #[must_use]
    pub const fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = tolerance;
        self
    }

    /// Set the Newton finite-difference width.
    #[must_use]
    pub const fn with_newton_width(mut self, width: f64) -> Self {
        self.newton_width = width;
        self
    }

    /// Set the number of quadratic refinements per hybrid iteration.
    #[must_use]
    pub const fn with_quadratic_rounds(mut self, rounds: usize) -> Self {
        self.quadratic_rounds = rounds;
        self
    }

    /// Set the quadratic stall limit.
    #[must_use]
    pub const fn with_quad_stall_limit(mut self, limit: usize) -> Self {
        self.quad_stall_limit = limit;
        self
    }

    /// Set the Newton stall limit.
    #[must_use]
    pub const fn with_newton_stall_limit(mut self, limit: usize) -> Self {
        self.newton_stall_limit = limit;
        self
    }

    /// Set the iteration ceiling.
    #[must_use]
    pub const fn with_max_iterations(mut self, max: Option<usize>) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set a random seed for reproducible Newton restarts.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`WallDistanceError::InvalidParams`] if a tolerance or width is
    /// not positive and finite, or a count is zero.
    pub fn validate(&self) -> WallDistanceResult<()> {
        if !(self.relative_tolerance.is_finite() && self.relative_tolerance > 0.0) {
            return Err(WallDistanceError::invalid_params(format!(
                "relative tolerance must be positive and finite, got {}",
                self.relative_tolerance
            )));
        }
        if !(self.newton_width.is_finite() && self.newton_width > 0.0) {
            return Err(WallDistanceError::invalid_params(format!(
                "Newton width must be positive and finite, got {}",
                self.newton_width
            )));
        }
        if self.quadratic_rounds == 0 {
            return Err(WallDistanceError::invalid_params(
                "quadratic rounds must be >= 1",
            ));
        }
        if self.quad_stall_limit == 0 || self.newton_stall_limit == 0 {
            return Err(WallDistanceError::invalid_params("stall limits must be >= 1"));
        }
        if self.max_iterations == Some(0) {
            return Err(WallDistanceError::invalid_params(
                "iteration ceiling must be >= 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = WallDistanceParams::default();
        assert_eq!(params.policy, RootFindingPolicy::QuadNewton);
        assert!((params.relative_tolerance - 1e-10).abs() < 1e-20);
        assert!((params.newton_width - 1e-4).abs() < 1e-16);
        assert_eq!(params.quadratic_rounds, 5);
        assert_eq!(params.quad_stall_limit, 100);
        assert_eq!(params.newton_stall_limit, 50);
        assert_eq!(params.max_iterations, Some(DEFAULT_MAX_ITERATIONS));
        assert!(params.seed.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(WallDistanceParams::quad().policy, RootFindingPolicy::Quad);
        assert_eq!(WallDistanceParams::newton().policy, RootFindingPolicy::Newton);
        assert_eq!(
            WallDistanceParams::quad_newton(),
            WallDistanceParams::default()
        );
        assert!(WallDistanceParams::unbounded().max_iterations.is_none());
    }

    #[test]
    fn test_builder() {
        let params = WallDistanceParams::new()
            .with_policy(RootFindingPolicy::Quad)
            .with_quadratic_rounds(3)
            .with_quad_stall_limit(20)
            .with_newton_stall_limit(10)
            .with_seed(7);

        assert_eq!(params.policy, RootFindingPolicy::Quad);
        assert_eq!(params.quadratic_rounds, 3);
        assert_eq!(params.quad_stall_limit, 20);
        assert_eq!(params.newton_stall_limit, 10);
        assert_eq!(params.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            WallDistanceParams::new().with_relative_tolerance(0.0),
            WallDistanceParams::new().with_relative_tolerance(f64::NAN),
            WallDistanceParams::new().with_newton_width(-1e-4),
            WallDistanceParams::new().with_quadratic_rounds(0),
            WallDistanceParams::new().with_newton_stall_limit(0),
            WallDistanceParams::new().with_max_iterations(Some(0)),
        ];
        for params in &bad {
            assert!(
                matches!(params.validate(), Err(WallDistanceError::InvalidParams(_))),
                "{params:?} should be rejected"
            );
        }
    }
}
