//! Quadratic (parabolic) minimization and the four-slot candidate bracket.

use crate::objective::squared_distance;
use crate::tolerance::nearest_knot;
use nalgebra::Point2;
use patch_types::Curve;

/// Denominator magnitude at or below which the parabola fit is treated as
/// degenerate.
pub const DEGENERATE_DENOMINATOR: f64 = 1e-20;

/// One parabolic-interpolation step.
///
/// Fits a parabola through `(s_i, D_i)` for the three samples, with
/// `D_i = squared_distance(s_i)^2`, and returns its vertex clamped to the
/// curve domain. A degenerate fit (coincident samples or flat objective)
/// falls back to the mean of the samples.
pub fn quadratic_min_step<C: Curve + ?Sized>(
    curve: &C,
    point: &Point2<f64>,
    samples: [f64; 3],
) -> f64 {
    let [s1, s2, s3] = samples;

    let y12 = s1 * s1 - s2 * s2;
    let y23 = s2 * s2 - s3 * s3;
    let y31 = s3 * s3 - s1 * s1;
    let d12 = s1 - s2;
    let d23 = s2 - s3;
    let d31 = s3 - s1;

    let quartic = |s: f64| {
        let f = squared_distance(curve, point, s);
        f * f
    };
    let f1 = quartic(s1);
    let f2 = quartic(s2);
    let f3 = quartic(s3);

    let denominator = d23 * f1 + d31 * f2 + d12 * f3;
    let vertex = if denominator.abs() > DEGENERATE_DENOMINATOR {
        0.5 * (y23 * f1 + y31 * f2 + y12 * f3) / denominator
    } else {
        (s1 + s2 + s3) / 3.0
    };

    curve.clamp_parameter(vertex)
}

/// Three retained parameter samples plus one slot for a new proposal.
///
/// After every [`update`](Self::update) the slots are sorted ascending and the
/// last slot holds `+inf`, so [`samples`](Self::samples) always returns the
/// three best candidates seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    slots: [f64; 4],
}

impl Bracket {
    /// Bracket from three samples with an open fourth slot.
    #[must_use]
    pub fn new(s0: f64, s1: f64, s2: f64) -> Self {
        Self {
            slots: [s0, s1, s2, f64::INFINITY],
        }
    }

    /// Seed at the knots found 10%, 50% and 90% of the way through the knot
    /// sequence (by index).
    #[must_use]
    pub fn from_knot_fractions(knots: &[f64]) -> Self {
        let last = knots.len().saturating_sub(1);
        let pick = |fraction: f64| {
            let idx = ((knots.len() as f64 * fraction) as usize).min(last);
            knots.get(idx).copied().unwrap_or(0.0)
        };
        Self::new(pick(0.1), pick(0.5), pick(0.9))
    }

    /// Seed on the knot interval next to the knot nearest `s`: the interval
    /// starting there, or the final interval at the last knot. The middle
    /// sample is the interval midpoint.
    #[must_use]
    pub fn around_knot(knots: &[f64], s: f64) -> Self {
        let n = knots.len();
        if n < 2 {
            let k = knots.first().copied().unwrap_or(s);
            return Self::new(k, k, k);
        }
        let idx = nearest_knot(knots, s);
        let (lo, hi) = if idx == n - 1 {
            (knots[idx - 1], knots[idx])
        } else {
            (knots[idx], knots[idx + 1])
        };
        Self::new(lo, 0.5 * (lo + hi), hi)
    }

    /// The three retained samples.
    #[must_use]
    pub fn samples(&self) -> [f64; 3] {
        [self.slots[0], self.slots[1], self.slots[2]]
    }

    /// All four slots.
    #[must_use]
    pub fn slots(&self) -> &[f64; 4] {
        &self.slots
    }

    /// Smallest retained parameter.
    #[must_use]
    pub fn lowest(&self) -> f64 {
        self.slots[0]
    }

    /// Place a new candidate in the open slot.
    pub fn propose(&mut self, candidate: f64) {
        self.slots[3] = candidate;
    }

    /// Drop the worst of the four slots and re-sort.
    ///
    /// The slot with the largest objective (first one on ties) becomes
    /// `+inf`; non-finite slots count as infinitely bad.
    pub fn update<C: Curve + ?Sized>(&mut self, curve: &C, point: &Point2<f64>) {
        let mut worst = 0;
        let mut worst_value = f64::NEG_INFINITY;
        for (i, &s) in self.slots.iter().enumerate() {
            let value = rank_value(curve, point, s);
            if value > worst_value {
                worst = i;
                worst_value = value;
            }
        }

        self.slots[worst] = f64::INFINITY;
        self.slots.sort_by(f64::total_cmp);
    }

    /// Scale every finite slot by `factor`, clamped to the curve domain.
    pub fn scale<C: Curve + ?Sized>(&mut self, factor: f64, curve: &C) {
        for s in &mut self.slots {
            if s.is_finite() {
                *s = curve.clamp_parameter(*s * factor);
            }
        }
    }

    /// Shift the samples down one rank by objective.
    ///
    /// The worst sample is discarded and the runner-up moves into its rank;
    /// the midpoint of the best sample and the runner-up fills the freed
    /// rank, contracting the bracket towards the best sample. The runner-up
    /// is the best sample at a different parameter. When all three samples
    /// coincide the bracket is re-seeded with [`around_knot`](Self::around_knot).
    pub fn shift_down<C: Curve + ?Sized>(&mut self, curve: &C, point: &Point2<f64>) {
        let mut ranked = self.samples().map(|s| (rank_value(curve, point, s), s));
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let best = ranked[0].1;
        match ranked[1..].iter().map(|&(_, s)| s).find(|&s| s != best) {
            Some(runner_up) => {
                self.slots = [best, 0.5 * (best + runner_up), runner_up, f64::INFINITY];
                self.slots.sort_by(f64::total_cmp);
            }
            None => *self = Self::around_knot(curve.knots(), best),
        }
    }
}

/// Objective used to rank bracket slots; non-finite slots rank last.
fn rank_value<C: Curve + ?Sized>(curve: &C, point: &Point2<f64>, s: f64) -> f64 {
    if !s.is_finite() {
        return f64::INFINITY;
    }
    let value = squared_distance(curve, point, s);
    if value.is_nan() { f64::INFINITY } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use patch_types::Polyline;

    fn x_axis() -> Polyline {
        Polyline::with_knots(
            vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)],
            vec![0.0, 10.0],
        )
        .unwrap()
    }

    #[test]
    fn test_quadratic_step_symmetric_samples() {
        let line = x_axis();
        // Symmetric samples about the foot point give the exact vertex
        let s = quadratic_min_step(&line, &Point2::new(4.0, 1.0), [3.0, 4.0, 5.0]);
        assert_relative_eq!(s, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_step_moves_toward_minimum() {
        let line = x_axis();
        let point = Point2::new(6.0, 0.5);
        let s = quadratic_min_step(&line, &point, [2.0, 5.0, 9.0]);
        assert!((s - 6.0).abs() < (5.0_f64 - 6.0).abs() + 1.0);
        assert!((0.0..=10.0).contains(&s));
    }

    #[test]
    fn test_quadratic_step_degenerate_uses_mean() {
        let line = x_axis();
        let s = quadratic_min_step(&line, &Point2::new(1.0, 1.0), [2.0, 2.0, 2.0]);
        assert_relative_eq!(s, 2.0);
    }

    #[test]
    fn test_quadratic_step_is_clamped() {
        let line = x_axis();
        let s = quadratic_min_step(&line, &Point2::new(-50.0, 0.0), [1.0, 2.0, 4.0]);
        assert!(s >= 0.0);
        let s = quadratic_min_step(&line, &Point2::new(50.0, 0.0), [6.0, 8.0, 9.0]);
        assert!(s <= 10.0);
    }

    #[test]
    fn test_from_knot_fractions() {
        let knots: Vec<f64> = (0..=10).map(f64::from).collect();
        let bracket = Bracket::from_knot_fractions(&knots);
        // 11 knots: indices 1, 5, 9
        assert_eq!(bracket.samples(), [1.0, 5.0, 9.0]);
        assert!(bracket.slots()[3].is_infinite());

        let short = Bracket::from_knot_fractions(&[0.0, 1.0]);
        // 2 knots: indices 0, 1, 1
        assert_eq!(short.samples(), [0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_around_knot() {
        let knots = [0.0, 1.0, 2.0, 4.0];
        assert_eq!(Bracket::around_knot(&knots, 1.2).samples(), [1.0, 1.5, 2.0]);
        assert_eq!(Bracket::around_knot(&knots, 0.9).samples(), [1.0, 1.5, 2.0]);
        assert_eq!(Bracket::around_knot(&knots, 3.9).samples(), [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_update_discards_worst() {
        let line = x_axis();
        let point = Point2::new(5.0, 0.0);
        let mut bracket = Bracket::new(1.0, 4.0, 9.5);
        bracket.propose(6.0);
        bracket.update(&line, &point);

        // 9.5 is furthest from x = 5
        assert_eq!(bracket.samples(), [1.0, 4.0, 6.0]);
        assert!(bracket.slots()[3].is_infinite());
        assert_relative_eq!(bracket.lowest(), 1.0);
    }

    #[test]
    fn test_update_ties_drop_first() {
        let line = x_axis();
        let point = Point2::new(5.0, 0.0);
        let mut bracket = Bracket::new(3.0, 7.0, 5.0);
        bracket.propose(4.0);
        bracket.update(&line, &point);
        assert_eq!(bracket.samples(), [4.0, 5.0, 7.0]);
    }

    #[test]
    fn test_update_treats_non_finite_as_worst() {
        let line = x_axis();
        let point = Point2::new(5.0, 0.0);
        let mut bracket = Bracket::new(f64::INFINITY, 4.0, 6.0);
        bracket.propose(5.0);
        bracket.update(&line, &point);
        assert_eq!(bracket.samples(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_scale_clamps_to_domain() {
        let line = x_axis();
        let mut bracket = Bracket::new(2.0, 4.0, 8.0);
        bracket.scale(0.9, &line);
        assert_relative_eq!(bracket.samples()[2], 7.2, epsilon = 1e-12);
        assert!(bracket.slots()[3].is_infinite());

        let mut bracket = Bracket::new(2.0, 9.0, 10.0);
        bracket.scale(1.5, &line);
        assert_eq!(bracket.samples(), [3.0, 10.0, 10.0]);
    }

    #[test]
    fn test_shift_contracts_towards_best() {
        let line = x_axis();
        let point = Point2::new(1.2, 0.5);
        let mut bracket = Bracket::new(1.0, 2.0, 3.0);
        bracket.shift_down(&line, &point);
        // 3.0 is discarded, the midpoint of 1.0 and 2.0 takes its rank
        assert_eq!(bracket.samples(), [1.0, 1.5, 2.0]);
        assert!(bracket.slots()[3].is_infinite());

        // Best sample on the high side is kept
        let point = Point2::new(2.9, 0.5);
        let mut bracket = Bracket::new(1.0, 2.0, 3.0);
        bracket.shift_down(&line, &point);
        assert_eq!(bracket.samples(), [2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_shift_skips_repeated_best() {
        let line = x_axis();
        let point = Point2::new(9.0, 0.0);
        let mut bracket = Bracket::new(6.0, 10.0, 10.0);
        bracket.shift_down(&line, &point);
        assert_eq!(bracket.samples(), [6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_shift_reseeds_collapsed_bracket() {
        let line = x_axis();
        let mut bracket = Bracket::new(4.0, 4.0, 4.0);
        bracket.shift_down(&line, &Point2::new(7.0, 1.0));
        assert_eq!(bracket.samples(), [0.0, 5.0, 10.0]);
    }
}
