//! Knot-relative convergence tolerance.
//!
//! A root-find converges when its estimate moves by less than a fixed fraction
//! of the knot interval it currently sits in, so coarse and fine regions of a
//! curve are resolved to the same relative precision.

/// Default relative tolerance.
pub const RELATIVE_TOLERANCE: f64 = 1e-10;

/// Index of the knot closest to `s`.
///
/// Ties resolve to the lower index. Returns 0 for an empty sequence.
#[must_use]
pub fn nearest_knot(knots: &[f64], s: f64) -> usize {
    let mut best = 0;
    let mut best_gap = f64::INFINITY;
    for (i, &k) in knots.iter().enumerate() {
        let gap = (k - s).abs();
        if gap < best_gap {
            best = i;
            best_gap = gap;
        }
    }
    best
}

/// Absolute tolerance for an estimate `s`.
///
/// Scales `relative` by the length of the knot interval holding `s`: the
/// interval right of the nearest knot when `s` lies at or past it, the one to
/// its left otherwise. The first and last knots fall back to their only
/// neighbouring interval. A zero-length interval gives a zero tolerance.
#[must_use]
pub fn adaptive_tolerance(knots: &[f64], s: f64, relative: f64) -> f64 {
    let n = knots.len();
    if n < 2 {
        return 0.0;
    }
    let idx = nearest_knot(knots, s);
    let (lo, hi) = if knots[idx] <= s {
        if idx == n - 1 {
            (idx - 1, idx)
        } else {
            (idx, idx + 1)
        }
    } else if idx == 0 {
        (0, 1)
    } else {
        (idx - 1, idx)
    };
    (knots[hi] - knots[lo]).abs() * relative
}
