//! Finite-difference Newton step on the squared-distance objective.

use crate::objective::squared_distance;
use nalgebra::Point2;
use patch_types::Curve;

/// Default half-width of the central-difference stencil.
pub const NEWTON_WIDTH: f64 = 1e-4;

/// Second differences within this many epsilons of the centre value are noise.
const CURVATURE_NOISE: f64 = 64.0;

/// Growth of the stencil half-width between attempts of [`adaptive_newton_step`].
pub const STENCIL_WIDENING: f64 = 10.0;

/// Widened attempts made after the initial stencil is rejected.
pub const MAX_WIDENINGS: usize = 3;

/// Widest stencil tried, as a fraction of the curve domain.
const MAX_WIDTH_FRACTION: f64 = 0.25;

/// One Newton update of `s` towards a stationary point of the squared
/// distance, clamped to the curve domain.
///
/// Derivatives come from a central difference with half-width `width`:
///
/// ```text
/// D'  = (D(s + w) - D(s - w)) / 2w
/// D'' = (D(s + w) - 2 D(s) + D(s - w)) / w^2
/// ```
///
/// Returns `None` when `D''` is not finite or is indistinguishable from
/// round-off at this width, or when the update is not finite. A flat
/// objective (a point at the centre of an arc, a curve collapsed to a point)
/// and a point far from a short curve both end up here.
pub fn newton_step<C: Curve + ?Sized>(
    curve: &C,
    point: &Point2<f64>,
    s: f64,
    width: f64,
) -> Option<f64> {
    let d1 = squared_distance(curve, point, s - width);
    let d2 = squared_distance(curve, point, s);
    let d3 = squared_distance(curve, point, s + width);

    let w2 = width * width;
    let first = (d3 - d1) / (2.0 * width);
    let second = (d3 - 2.0 * d2 + d1) / w2;

    let noise = CURVATURE_NOISE * f64::EPSILON * d2.abs() / w2;
    if !second.is_finite() || second.abs() <= noise {
        return None;
    }

    let next = s - first / second;
    next.is_finite().then(|| curve.clamp_parameter(next))
}

/// [`newton_step`], retried with a stencil [`STENCIL_WIDENING`] times wider
/// up to [`MAX_WIDENINGS`] times while the curvature is lost in round-off.
///
/// The stencil never grows past a quarter of the curve domain. `None` means
/// every width was rejected.
pub fn adaptive_newton_step<C: Curve + ?Sized>(
    curve: &C,
    point: &Point2<f64>,
    s: f64,
    width: f64,
) -> Option<f64> {
    let (lo, hi) = curve.domain();
    let widest = MAX_WIDTH_FRACTION * (hi - lo);

    let mut width = width;
    for attempt in 0..=MAX_WIDENINGS {
        if attempt > 0 && width > widest {
            break;
        }
        if let Some(next) = newton_step(curve, point, s, width) {
            return Some(next);
        }
        width *= STENCIL_WIDENING;
    }
    None
}
