//! Wall specification and work-surface selection.
//!
//! Patches and edges are numbered from 1, matching the kernel's
//! [`Surface::edge`] numbering.

use crate::error::{WallDistanceError, WallDistanceResult};
use patch_types::{Curve, GeometryError, Surface};
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Boundary edges that make up the wall, grouped by patch.
///
/// Iteration is ordered by patch, then edge.
///
/// # Example
///
/// ```
/// use mesh_wall_distance::WallSpec;
///
/// let wall = WallSpec::new().with_edges(1, [1, 3]).with_edge(2, 1);
///
/// assert_eq!(wall.edge_count(), 3);
/// assert_eq!(wall.iter().collect::<Vec<_>>(), vec![(1, 1), (1, 3), (2, 1)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WallSpec {
    edges: BTreeMap<usize, BTreeSet<usize>>,
}

impl WallSpec {
    /// An empty wall.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one edge of `patch`.
    #[must_use]
    pub fn with_edge(mut self, patch: usize, edge: usize) -> Self {
        self.insert(patch, edge);
        self
    }

    /// Add several edges of `patch`.
    #[must_use]
    pub fn with_edges(mut self, patch: usize, edges: impl IntoIterator<Item = usize>) -> Self {
        for edge in edges {
            self.insert(patch, edge);
        }
        self
    }

    /// Add one edge of `patch`. Returns `false` if it was already present.
    pub fn insert(&mut self, patch: usize, edge: usize) -> bool {
        self.edges.entry(patch).or_default().insert(edge)
    }

    /// Check if no edges are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.values().all(BTreeSet::is_empty)
    }

    /// Number of listed edges over all patches.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Patches that contribute at least one edge.
    pub fn patches(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(|(_, edges)| !edges.is_empty())
            .map(|(&patch, _)| patch)
    }

    /// `(patch, edge)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .flat_map(|(&patch, edges)| edges.iter().map(move |&edge| (patch, edge)))
    }
}

impl FromIterator<(usize, usize)> for WallSpec {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut wall = Self::new();
        for (patch, edge) in iter {
            wall.insert(patch, edge);
        }
        wall
    }
}

/// Look up the wall curves named by `wall`, in patch-then-edge order.
///
/// # Errors
///
/// Returns an error if the wall is empty, a patch number is out of range, or
/// an edge does not exist on its patch.
pub fn resolve_wall_curves<S: Surface>(
    surfaces: &[S],
    wall: &WallSpec,
) -> WallDistanceResult<Vec<Box<dyn Curve>>> {
    if wall.is_empty() {
        return Err(WallDistanceError::EmptyWall);
    }

    let mut curves = Vec::with_capacity(wall.edge_count());
    for (patch, edge) in wall.iter() {
        let surface = patch_surface(surfaces, patch)?;
        let curve = surface.edge(edge).map_err(|err| match err {
            GeometryError::EdgeOutOfRange { edge, count } => {
                WallDistanceError::EdgeOutOfRange { patch, edge, count }
            }
            other => WallDistanceError::Geometry(other),
        })?;
        validate_curve_knots(curve.knots(), &format!("wall edge {edge} of patch {patch}"))?;
        curves.push(curve);
    }
    Ok(curves)
}

/// 0-based indices of the surfaces to process.
///
/// An empty `patches` list selects every surface. Otherwise the 1-based
/// patch numbers are converted in the order given.
///
/// # Errors
///
/// Returns [`WallDistanceError::PatchOutOfRange`] for patch 0 or a number past
/// `count`.
pub fn resolve_work_surfaces(count: usize, patches: &[usize]) -> WallDistanceResult<Vec<usize>> {
    if patches.is_empty() {
        return Ok((0..count).collect());
    }
    patches
        .iter()
        .map(|&patch| {
            if patch == 0 || patch > count {
                Err(WallDistanceError::PatchOutOfRange { patch, count })
            } else {
                Ok(patch - 1)
            }
        })
        .collect()
}

fn patch_surface<S: Surface>(surfaces: &[S], patch: usize) -> WallDistanceResult<&S> {
    patch
        .checked_sub(1)
        .and_then(|index| surfaces.get(index))
        .ok_or(WallDistanceError::PatchOutOfRange {
            patch,
            count: surfaces.len(),
        })
}

/// Check a wall curve's knots: at least two, finite, non-decreasing.
///
/// Coincident knots are accepted; the solvers terminate on zero-length spans.
pub(crate) fn validate_curve_knots(knots: &[f64], context: &str) -> WallDistanceResult<()> {
    if knots.len() < 2 {
        return Err(WallDistanceError::invalid_knots(
            context,
            format!("need at least 2 knots, got {}", knots.len()),
        ));
    }
    validate_ordered(knots, context)
}

/// Check one surface knot direction: non-empty, finite, non-decreasing.
pub(crate) fn validate_surface_knots(knots: &[f64], context: &str) -> WallDistanceResult<()> {
    if knots.is_empty() {
        return Err(WallDistanceError::invalid_knots(context, "no knots"));
    }
    validate_ordered(knots, context)
}

fn validate_ordered(knots: &[f64], context: &str) -> WallDistanceResult<()> {
    if let Some(bad) = knots.iter().find(|k| !k.is_finite()) {
        return Err(WallDistanceError::invalid_knots(
            context,
            format!("non-finite knot {bad}"),
        ));
    }
    if let Some(i) = (1..knots.len()).find(|&i| knots[i] < knots[i - 1]) {
        return Err(WallDistanceError::invalid_knots(
            context,
            format!("knots decrease at index {i} ({} < {})", knots[i], knots[i - 1]),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};
    use patch_types::BSplineSurface;

    fn two_patches() -> Vec<BSplineSurface> {
        vec![
            BSplineSurface::rectangle(Point2::origin(), Vector2::new(1.0, 1.0), (2, 2)).unwrap(),
            BSplineSurface::rectangle(Point2::new(1.0, 0.0), Vector2::new(1.0, 1.0), (2, 2))
                .unwrap(),
        ]
    }

    #[test]
    fn test_wall_spec_building() {
        let wall: WallSpec = [(2, 3), (1, 1), (2, 3)].into_iter().collect();
        assert_eq!(wall.edge_count(), 2);
        assert_eq!(wall.patches().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(wall.iter().collect::<Vec<_>>(), vec![(1, 1), (2, 3)]);

        let mut wall = WallSpec::new();
        assert!(wall.is_empty());
        assert!(wall.insert(1, 4));
        assert!(!wall.insert(1, 4));
        assert!(!wall.is_empty());
    }

    #[test]
    fn test_resolve_wall_curves() {
        let surfaces = two_patches();
        let wall = WallSpec::new().with_edge(2, 2).with_edge(1, 1);
        let curves = resolve_wall_curves(&surfaces, &wall).unwrap();

        assert_eq!(curves.len(), 2);
        // Patch 1 edge 1 first: the bottom of [0, 1] x [0, 1]
        let start = curves[0].evaluate(curves[0].domain().0);
        assert!(start.x.abs() < 1e-12 && start.y.abs() < 1e-12);
        // Patch 2 edge 2: x = 2
        let mid = curves[1].evaluate(0.5);
        assert!((mid.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_wall_errors() {
        let surfaces = two_patches();

        assert!(matches!(
            resolve_wall_curves(&surfaces, &WallSpec::new()),
            Err(WallDistanceError::EmptyWall)
        ));
        assert!(matches!(
            resolve_wall_curves(&surfaces, &WallSpec::new().with_edge(3, 1)),
            Err(WallDistanceError::PatchOutOfRange { patch: 3, count: 2 })
        ));
        assert!(matches!(
            resolve_wall_curves(&surfaces, &WallSpec::new().with_edge(0, 1)),
            Err(WallDistanceError::PatchOutOfRange { patch: 0, .. })
        ));
        assert!(matches!(
            resolve_wall_curves(&surfaces, &WallSpec::new().with_edge(1, 5)),
            Err(WallDistanceError::EdgeOutOfRange {
                patch: 1,
                edge: 5,
                count: 4
            })
        ));
    }

    #[test]
    fn test_resolve_work_surfaces() {
        assert_eq!(resolve_work_surfaces(3, &[]).unwrap(), vec![0, 1, 2]);
        assert_eq!(resolve_work_surfaces(3, &[3, 1]).unwrap(), vec![2, 0]);
        assert!(matches!(
            resolve_work_surfaces(3, &[1, 4]),
            Err(WallDistanceError::PatchOutOfRange { patch: 4, count: 3 })
        ));
        assert!(resolve_work_surfaces(3, &[0]).is_err());
    }

    #[test]
    fn test_knot_validation() {
        assert!(validate_curve_knots(&[0.0, 1.0], "c").is_ok());
        assert!(validate_curve_knots(&[0.5, 0.5], "c").is_ok());
        assert!(validate_curve_knots(&[0.0], "c").is_err());
        assert!(validate_curve_knots(&[0.0, f64::NAN], "c").is_err());
        assert!(validate_curve_knots(&[1.0, 0.0], "c").is_err());

        assert!(validate_surface_knots(&[0.0], "xi").is_ok());
        assert!(validate_surface_knots(&[], "xi").is_err());
    }
}
