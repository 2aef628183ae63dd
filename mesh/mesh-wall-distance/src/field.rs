//! Distance matrices, per-surface fields and sweep statistics.

// Grid sizes and iteration counts don't overflow f64 mantissas in practice
#![allow(clippy::cast_precision_loss)]

use crate::solver::Projection;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distances from every grid point of one surface to one wall curve.
///
/// Stored xi-fastest: entry `(i, j)` lives at index `j * n_xi + i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceMatrix {
    n_xi: usize,
    n_eta: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// A matrix of `n_xi x n_eta` zeros.
    #[must_use]
    pub fn new(n_xi: usize, n_eta: usize) -> Self {
        Self {
            n_xi,
            n_eta,
            values: vec![0.0; n_xi * n_eta],
        }
    }

    /// Wrap xi-fastest values, or `None` if the length doesn't match.
    #[must_use]
    pub fn from_values(n_xi: usize, n_eta: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == n_xi * n_eta).then_some(Self {
            n_xi,
            n_eta,
            values,
        })
    }

    /// Grid shape `(n_xi, n_eta)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_xi, self.n_eta)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the matrix has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entry at xi index `i`, eta index `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.n_xi && j < self.n_eta {
            Some(self.values[j * self.n_xi + i])
        } else {
            None
        }
    }

    /// Set the entry at xi index `i`, eta index `j`. Out-of-range indices are
    /// ignored.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if i < self.n_xi && j < self.n_eta {
            self.values[j * self.n_xi + i] = value;
        }
    }

    /// Values in xi-fastest order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Consume into xi-fastest values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Root-finding statistics for a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SweepStatistics {
    /// Root-finds performed (grid points x wall curves).
    pub projections: usize,
    /// Root-finds stopped by the iteration ceiling.
    pub unconverged: usize,
    /// Iterations over all root-finds.
    pub total_iterations: usize,
    /// Stall recoveries over all root-finds.
    pub perturbations: usize,
    /// Most iterations taken by one root-find.
    pub max_iterations: usize,
}

impl SweepStatistics {
    /// Fold one root-find into the statistics.
    pub fn record(&mut self, projection: &Projection) {
        self.projections += 1;
        if !projection.converged {
            self.unconverged += 1;
        }
        self.total_iterations += projection.iterations;
        self.perturbations += projection.perturbations;
        self.max_iterations = self.max_iterations.max(projection.iterations);
    }

    /// Combine with statistics from another sweep.
    pub fn merge(&mut self, other: &Self) {
        self.projections += other.projections;
        self.unconverged += other.unconverged;
        self.total_iterations += other.total_iterations;
        self.perturbations += other.perturbations;
        self.max_iterations = self.max_iterations.max(other.max_iterations);
    }

    /// Mean iterations per root-find.
    #[must_use]
    pub fn mean_iterations(&self) -> f64 {
        if self.projections == 0 {
            0.0
        } else {
            self.total_iterations as f64 / self.projections as f64
        }
    }

    /// Check if every root-find met its tolerance.
    #[must_use]
    pub fn all_converged(&self) -> bool {
        self.unconverged == 0
    }
}

/// Minimum wall distance at every grid point of one surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceDistanceField {
    /// 1-based patch number of the surface.
    pub patch: usize,
    /// Grid shape `(n_xi, n_eta)`.
    pub shape: (usize, usize),
    /// Distances in xi-fastest order.
    pub values: Vec<f64>,
    /// Root-finding statistics over all wall curves.
    pub stats: SweepStatistics,
}

impl SurfaceDistanceField {
    /// Distance at xi index `i`, eta index `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let (n_xi, n_eta) = self.shape;
        if i < n_xi && j < n_eta {
            self.values.get(j * n_xi + i).copied()
        } else {
            None
        }
    }

    /// Smallest distance on the surface.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest distance on the surface.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

/// Wall distance fields for every processed surface, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceField {
    /// One field per processed surface.
    pub surfaces: Vec<SurfaceDistanceField>,
}

impl DistanceField {
    /// Number of processed surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Check if no surfaces were processed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Iterate over the per-surface fields.
    pub fn iter(&self) -> impl Iterator<Item = &SurfaceDistanceField> {
        self.surfaces.iter()
    }

    /// Statistics summed over every surface.
    #[must_use]
    pub fn statistics(&self) -> SweepStatistics {
        let mut total = SweepStatistics::default();
        for surface in &self.surfaces {
            total.merge(&surface.stats);
        }
        total
    }

    /// Plain coefficient lists, one per processed surface.
    #[must_use]
    pub fn into_coefficients(self) -> Vec<Vec<f64>> {
        self.surfaces.into_iter().map(|s| s.values).collect()
    }
}
