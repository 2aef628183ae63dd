//! Root-finding policy selection.

use crate::error::WallDistanceError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Strategy used to project a grid point onto a wall curve.
///
/// Parses from and displays as the names `"quad+newton"`, `"quad"` and
/// `"newton"`.
///
/// # Example
///
/// ```
/// use mesh_wall_distance::RootFindingPolicy;
///
/// let policy: RootFindingPolicy = "quad".parse().unwrap();
/// assert_eq!(policy, RootFindingPolicy::Quad);
/// assert_eq!(policy.to_string(), "quad");
///
/// assert!("secant".parse::<RootFindingPolicy>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RootFindingPolicy {
    /// Quadratic bracket refinement followed by a Newton step, repeated until
    /// successive Newton outputs agree.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "quad+newton"))]
    QuadNewton,

    /// Quadratic bracket refinement only, warm-started along each xi row.
    #[cfg_attr(feature = "serde", serde(rename = "quad"))]
    Quad,

    /// Newton iteration from the previous converged parameter, with random
    /// knot restarts on stalls.
    #[cfg_attr(feature = "serde", serde(rename = "newton"))]
    Newton,
}

impl RootFindingPolicy {
    /// All policies.
    pub const ALL: [Self; 3] = [Self::QuadNewton, Self::Quad, Self::Newton];

    /// The policy's configuration name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::QuadNewton => "quad+newton",
            Self::Quad => "quad",
            Self::Newton => "newton",
        }
    }

    /// Whether the policy takes finite-difference Newton steps.
    #[must_use]
    pub const fn uses_newton(self) -> bool {
        matches!(self, Self::QuadNewton | Self::Newton)
    }
}

impl fmt::Display for RootFindingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RootFindingPolicy {
    type Err = WallDistanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| WallDistanceError::UnsupportedPolicy(s.to_string()))
    }
}
