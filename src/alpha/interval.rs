//! Critical α values of a simplex and the classification they induce.
//!
//! Every finite simplex σ of a Delaunay triangulation enters the alpha complex
//! at some α and never leaves it again. [`AlphaInterval`] records the three
//! thresholds that matter:
//!
//! ```text
//!   α <  member         EXTERIOR   (not in the complex)
//!   member ≤ α < regular    SINGULAR   (in the complex, no incident coface is)
//!   regular ≤ α < interior  REGULAR    (on the boundary of the solid)
//!   interior ≤ α            INTERIOR   (inside the solid)
//! ```
//!
//! where `member` is the singular threshold if σ can be singular at all and
//! the regular threshold otherwise. The thresholds are ordered, so the
//! classification is monotone in α. Simplices on the convex hull have an
//! infinite `interior` threshold and stay REGULAR even at `α = +∞`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a simplex at a given α.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SimplexClassification {
    /// Not part of the alpha complex.
    EXTERIOR,
    /// In the complex, but no incident higher-dimensional simplex is.
    SINGULAR,
    /// On the boundary of the alpha solid.
    REGULAR,
    /// Strictly inside the alpha solid.
    INTERIOR,
}

impl fmt::Display for SimplexClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EXTERIOR => write!(f, "EXTERIOR"),
            Self::SINGULAR => write!(f, "SINGULAR"),
            Self::REGULAR => write!(f, "REGULAR"),
            Self::INTERIOR => write!(f, "INTERIOR"),
        }
    }
}

/// The critical α values of one simplex, in radius units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaInterval {
    /// α from which the simplex is singular, if it ever is.
    pub singular: Option<f64>,
    /// α from which the simplex is regular (or interior).
    pub regular: f64,
    /// α from which the simplex is interior. `+∞` means never (convex hull simplices).
    pub interior: f64,
}

impl AlphaInterval {
    /// Builds an interval, clamping so `singular ≤ regular ≤ interior`.
    #[must_use]
    pub fn new(singular: Option<f64>, regular: f64, interior: f64) -> Self {
        let interior = interior.max(regular);
        Self {
            singular: singular.map(|s| s.min(regular)),
            regular,
            interior,
        }
    }

    /// Interval of a tetrahedron with circumradius `radius`.
    #[must_use]
    pub fn cell(radius: f64) -> Self {
        Self::new(None, radius, radius)
    }

    /// The α at which the simplex first belongs to the complex.
    #[must_use]
    #[inline]
    pub fn member(&self) -> f64 {
        self.singular.unwrap_or(self.regular)
    }

    /// Classifies the simplex at `alpha`.
    #[must_use]
    pub fn classify(&self, alpha: f64) -> SimplexClassification {
        if alpha < self.member() {
            SimplexClassification::EXTERIOR
        } else if alpha < self.regular {
            SimplexClassification::SINGULAR
        } else if alpha < self.interior || self.interior.is_infinite() {
            SimplexClassification::REGULAR
        } else {
            SimplexClassification::INTERIOR
        }
    }

    /// Returns `true` if the simplex belongs to the complex at `alpha`.
    #[must_use]
    #[inline]
    pub fn is_member(&self, alpha: f64) -> bool {
        alpha >= self.member()
    }
}
