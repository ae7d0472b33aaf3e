//! A central value with an optional one-sigma uncertainty.

use serde::{Deserialize, Serialize};

/// An extracted parameter: a central value bracketed by an optional
/// symmetric one-sigma uncertainty.
///
/// `sigma == None` marks a point estimate, the degraded result an extractor
/// returns when no uncertainty could be derived. It is distinguishable from
/// a zero uncertainty: `Estimate::new(h, Some(0.0))` is an exact bracket,
/// `Estimate::point(h)` is an estimate without one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    central: f64,
    sigma: Option<f64>,
}

impl Estimate {
    /// An estimate with a known uncertainty.
    pub fn new(central: f64, sigma: f64) -> Self {
        Self {
            central,
            sigma: Some(sigma),
        }
    }

    /// A bare point estimate, no uncertainty available.
    pub fn point(central: f64) -> Self {
        Self {
            central,
            sigma: None,
        }
    }

    pub fn central(&self) -> f64 {
        self.central
    }

    pub fn sigma(&self) -> Option<f64> {
        self.sigma
    }

    /// Lower edge of the one-sigma bracket; the central value for a point
    /// estimate.
    pub fn lower(&self) -> f64 {
        self.central - self.sigma.unwrap_or(0.0)
    }

    /// Upper edge of the one-sigma bracket.
    pub fn upper(&self) -> f64 {
        self.central + self.sigma.unwrap_or(0.0)
    }

    /// The ordered triple `[lower, central, upper]`.
    pub fn values(&self) -> [f64; 3] {
        [self.lower(), self.central, self.upper()]
    }

    pub fn is_point_estimate(&self) -> bool {
        self.sigma.is_none()
    }
}
