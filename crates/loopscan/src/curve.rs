//! Curve data model: paired (field, signal) sequences and axis selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoopscanError, Result};

/// One hysteresis-loop measurement: equal-length x (field) and y (signal)
/// sequences. Transforms mutate a curve in place; the equal-length invariant
/// holds at every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Curve {
    /// Create a curve from paired sequences, rejecting a length mismatch.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(LoopscanError::ShapeMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Field values.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Signal values.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Mutable access to both sequences. A transform that grows or shrinks
    /// one side without the other breaks the pairing invariant; the next
    /// transform will reject the curve via [`Curve::ensure_paired`].
    pub fn parts_mut(&mut self) -> (&mut Vec<f64>, &mut Vec<f64>) {
        (&mut self.x, &mut self.y)
    }

    /// Replace both sequences, re-checking the pairing invariant.
    pub fn replace(&mut self, x: Vec<f64>, y: Vec<f64>) -> Result<()> {
        if x.len() != y.len() {
            return Err(LoopscanError::ShapeMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        self.x = x;
        self.y = y;
        Ok(())
    }

    /// Verify the pairing invariant.
    pub fn ensure_paired(&self) -> Result<()> {
        if self.x.len() != self.y.len() {
            return Err(LoopscanError::ShapeMismatch {
                x_len: self.x.len(),
                y_len: self.y.len(),
            });
        }
        Ok(())
    }

    /// Consume the curve, yielding its sequences.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}

/// Which of the two data axes an axis-parameterized transform acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl FromStr for Axis {
    type Err = LoopscanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            other => Err(LoopscanError::InvalidAxis(other.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// A target window for the `normalize` transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub lo: f64,
    pub hi: f64,
}

impl Limit {
    /// Window `(-v, v)`.
    pub fn symmetric(v: f64) -> Self {
        Self { lo: -v, hi: v }
    }

    /// Midpoint of the window.
    pub fn center(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    /// Width of the window.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}
