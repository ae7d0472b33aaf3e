//! Transform options.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curve::{Axis, Limit};
use crate::error::{LoopscanError, Result};

/// Which side of a threshold selects the saturation subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl FromStr for Polarity {
    type Err = LoopscanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Polarity::Plus),
            "-" => Ok(Polarity::Minus),
            other => Err(LoopscanError::Config(format!(
                "polarity must be '+' or '-', not '{other}'"
            ))),
        }
    }
}

/// The option set a pipeline entry carries for its transform.
///
/// Every transform takes the full struct and reads only the fields it
/// recognizes; unrecognized fields are ignored. The pipeline injects the
/// resolved target identifier into `target` before each call, so a transform
/// that wants to know which curve it is processing reads it from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Multiplicative factor for x (`scale`).
    pub xsc: f64,
    /// Multiplicative factor for y (`scale`).
    pub ysc: f64,
    /// Additive offset for x (`translate`).
    pub xtrans: f64,
    /// Additive offset for y (`translate`).
    pub ytrans: f64,
    /// Axis an axis-parameterized transform acts on.
    pub axis: Axis,
    /// Window width for the median filters; neighborhood half-width
    /// elsewhere.
    pub ks: usize,
    /// Field threshold for `flatten_saturation`.
    pub threshold: f64,
    /// Which side of `threshold` holds the saturation region.
    pub polarity: Polarity,
    /// Absolute-field threshold for `saturation_normalize` and
    /// `threshold_crop`.
    pub thresh: f64,
    /// Number of extremal points averaged by the normalizers.
    pub n_avg: usize,
    /// Target x window for `normalize`; `None` leaves the axis unchanged.
    pub xlim: Option<Limit>,
    /// Target y window for `normalize`.
    pub ylim: Option<Limit>,
    /// Per-invocation increment for `vertical_offset`.
    pub dy: f64,
    /// Resolved target identifier, injected by the pipeline at apply time.
    #[serde(skip)]
    pub target: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            xsc: 1.0,
            ysc: 1.0,
            xtrans: 0.0,
            ytrans: 0.0,
            axis: Axis::Y,
            ks: 3,
            threshold: 0.0,
            polarity: Polarity::Plus,
            thresh: 1.0,
            n_avg: 1,
            xlim: None,
            ylim: None,
            dy: 0.1,
            target: None,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_xsc(mut self, xsc: f64) -> Self {
        self.xsc = xsc;
        self
    }

    pub fn with_ysc(mut self, ysc: f64) -> Self {
        self.ysc = ysc;
        self
    }

    pub fn with_xtrans(mut self, xtrans: f64) -> Self {
        self.xtrans = xtrans;
        self
    }

    pub fn with_ytrans(mut self, ytrans: f64) -> Self {
        self.ytrans = ytrans;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_ks(mut self, ks: usize) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_thresh(mut self, thresh: f64) -> Self {
        self.thresh = thresh;
        self
    }

    pub fn with_n_avg(mut self, n_avg: usize) -> Self {
        self.n_avg = n_avg;
        self
    }

    pub fn with_xlim(mut self, xlim: Limit) -> Self {
        self.xlim = Some(xlim);
        self
    }

    pub fn with_ylim(mut self, ylim: Limit) -> Self {
        self.ylim = Some(ylim);
        self
    }

    pub fn with_dy(mut self, dy: f64) -> Self {
        self.dy = dy;
        self
    }
}
