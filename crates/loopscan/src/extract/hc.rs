//! Coercive field extraction.

use crate::curve::Curve;
use crate::error::{LoopscanError, Result};
use crate::numeric::{linear_fit, mean, nearest_index};

use super::estimate::Estimate;
use super::noise::{proj_sigma, sigma_y};

/// Options for [`hc_of`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HcOptions {
    /// Half-width of the crossing neighborhood averaged for the field value.
    pub ks: usize,
    /// The slope-fit window is `fit_ks_multiplier * ks` samples to each side
    /// of the crossing.
    pub fit_ks_multiplier: usize,
    /// Strict x interval of the saturated segment used for the noise
    /// estimate.
    pub fit_interval: (f64, f64),
}

impl Default for HcOptions {
    fn default() -> Self {
        Self {
            ks: 2,
            fit_ks_multiplier: 5,
            fit_interval: (15.0, 20.0),
        }
    }
}

impl HcOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ks(mut self, ks: usize) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_fit_ks_multiplier(mut self, fit_ks_multiplier: usize) -> Self {
        self.fit_ks_multiplier = fit_ks_multiplier;
        self
    }

    pub fn with_fit_interval(mut self, lo: f64, hi: f64) -> Self {
        self.fit_interval = (lo, hi);
        self
    }
}

/// Coercive field of a hysteresis loop.
///
/// The sweep is split into its `x >= 0` and `x < 0` subsets, preserving
/// index order. On each subset the zero crossing is the first sample with
/// minimal `|y|`, and the field value is the mean x over the `2 * ks`
/// samples around it; a crossing too close to a subset boundary is a
/// [`WindowOutOfRange`](LoopscanError::WindowOutOfRange) error rather than a
/// silently clipped window. The coercive field is the mean magnitude of the
/// two crossings.
///
/// The uncertainty projects the saturated-segment noise [`sigma_y`] through
/// the mean local slope at the crossings. A failed noise estimate (empty or
/// degenerate fit interval) is an error; only a degenerate crossing-slope
/// fit degrades the result to a point estimate with `sigma == None`.
pub fn hc_of(curve: &Curve, options: &HcOptions) -> Result<Estimate> {
    curve.ensure_paired()?;
    let ks = options.ks;
    if ks == 0 {
        return Err(LoopscanError::Config(
            "hc_of needs a positive crossing neighborhood (ks >= 1)".to_string(),
        ));
    }

    let s_y = sigma_y(curve, options.fit_interval)?;

    let mut px = Vec::new();
    let mut py = Vec::new();
    let mut nx = Vec::new();
    let mut ny = Vec::new();
    for (x, y) in curve.x().iter().zip(curve.y()) {
        if *x >= 0.0 {
            px.push(*x);
            py.push(*y);
        } else {
            nx.push(*x);
            ny.push(*y);
        }
    }

    let (hc_pos, i_pos) = side_crossing(&px, &py, ks)?;
    let (hc_neg, i_neg) = side_crossing(&nx, &ny, ks)?;
    let hc = 0.5 * (hc_pos.abs() + hc_neg.abs());

    let w = ks * options.fit_ks_multiplier;
    let slope = match (
        local_slope(&px, &py, i_pos, w),
        local_slope(&nx, &ny, i_neg, w),
    ) {
        (Some(a), Some(b)) if a + b != 0.0 => Some(0.5 * (a + b)),
        _ => None,
    };

    match slope {
        Some(m) => Ok(Estimate::new(hc, proj_sigma(s_y, m).abs())),
        None => {
            log::warn!("no usable local slope at the zero crossings, reporting a point estimate");
            Ok(Estimate::point(hc))
        }
    }
}

/// Mean x over the `2 * ks` samples around the first minimal-|y| sample.
fn side_crossing(xs: &[f64], ys: &[f64], ks: usize) -> Result<(f64, usize)> {
    let magnitudes: Vec<f64> = ys.iter().map(|y| y.abs()).collect();
    let i = nearest_index(&magnitudes, 0.0).ok_or_else(|| {
        LoopscanError::EmptySelection("a field-polarity subset of the sweep is empty".to_string())
    })?;
    if i < ks || i + ks > xs.len() {
        return Err(LoopscanError::WindowOutOfRange {
            index: i,
            ks,
            len: xs.len(),
        });
    }
    Ok((mean(&xs[i - ks..i + ks]), i))
}

/// Slope of a line fitted over the window of `w` samples around `i`,
/// clamped to the subset. `None` when the fit is degenerate.
fn local_slope(xs: &[f64], ys: &[f64], i: usize, w: usize) -> Option<f64> {
    let lo = i.saturating_sub(w);
    let hi = (i + w).min(xs.len());
    linear_fit(&xs[lo..hi], &ys[lo..hi]).ok().map(|fit| fit.slope)
}
