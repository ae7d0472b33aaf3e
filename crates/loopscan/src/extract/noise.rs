//! Noise estimation on the saturated segment of a sweep.

use crate::curve::Curve;
use crate::error::{LoopscanError, Result};
use crate::numeric::{linear_fit, std_pop};

/// Standard deviation of y residuals about a line fitted over the saturated
/// start of the sweep.
///
/// Only the first quarter of the samples (by index) is considered, so the
/// fit sees a single branch; within it, only points with
/// `lo < x < hi` (strict) enter the fit. The returned value is the
/// population standard deviation of the residuals.
pub fn sigma_y(curve: &Curve, fit_interval: (f64, f64)) -> Result<f64> {
    curve.ensure_paired()?;
    let (lo, hi) = fit_interval;
    let quarter = curve.len() / 4;

    let mut sx = Vec::new();
    let mut sy = Vec::new();
    for (x, y) in curve.x()[..quarter].iter().zip(&curve.y()[..quarter]) {
        if lo < *x && *x < hi {
            sx.push(*x);
            sy.push(*y);
        }
    }
    if sx.is_empty() {
        return Err(LoopscanError::EmptySelection(format!(
            "no points with {lo} < x < {hi} in the first quarter of the sweep"
        )));
    }

    let fit = linear_fit(&sx, &sy)?;
    let residuals: Vec<f64> = sx
        .iter()
        .zip(&sy)
        .map(|(x, y)| y - fit.at(*x))
        .collect();
    Ok(std_pop(&residuals))
}

/// Project a y uncertainty through a local slope onto the x axis.
pub fn proj_sigma(sigma: f64, slope: f64) -> f64 {
    sigma / slope
}
