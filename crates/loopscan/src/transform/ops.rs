//! The transform function library.
//!
//! Every transform shares the signature
//! `fn(&mut Curve, &TransformOptions, &mut RunState) -> Result<()>` so the
//! pipeline can call any of them uniformly; each reads only the options it
//! recognizes. All transforms verify the curve's pairing invariant before
//! touching it. `vertical_offset` is the single stateful transform; its
//! accumulator lives in the pipeline's [`RunState`].

use crate::curve::{Axis, Curve, Limit};
use crate::error::{LoopscanError, Result};
use crate::numeric::{self, linear_fit, median_filter_1d, n_nearest};

use super::{RunState, TransformOptions};

/// Multiply x by `xsc` and y by `ysc`.
pub fn scale(curve: &mut Curve, options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    let (x, y) = curve.parts_mut();
    for v in x.iter_mut() {
        *v *= options.xsc;
    }
    for v in y.iter_mut() {
        *v *= options.ysc;
    }
    Ok(())
}

/// Add `xtrans` to x and `ytrans` to y.
pub fn translate(curve: &mut Curve, options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    let (x, y) = curve.parts_mut();
    for v in x.iter_mut() {
        *v += options.xtrans;
    }
    for v in y.iter_mut() {
        *v += options.ytrans;
    }
    Ok(())
}

/// Negate x.
pub fn invertx(curve: &mut Curve, _options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    for v in curve.parts_mut().0.iter_mut() {
        *v = -*v;
    }
    Ok(())
}

/// Negate y.
pub fn inverty(curve: &mut Curve, _options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    for v in curve.parts_mut().1.iter_mut() {
        *v = -*v;
    }
    Ok(())
}

/// Subtract the midpoint of (max, min) from the chosen axis. Distinct from
/// [`remove_offset`]: on a skewed loop the midpoint and the mean differ.
pub fn center(curve: &mut Curve, options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    let values = axis_mut(curve, options.axis);
    if values.is_empty() {
        return Err(LoopscanError::EmptySelection(
            "cannot center an empty curve".to_string(),
        ));
    }
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mid = 0.5 * (max + min);
    for v in values.iter_mut() {
        *v -= mid;
    }
    Ok(())
}

/// Subtract the arithmetic mean from the chosen axis.
pub fn remove_offset(
    curve: &mut Curve,
    options: &TransformOptions,
    _run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    let values = axis_mut(curve, options.axis);
    if values.is_empty() {
        return Err(LoopscanError::EmptySelection(
            "cannot remove the offset of an empty curve".to_string(),
        ));
    }
    let m = numeric::mean(values);
    for v in values.iter_mut() {
        *v -= m;
    }
    Ok(())
}

/// Median-filter the chosen axis with window width `ks` (odd).
pub fn medfilt(curve: &mut Curve, options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    let values = axis_mut(curve, options.axis);
    let filtered = median_filter_1d(values, options.ks)?;
    values.copy_from_slice(&filtered);
    Ok(())
}

/// Median-filter the chosen axis, treating the curve as periodic.
///
/// The last `ks` samples are prepended and the first `ks` appended before
/// filtering, then the padding is discarded. On a closed loop this removes
/// the edge artifacts a plain median filter introduces within `(ks - 1) / 2`
/// samples of the array boundary.
pub fn wrapped_medfilt(
    curve: &mut Curve,
    options: &TransformOptions,
    _run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    let ks = options.ks;
    let n = curve.len();
    if ks > n {
        return Err(LoopscanError::InsufficientSamples {
            needed: ks,
            available: n,
        });
    }
    let values = axis_mut(curve, options.axis);
    let mut padded = Vec::with_capacity(n + 2 * ks);
    padded.extend_from_slice(&values[n - ks..]);
    padded.extend_from_slice(values);
    padded.extend_from_slice(&values[..ks]);
    let filtered = median_filter_1d(&padded, ks)?;
    values.copy_from_slice(&filtered[ks..ks + n]);
    Ok(())
}

/// Fit a line to the saturation region (`x > threshold` for polarity '+',
/// `x < threshold` for '-') and subtract it from the entire y array.
pub fn flatten_saturation(
    curve: &mut Curve,
    options: &TransformOptions,
    _run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    let mut sx = Vec::new();
    let mut sy = Vec::new();
    for (x, y) in curve.x().iter().zip(curve.y()) {
        let selected = match options.polarity {
            super::Polarity::Plus => *x > options.threshold,
            super::Polarity::Minus => *x < options.threshold,
        };
        if selected {
            sx.push(*x);
            sy.push(*y);
        }
    }
    if sx.is_empty() {
        let side = match options.polarity {
            super::Polarity::Plus => ">",
            super::Polarity::Minus => "<",
        };
        return Err(LoopscanError::EmptySelection(format!(
            "no points with x {side} {} to fit the saturation slope",
            options.threshold
        )));
    }
    let fit = linear_fit(&sx, &sy)?;
    let (x, y) = curve.parts_mut();
    for (xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi -= fit.at(*xi);
    }
    Ok(())
}

/// Divide y by the saturation level: the mean of |y| over points with
/// `|x| > thresh`. Rescales the loop so the saturated plateaus sit near one.
pub fn saturation_normalize(
    curve: &mut Curve,
    options: &TransformOptions,
    _run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    let selected: Vec<f64> = curve
        .x()
        .iter()
        .zip(curve.y())
        .filter(|(x, _)| x.abs() > options.thresh)
        .map(|(_, y)| y.abs())
        .collect();
    if selected.is_empty() {
        return Err(LoopscanError::EmptySelection(format!(
            "no points with |x| > {} to estimate the saturation level",
            options.thresh
        )));
    }
    let level = numeric::mean(&selected);
    if level == 0.0 {
        return Err(LoopscanError::DegenerateFit(
            "zero saturation level".to_string(),
        ));
    }
    for v in curve.parts_mut().1.iter_mut() {
        *v /= level;
    }
    Ok(())
}

/// Divide the chosen axis by the mean of its `n_avg` largest-magnitude
/// values. Averaging over several points keeps one noisy outlier from
/// setting the scale.
pub fn simple_normalize(
    curve: &mut Curve,
    options: &TransformOptions,
    _run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    let n_avg = options.n_avg.max(1);
    let values = axis_mut(curve, options.axis);
    let level = peak_level(values, n_avg)?;
    for v in values.iter_mut() {
        *v /= level;
    }
    Ok(())
}

/// Scale and translate each axis with a configured limit to fit its window.
/// The amplitude estimate averages the `n_avg` largest-magnitude points.
pub fn normalize(curve: &mut Curve, options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    let n_avg = options.n_avg.max(1);
    let (x, y) = curve.parts_mut();
    if let Some(lim) = options.xlim {
        rescale_to(x, lim, n_avg)?;
    }
    if let Some(lim) = options.ylim {
        rescale_to(y, lim, n_avg)?;
    }
    Ok(())
}

/// Replace the axis *opposite* the one named by `axis` with the index
/// sequence `0..N`. With `axis = y` the x data is discarded, leaving y
/// against ordinal position.
pub fn unroll(curve: &mut Curve, options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    let n = curve.len();
    let ramp: Vec<f64> = (0..n).map(|i| i as f64).collect();
    match options.axis {
        Axis::Y => *curve.parts_mut().0 = ramp,
        Axis::X => *curve.parts_mut().1 = ramp,
    }
    Ok(())
}

/// Shift y upward by an offset that grows by `dy` on every invocation.
///
/// The one impure transform: the running offset is shared across all curves
/// of a pipeline run (for stacked-curve display) and is reset by
/// [`Transformer::reset_run`](super::Transformer::reset_run).
pub fn vertical_offset(
    curve: &mut Curve,
    options: &TransformOptions,
    run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    run.vertical_offset += options.dy;
    let offset = run.vertical_offset;
    for v in curve.parts_mut().1.iter_mut() {
        *v += offset;
    }
    Ok(())
}

/// Drop every point with `|x| >= thresh` from both axes.
pub fn threshold_crop(
    curve: &mut Curve,
    options: &TransformOptions,
    _run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    let keep: Vec<bool> = curve.x().iter().map(|x| x.abs() < options.thresh).collect();
    let (x, y) = curve.parts_mut();
    let mut it = keep.iter();
    x.retain(|_| *it.next().unwrap_or(&false));
    let mut it = keep.iter();
    y.retain(|_| *it.next().unwrap_or(&false));
    Ok(())
}

/// Keep the first half of the sweep by index.
pub fn first_half(curve: &mut Curve, _options: &TransformOptions, _run: &mut RunState) -> Result<()> {
    curve.ensure_paired()?;
    let half = curve.len().saturating_sub(1) / 2;
    let (x, y) = curve.parts_mut();
    x.truncate(half);
    y.truncate(half);
    Ok(())
}

/// Keep the second half of the sweep by index.
pub fn second_half(
    curve: &mut Curve,
    _options: &TransformOptions,
    _run: &mut RunState,
) -> Result<()> {
    curve.ensure_paired()?;
    let half = curve.len().saturating_sub(1) / 2;
    let (x, y) = curve.parts_mut();
    x.drain(..half);
    y.drain(..half);
    Ok(())
}

fn axis_mut(curve: &mut Curve, axis: Axis) -> &mut Vec<f64> {
    let (x, y) = curve.parts_mut();
    match axis {
        Axis::X => x,
        Axis::Y => y,
    }
}

/// Mean of the `n` values nearest the maximum of |values|.
fn peak_level(values: &[f64], n: usize) -> Result<f64> {
    if values.is_empty() {
        return Err(LoopscanError::EmptySelection(
            "cannot normalize an empty curve".to_string(),
        ));
    }
    let magnitudes: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    let peak = magnitudes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let level = numeric::mean(&n_nearest(&magnitudes, n, peak));
    if level == 0.0 {
        return Err(LoopscanError::DegenerateFit(
            "zero amplitude, cannot normalize".to_string(),
        ));
    }
    Ok(level)
}

fn rescale_to(values: &mut [f64], lim: Limit, n_avg: usize) -> Result<()> {
    if values.is_empty() {
        return Err(LoopscanError::EmptySelection(
            "cannot normalize an empty curve".to_string(),
        ));
    }
    let m = numeric::mean(values);
    for v in values.iter_mut() {
        *v -= m;
    }
    let width = 2.0 * peak_level(values, n_avg)?;
    let scale = lim.width() / width;
    let center = lim.center();
    for v in values.iter_mut() {
        *v = *v * scale + center;
    }
    Ok(())
}
