//! Small numeric kernels shared by the transform library and the feature
//! extractors: least-squares line fits, index selection, and median filtering.

use std::cmp::Ordering;

use crate::error::{LoopscanError, Result};

/// Result of a least-squares line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    /// Evaluate the fitted line at `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares fit of `y = m*x + b` over paired samples.
///
/// Needs at least two points with nonzero spread in x.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LineFit> {
    if x.len() != y.len() {
        return Err(LoopscanError::ShapeMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.is_empty() {
        return Err(LoopscanError::EmptySelection(
            "line fit over an empty selection".to_string(),
        ));
    }
    if x.len() < 2 {
        return Err(LoopscanError::DegenerateFit(
            "line fit needs at least two points".to_string(),
        ));
    }

    let mx = mean(x);
    let my = mean(y);
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mx;
        sxx += dx * dx;
        sxy += dx * (yi - my);
    }
    if sxx == 0.0 {
        return Err(LoopscanError::DegenerateFit(
            "zero spread in x over the selected points".to_string(),
        ));
    }

    let slope = sxy / sxx;
    Ok(LineFit {
        slope,
        intercept: my - slope * mx,
    })
}

/// Arithmetic mean. NaN for an empty slice; callers guard emptiness.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_pop(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Index of the first value nearest `x0`. Ties break to the lowest index.
pub fn nearest_index(values: &[f64], x0: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        let d = (v - x0).abs();
        match best {
            Some((_, bd)) if !(d < bd) => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first maximum value.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, bv)) if !(v > bv) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first minimum value.
pub fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, bv)) if !(v < bv) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// The `n` values nearest `x0`, ordered by distance. The distance sort is
/// stable, so equidistant values keep their original relative order.
pub fn n_nearest(values: &[f64], n: usize, x0: f64) -> Vec<f64> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        let da = (values[a] - x0).abs();
        let db = (values[b] - x0).abs();
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    });
    indices.into_iter().take(n).map(|i| values[i]).collect()
}

/// Median filter with an odd window width `ks`, zero-padded at the
/// boundaries. Width 1 is the identity.
pub fn median_filter_1d(values: &[f64], ks: usize) -> Result<Vec<f64>> {
    if ks % 2 == 0 {
        return Err(LoopscanError::EvenWindow(ks));
    }
    if ks == 1 {
        return Ok(values.to_vec());
    }

    let k = (ks / 2) as isize;
    let n = values.len() as isize;
    let mut out = Vec::with_capacity(values.len());
    let mut window = Vec::with_capacity(ks);
    for i in 0..n {
        window.clear();
        for p in (i - k)..=(i + k) {
            if p < 0 || p >= n {
                window.push(0.0);
            } else {
                window.push(values[p as usize]);
            }
        }
        window.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        out.push(window[ks / 2]);
    }
    Ok(out)
}

/// Trapezoidal integral of y over x.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    let mut area = 0.0;
    for i in 1..x.len().min(y.len()) {
        area += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
    }
    area
}
