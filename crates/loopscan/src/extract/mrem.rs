//! Remanent magnetization extraction.

use crate::curve::Curve;
use crate::error::{LoopscanError, Result};
use crate::numeric::{mean, nearest_index};

use super::estimate::Estimate;
use super::noise::sigma_y;

/// Options for [`mrem_of`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MremOptions {
    /// Half-width of the zero-field neighborhood averaged for the
    /// magnetization value.
    pub ks: usize,
    /// Strict x interval of the saturated segment used for the noise
    /// estimate.
    pub fit_interval: (f64, f64),
}

impl Default for MremOptions {
    fn default() -> Self {
        Self {
            ks: 3,
            fit_interval: (15.0, 20.0),
        }
    }
}

impl MremOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ks(mut self, ks: usize) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_fit_interval(mut self, lo: f64, hi: f64) -> Self {
        self.fit_interval = (lo, hi);
        self
    }
}

/// Remanent magnetization of a hysteresis loop.
///
/// The sweep is assumed to run through four equal quarter-cycles, so the
/// sample count must be a positive multiple of four
/// ([`QuarterPartition`](LoopscanError::QuarterPartition) otherwise).
/// Quarters 3 and 0 hold one branch's zero-field passage and quarters 1 and
/// 2 the other's; each pair is concatenated in sweep order (3 then 0), so
/// the passage is contiguous in the joined array. On each pair the
/// zero-field sample is the
/// first with minimal `|x|`, and the magnetization is `|mean(y)|` over the
/// `2 * ks` samples around it; a neighborhood reaching past the pair's
/// boundary is a [`WindowOutOfRange`](LoopscanError::WindowOutOfRange)
/// error. The result averages the two branches; the uncertainty is the
/// saturated-segment noise [`sigma_y`].
pub fn mrem_of(curve: &Curve, options: &MremOptions) -> Result<Estimate> {
    curve.ensure_paired()?;
    let n = curve.len();
    if n == 0 || n % 4 != 0 {
        return Err(LoopscanError::QuarterPartition(n));
    }
    let ks = options.ks;
    if ks == 0 {
        return Err(LoopscanError::Config(
            "mrem_of needs a positive zero-field neighborhood (ks >= 1)".to_string(),
        ));
    }

    let q = n / 4;
    let x = curve.x();
    let y = curve.y();

    let x03: Vec<f64> = x[3 * q..].iter().chain(&x[..q]).copied().collect();
    let y03: Vec<f64> = y[3 * q..].iter().chain(&y[..q]).copied().collect();
    let x12 = &x[q..3 * q];
    let y12 = &y[q..3 * q];

    let m03 = branch_magnetization(&x03, &y03, ks)?;
    let m12 = branch_magnetization(x12, y12, ks)?;
    let mrem = 0.5 * (m03 + m12);

    let sigma = sigma_y(curve, options.fit_interval)?;
    Ok(Estimate::new(mrem, sigma))
}

/// `|mean(y)|` over the `2 * ks` samples around the first minimal-|x|
/// sample.
fn branch_magnetization(xs: &[f64], ys: &[f64], ks: usize) -> Result<f64> {
    let magnitudes: Vec<f64> = xs.iter().map(|x| x.abs()).collect();
    let i = nearest_index(&magnitudes, 0.0).ok_or_else(|| {
        LoopscanError::EmptySelection("a quarter-cycle pair of the sweep is empty".to_string())
    })?;
    if i < ks || i + ks > ys.len() {
        return Err(LoopscanError::WindowOutOfRange {
            index: i,
            ks,
            len: ys.len(),
        });
    }
    Ok(mean(&ys[i - ks..i + ks]).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asymmetric_loop() -> Curve {
        // Quarters 0 and 3 cross zero field at y = 1, quarters 1 and 2 at
        // y = -0.5. Crossings sit away from the quarter boundaries.
        let x = vec![
            5.0, 3.0, 1.0, 0.2, // q0, descending toward zero
            -5.0, -3.0, -1.0, -0.2, // q1
            -0.5, -2.0, -4.0, -6.0, // q2
            0.5, 2.0, 4.0, 6.0, // q3
        ];
        let y = vec![
            1.0, 1.0, 1.0, 1.0, -0.5, -0.5, -0.5, -0.5, -0.5, -0.5, -0.5, -0.5, 1.0, 1.0, 1.0,
            1.0,
        ];
        Curve::new(x, y).unwrap()
    }

    #[test]
    fn test_mrem_averages_the_two_branches() {
        let options = MremOptions::new().with_ks(1).with_fit_interval(0.0, 10.0);
        let mrem = mrem_of(&asymmetric_loop(), &options).unwrap();
        // (|1.0| + |-0.5|) / 2 = 0.75; constant y makes the noise zero.
        assert!((mrem.central() - 0.75).abs() < 1e-12);
        assert_eq!(mrem.sigma(), Some(0.0));
    }

    #[test]
    fn test_mrem_rejects_partial_quarters() {
        let curve = Curve::new(vec![1.0; 6], vec![1.0; 6]).unwrap();
        let err = mrem_of(&curve, &MremOptions::new()).unwrap_err();
        assert!(matches!(err, LoopscanError::QuarterPartition(6)));

        let curve = Curve::new(vec![], vec![]).unwrap();
        let err = mrem_of(&curve, &MremOptions::new()).unwrap_err();
        assert!(matches!(err, LoopscanError::QuarterPartition(0)));
    }

    #[test]
    fn test_mrem_rejects_boundary_neighborhood() {
        // Minimal |x| of the 3+0 pair sits at its first sample (the start of
        // quarter 3).
        let x = vec![
            5.0, 6.0, 3.0, 2.0, -5.0, -3.0, -1.0, -0.2, -0.5, -2.0, -4.0, -6.0, 0.1, 8.0, 9.0,
            10.0,
        ];
        let y = vec![1.0; 16];
        let curve = Curve::new(x, y).unwrap();
        let options = MremOptions::new().with_ks(1).with_fit_interval(0.0, 10.0);
        let err = mrem_of(&curve, &options).unwrap_err();
        assert!(matches!(err, LoopscanError::WindowOutOfRange { index: 0, .. }));
    }

    #[test]
    fn test_mrem_rejects_zero_ks() {
        let curve = asymmetric_loop();
        let err = mrem_of(&curve, &MremOptions::new().with_ks(0)).unwrap_err();
        assert!(matches!(err, LoopscanError::Config(_)));
    }
}
