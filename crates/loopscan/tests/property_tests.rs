//! Property-based tests for the transform library and extractors.
//!
//! These use proptest to generate random curves and verify that:
//! 1. **No panics**: transforms and extractors never crash, they return
//!    `Ok` or a typed error
//! 2. **Determinism**: the same pipeline applied to the same curve always
//!    produces the same output
//! 3. **Invariants**: pairing is preserved, brackets stay ordered, the
//!    wrapped median filter matches its circular reference

use proptest::prelude::*;

use loopscan::transform::ops;
use loopscan::{
    hc_of, mrem_of, Curve, Estimate, Filter, HcOptions, MremOptions, RunState, TransformOptions,
    Transformer,
};

// =============================================================================
// Strategies
// =============================================================================

/// Bounded finite samples; the algorithms are not specified for NaN/inf.
fn sample() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6
}

fn curve_data(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..=max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(sample(), n),
            prop::collection::vec(sample(), n),
        )
    })
}

/// Odd filter widths.
fn odd_ks(max: usize) -> impl Strategy<Value = usize> {
    (0..=max / 2).prop_map(|k| 2 * k + 1)
}

// =============================================================================
// Transform properties
// =============================================================================

proptest! {
    #[test]
    fn prop_transforms_preserve_pairing((x, y) in curve_data(64)) {
        type Transform = fn(&mut Curve, &TransformOptions, &mut RunState) -> loopscan::Result<()>;
        let options = TransformOptions::new().with_thresh(10.0);
        let mut run = RunState::default();
        let transforms: [Transform; 12] = [
            ops::scale,
            ops::translate,
            ops::invertx,
            ops::inverty,
            ops::center,
            ops::remove_offset,
            ops::medfilt,
            ops::unroll,
            ops::vertical_offset,
            ops::threshold_crop,
            ops::first_half,
            ops::second_half,
        ];
        for transform in transforms {
            let mut curve = Curve::new(x.clone(), y.clone()).unwrap();
            let _ = transform(&mut curve, &options, &mut run);
            prop_assert_eq!(curve.x().len(), curve.y().len());
        }
    }

    #[test]
    fn prop_scale_roundtrips(
        (x, y) in curve_data(32),
        factor in prop_oneof![0.01..100.0f64, -100.0..-0.01f64],
    ) {
        let curve = Curve::new(x.clone(), y).unwrap();
        let mut run = RunState::default();
        let mut scaled = curve.clone();
        ops::scale(&mut scaled, &TransformOptions::new().with_xsc(factor), &mut run).unwrap();
        ops::scale(&mut scaled, &TransformOptions::new().with_xsc(1.0 / factor), &mut run)
            .unwrap();
        for (a, b) in scaled.x().iter().zip(curve.x()) {
            prop_assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0));
        }
    }

    #[test]
    fn prop_center_zeroes_the_midpoint((x, y) in curve_data(32)) {
        let mut curve = Curve::new(x, y).unwrap();
        let mut run = RunState::default();
        ops::center(&mut curve, &TransformOptions::new(), &mut run).unwrap();
        let max = curve.y().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = curve.y().iter().cloned().fold(f64::INFINITY, f64::min);
        // Exact cancellation is not guaranteed in floating point, but the
        // midpoint must be negligible against the data magnitude.
        prop_assert!((max + min).abs() <= 1e-9 * max.abs().max(min.abs()).max(1.0));
    }

    #[test]
    fn prop_wrapped_medfilt_matches_circular_reference(
        y in prop::collection::vec(sample(), 1..48),
        ks in odd_ks(16),
    ) {
        prop_assume!(ks <= y.len());
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        let mut curve = Curve::new(x, y.clone()).unwrap();
        let mut run = RunState::default();
        ops::wrapped_medfilt(&mut curve, &TransformOptions::new().with_ks(ks), &mut run)
            .unwrap();

        let n = y.len() as isize;
        let k = (ks / 2) as isize;
        for i in 0..n {
            let mut window: Vec<f64> = ((i - k)..=(i + k))
                .map(|p| y[p.rem_euclid(n) as usize])
                .collect();
            window.sort_by(|a, b| a.partial_cmp(b).unwrap());
            prop_assert_eq!(curve.y()[i as usize], window[ks / 2]);
        }
    }

    #[test]
    fn prop_pipeline_is_deterministic((x, y) in curve_data(48)) {
        let build = || {
            let mut pipeline = Transformer::new();
            pipeline
                .add(10, "scale", ops::scale,
                     TransformOptions::new().with_xsc(0.1), Filter::Any)
                .unwrap();
            pipeline
                .add(20, "center", ops::center, TransformOptions::new(), Filter::Any)
                .unwrap();
            pipeline
                .add(30, "medfilt", ops::medfilt,
                     TransformOptions::new().with_ks(3), Filter::Any)
                .unwrap();
            pipeline
        };
        let curve = Curve::new(x, y).unwrap();
        let a = build().apply(curve.clone(), "t").unwrap();
        let b = build().apply(curve, "t").unwrap();
        prop_assert_eq!(a, b);
    }
}

// =============================================================================
// Extractor properties
// =============================================================================

proptest! {
    #[test]
    fn prop_extractors_never_panic((x, y) in curve_data(64)) {
        let curve = Curve::new(x, y).unwrap();
        let _ = hc_of(&curve, &HcOptions::new());
        let _ = mrem_of(&curve, &MremOptions::new());
    }

    #[test]
    fn prop_estimate_bracket_is_ordered(central in sample(), sigma in 0.0..1.0e6f64) {
        let estimate = Estimate::new(central, sigma);
        let [lower, mid, upper] = estimate.values();
        prop_assert!(lower <= mid && mid <= upper);
        prop_assert_eq!(mid, central);
        prop_assert!(!estimate.is_point_estimate());
    }
}
