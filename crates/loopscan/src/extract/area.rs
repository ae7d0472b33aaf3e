//! Enclosed loop area.

use crate::curve::Curve;
use crate::error::{LoopscanError, Result};
use crate::numeric::{argmax, argmin, trapezoid};

/// Area enclosed by a hysteresis loop, by trapezoidal integration.
///
/// The sweep is split at the extremal-field samples: the segment from the
/// first maximum of x to the first minimum is one branch, the pieces before
/// and after it the other. The enclosed area is the magnitude of the signed
/// circulation over the three pieces. Sweeps where the field maximum does
/// not precede the minimum are rejected as
/// [`DegenerateFit`](LoopscanError::DegenerateFit).
pub fn loop_area(curve: &Curve) -> Result<f64> {
    curve.ensure_paired()?;
    let x = curve.x();
    let y = curve.y();
    let (Some(right), Some(left)) = (argmax(x), argmin(x)) else {
        return Err(LoopscanError::EmptySelection(
            "cannot integrate an empty curve".to_string(),
        ));
    };
    if right >= left {
        return Err(LoopscanError::DegenerateFit(format!(
            "field maximum at index {right} does not precede the minimum at index {left}"
        )));
    }

    let top = trapezoid(&x[right..=left], &y[right..=left]);
    let before = trapezoid(&x[..=right], &y[..=right]);
    let after = trapezoid(&x[left..], &y[left..]);
    Ok((top + before + after).abs())
}
