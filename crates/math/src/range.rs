//! Evenly spaced axes for sensitivity grids and sweeps.

use ndarray::Array1;

use crate::MathError;

/// Tolerance added to the upper bound so `max` itself is included despite
/// floating-point accumulation (`0.08 + 8 * 0.01` may land just above `0.16`).
const INCLUSIVE_EPS: f64 = 1e-9;

/// Values `min, min + step, ...` up to and including `max`.
///
/// Each value is computed as `min + i * step` rather than by repeated
/// addition, so axes are reproducible regardless of length.
///
/// # Errors
/// Returns `MathError::InvalidRange` if any bound is non-finite, `step <= 0`
/// or `max < min`.
pub fn arange_inclusive(min: f64, max: f64, step: f64) -> Result<Array1<f64>, MathError> {
    if !(min.is_finite() && max.is_finite() && step.is_finite()) {
        return Err(MathError::InvalidRange(format!("non-finite bound in {min}..={max} by {step}")));
    }
    if step <= 0.0 {
        return Err(MathError::InvalidRange(format!("step must be positive, got {step}")));
    }
    if max < min {
        return Err(MathError::InvalidRange(format!("max {max} is below min {min}")));
    }

    let n = ((max - min + INCLUSIVE_EPS) / step).floor() as usize + 1;
    Ok(Array1::from_iter((0..n).map(|i| min + i as f64 * step)))
}

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// # Errors
/// Returns `MathError::InvalidRange` if `n == 0` or a bound is non-finite.
pub fn linspace(start: f64, end: f64, n: usize) -> Result<Array1<f64>, MathError> {
    if n == 0 {
        return Err(MathError::InvalidRange("linspace needs at least one point".to_string()));
    }
    if !(start.is_finite() && end.is_finite()) {
        return Err(MathError::InvalidRange(format!("non-finite bound in {start}..={end}")));
    }
    Ok(Array1::linspace(start, end, n))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn arange_includes_max() {
        let axis = arange_inclusive(0.08, 0.16, 0.01).unwrap();
        assert_eq!(axis.len(), 9);
        assert_relative_eq!(axis[0], 0.08);
        assert_relative_eq!(axis[8], 0.16, epsilon = 1e-12);
    }

    #[test]
    fn arange_half_steps() {
        let axis = arange_inclusive(0.01, 0.05, 0.005).unwrap();
        assert_eq!(axis.len(), 9);
    }

    #[test]
    fn arange_single_point() {
        let axis = arange_inclusive(0.1, 0.1, 0.01).unwrap();
        assert_eq!(axis.len(), 1);
    }

    #[rstest]
    #[case(0.1, 0.2, 0.0)]
    #[case(0.1, 0.2, -0.01)]
    #[case(0.2, 0.1, 0.01)]
    #[case(f64::NAN, 0.1, 0.01)]
    fn arange_rejects_bad_ranges(#[case] min: f64, #[case] max: f64, #[case] step: f64) {
        assert!(arange_inclusive(min, max, step).is_err());
    }

    #[test]
    fn linspace_endpoints() {
        let xs = linspace(-0.05, 0.05, 9).unwrap();
        assert_eq!(xs.len(), 9);
        assert_relative_eq!(xs[0], -0.05);
        assert_relative_eq!(xs[4], 0.0, epsilon = 1e-12);
        assert_relative_eq!(xs[8], 0.05);
        assert!(linspace(0.0, 1.0, 0).is_err());
    }
}
