//! Summary statistics over historical observations.

use crate::MathError;

/// Arithmetic mean.
///
/// # Errors
/// Returns `MathError::EmptyData` if `values` is empty.
pub fn mean(values: &[f64]) -> Result<f64, MathError> {
    if values.is_empty() {
        return Err(MathError::EmptyData);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Period-over-period growth `v[i] / v[i-1] - 1` for consecutive values.
///
/// Steps from a zero base are skipped since growth off zero is undefined.
#[must_use]
pub fn yoy_growth(values: &[f64]) -> Vec<f64> {
    values.windows(2).filter(|w| w[0] != 0.0).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Compound annual growth rate between `first` and `last` over `years`.
///
/// # Errors
/// Returns `MathError::NonPositiveBase` if `first <= 0`, and
/// `MathError::InvalidRange` if `years == 0`.
pub fn cagr(first: f64, last: f64, years: u32) -> Result<f64, MathError> {
    if first.is_nan() || first <= 0.0 {
        return Err(MathError::NonPositiveBase(first));
    }
    if years == 0 {
        return Err(MathError::InvalidRange("CAGR needs at least one year".to_string()));
    }
    Ok((last / first).powf(1.0 / f64::from(years)) - 1.0)
}

/// Percentile of the finite values in `values`, by linear interpolation
/// between closest ranks. NaN entries are ignored.
///
/// # Arguments
/// * `values` - Observations, may contain NaN
/// * `q` - Quantile in `[0, 1]` (0.25 for the 25th percentile)
///
/// # Errors
/// Returns `MathError::InvalidPercentile` for `q` outside `[0, 1]` and
/// `MathError::EmptyData` when no finite value remains.
pub fn percentile(values: &[f64], q: f64) -> Result<f64, MathError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidPercentile(q));
    }

    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if sorted.is_empty() {
        return Err(MathError::EmptyData);
    }
    sorted.sort_by(f64::total_cmp);

    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn mean_of_empty_errors() {
        assert_eq!(mean(&[]), Err(MathError::EmptyData));
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
    }

    #[test]
    fn yoy_growth_steps() {
        let g = yoy_growth(&[100.0, 110.0, 121.0]);
        assert_eq!(g.len(), 2);
        assert_relative_eq!(g[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(g[1], 0.10, epsilon = 1e-12);
    }

    #[test]
    fn yoy_growth_skips_zero_base() {
        let g = yoy_growth(&[0.0, 50.0, 100.0]);
        assert_eq!(g, vec![1.0]);
    }

    #[test]
    fn cagr_two_steps() {
        assert_relative_eq!(cagr(100.0, 121.0, 2).unwrap(), 0.10, epsilon = 1e-12);
        assert!(cagr(0.0, 121.0, 2).is_err());
        assert!(cagr(100.0, 121.0, 0).is_err());
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.25, 2.0)]
    #[case(0.5, 3.0)]
    #[case(0.75, 4.0)]
    #[case(1.0, 5.0)]
    fn percentile_matches_linear_rank(#[case] q: f64, #[case] expected: f64) {
        let data = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_relative_eq!(percentile(&data, q).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn percentile_interpolates() {
        // rank = 0.25 * 3 = 0.75 -> 10 + 0.75 * 10
        assert_relative_eq!(percentile(&[10.0, 20.0, 30.0, 40.0], 0.25).unwrap(), 17.5);
    }

    #[test]
    fn percentile_ignores_nan() {
        let data = [f64::NAN, 1.0, f64::NAN, 3.0];
        assert_relative_eq!(percentile(&data, 0.5).unwrap(), 2.0);
    }

    #[test]
    fn percentile_all_nan_errors() {
        assert_eq!(percentile(&[f64::NAN, f64::NAN], 0.5), Err(MathError::EmptyData));
        assert_eq!(percentile(&[1.0], 1.5), Err(MathError::InvalidPercentile(1.5)));
    }
}
