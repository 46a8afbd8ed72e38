//! Discounting and terminal-value formulas.

use ndarray::Array1;

use crate::MathError;

/// Present value of one unit received `period` years from now: `(1 + rate)^-period`.
///
/// # Errors
/// Returns `MathError::RateOutOfDomain` if `rate <= -1`.
pub fn discount_factor(rate: f64, period: u32) -> Result<f64, MathError> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(MathError::RateOutOfDomain(rate));
    }
    Ok((1.0 + rate).powi(-(period as i32)))
}

/// Discount factors for periods `1..=n`.
///
/// # Errors
/// Returns `MathError::RateOutOfDomain` if `rate <= -1`.
pub fn discount_factors(rate: f64, n: u32) -> Result<Array1<f64>, MathError> {
    (1..=n).map(|t| discount_factor(rate, t)).collect::<Result<Vec<_>, _>>().map(Array1::from_vec)
}

/// Gordon-growth value one period after `cash_flow`: `cf * (1 + g) / (r - g)`.
///
/// Returns `None` when `rate <= growth`; the formula has no finite,
/// economically meaningful value there and no substitute is computed.
#[must_use]
pub fn gordon_growth(cash_flow: f64, rate: f64, growth: f64) -> Option<f64> {
    if rate > growth { Some(cash_flow * (1.0 + growth) / (rate - growth)) } else { None }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn zero_period_factor_is_one() {
        assert_eq!(discount_factor(0.1, 0).unwrap(), 1.0);
    }

    #[test]
    fn five_year_factor() {
        assert_relative_eq!(discount_factor(0.10, 5).unwrap(), 0.620_921_323, epsilon = 1e-9);
    }

    #[test]
    fn factors_are_decreasing_for_positive_rate() {
        let df = discount_factors(0.08, 10).unwrap();
        assert_eq!(df.len(), 10);
        assert!(df.windows(2).into_iter().all(|w| w[1] < w[0]));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(-1.5)]
    #[case(f64::NAN)]
    fn out_of_domain_rate(#[case] rate: f64) {
        assert!(discount_factor(rate, 1).is_err());
    }

    #[test]
    fn gordon_growth_value() {
        let tv = gordon_growth(100.0, 0.10, 0.03).unwrap();
        assert_relative_eq!(tv, 1471.428_571, epsilon = 1e-5);
    }

    #[rstest]
    #[case(0.05, 0.05)]
    #[case(0.04, 0.06)]
    fn gordon_growth_undefined(#[case] r: f64, #[case] g: f64) {
        assert!(gordon_growth(100.0, r, g).is_none());
    }
}
