//! Valuation outputs.

use serde::{Deserialize, Serialize};

/// A substitution the equity bridge made because an input was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BridgeWarning {
    /// No cash balance reported; treated as zero.
    MissingCash,
    /// No debt balance reported; treated as zero.
    MissingDebt,
}

impl std::fmt::Display for BridgeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCash => write!(f, "cash unavailable, treated as zero"),
            Self::MissingDebt => write!(f, "debt unavailable, treated as zero"),
        }
    }
}

/// Result of a full DCF run for one set of assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Sum of discounted explicit-horizon cash flows.
    pub pv_explicit: f64,
    /// Nominal terminal value at the end of the horizon.
    pub terminal_value: f64,
    /// Terminal value discounted to today.
    pub pv_terminal_value: f64,
    /// `pv_explicit + pv_terminal_value`.
    pub enterprise_value: f64,
    /// Enterprise value plus cash minus debt.
    pub equity_value: f64,
    /// Share count used for the per-share figure.
    pub shares: f64,
    /// Equity value per share.
    pub per_share: f64,
    /// Degradations applied by the equity bridge.
    pub warnings: Vec<BridgeWarning>,
}

impl ValuationResult {
    /// Fraction of enterprise value contributed by the terminal value.
    #[must_use]
    pub fn terminal_share(&self) -> f64 {
        if self.enterprise_value == 0.0 {
            f64::NAN
        } else {
            self.pv_terminal_value / self.enterprise_value
        }
    }

    /// Whether the bridge substituted any missing input.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A valuation method shown on the football field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeMethod {
    /// Interquartile range of the DCF sensitivity grid.
    Dcf,
    /// Enterprise value over EBITDA multiples.
    EvEbitda,
    /// Price over earnings multiples.
    PriceEarnings,
}

impl std::fmt::Display for RangeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dcf => write!(f, "DCF (sensitivity IQR)"),
            Self::EvEbitda => write!(f, "EV/EBITDA"),
            Self::PriceEarnings => write!(f, "P/E"),
        }
    }
}

/// A per-share value range for one method. Always `low <= high`, including
/// after deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BandBounds")]
pub struct ValuationBand {
    /// Method that produced the band.
    pub method: RangeMethod,
    low: f64,
    high: f64,
}

#[derive(Deserialize)]
struct BandBounds {
    method: RangeMethod,
    low: f64,
    high: f64,
}

impl From<BandBounds> for ValuationBand {
    fn from(b: BandBounds) -> Self {
        Self::new(b.method, b.low, b.high)
    }
}

impl ValuationBand {
    /// Create a band, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(method: RangeMethod, a: f64, b: f64) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self { method, low, high }
    }

    /// Lower bound.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Midpoint.
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Whether `value` lies inside the band.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_normalizes_order() {
        let band = ValuationBand::new(RangeMethod::PriceEarnings, 28.0, 18.0);
        assert_eq!(band.low(), 18.0);
        assert_eq!(band.high(), 28.0);
        assert_eq!(band.mid(), 23.0);
        assert!(band.contains(20.0));
    }

    #[test]
    fn deserialized_band_is_ordered() {
        let band: ValuationBand =
            serde_json::from_str(r#"{"method":"Dcf","low":12.5,"high":7.0}"#).unwrap();
        assert_eq!(band.method, RangeMethod::Dcf);
        assert_eq!(band.low(), 7.0);
        assert_eq!(band.high(), 12.5);

        let json = serde_json::to_string(&band).unwrap();
        assert_eq!(serde_json::from_str::<ValuationBand>(&json).unwrap(), band);
    }

    #[test]
    fn terminal_share_of_zero_ev_is_nan() {
        let result = ValuationResult {
            pv_explicit: 0.0,
            terminal_value: 0.0,
            pv_terminal_value: 0.0,
            enterprise_value: 0.0,
            equity_value: 0.0,
            shares: 1.0,
            per_share: 0.0,
            warnings: vec![],
        };
        assert!(result.terminal_share().is_nan());
        assert!(!result.is_degraded());
    }

    #[test]
    fn method_labels() {
        assert_eq!(RangeMethod::EvEbitda.to_string(), "EV/EBITDA");
        assert_eq!(BridgeWarning::MissingDebt.to_string(), "debt unavailable, treated as zero");
    }
}
