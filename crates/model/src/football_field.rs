//! Per-share valuation ranges from independent methods.

use fairvalue_math::percentile;
use fairvalue_primitives::{BridgeWarning, LineItem, RangeMethod, ValuationBand};
use serde::{Deserialize, Serialize};

use crate::{BalancePosition, ModelError};

/// Multiple ranges and DCF quantiles for the football field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplesConfig {
    /// EV/EBITDA multiple range.
    pub ev_ebitda: (f64, f64),
    /// P/E multiple range.
    pub pe: (f64, f64),
    /// Quantiles of the sensitivity grid used for the DCF band.
    pub dcf_quantiles: (f64, f64),
}

impl Default for MultiplesConfig {
    fn default() -> Self {
        Self { ev_ebitda: (10.0, 16.0), pe: (18.0, 28.0), dcf_quantiles: (0.25, 0.75) }
    }
}

impl MultiplesConfig {
    /// Check that multiples are finite and quantiles lie in `[0, 1]`.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidAssumption` naming the offending field.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, (a, b)) in [("EV/EBITDA multiple", self.ev_ebitda), ("P/E multiple", self.pe)] {
            if !(a.is_finite() && b.is_finite()) {
                return Err(ModelError::InvalidAssumption(format!(
                    "{name} range must be finite, got ({a}, {b})"
                )));
            }
        }
        let (lo, hi) = self.dcf_quantiles;
        if !((0.0..=1.0).contains(&lo) && (0.0..=1.0).contains(&hi)) {
            return Err(ModelError::InvalidAssumption(format!(
                "DCF quantiles must lie in [0, 1], got ({lo}, {hi})"
            )));
        }
        Ok(())
    }
}

/// Company figures the methods draw on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInputs {
    /// Defined per-share values from the sensitivity grid.
    pub dcf_per_share: Vec<f64>,
    /// Latest EBITDA, or EBIT when EBITDA is not reported.
    pub ebitda: Option<f64>,
    /// Latest net income.
    pub net_income: Option<f64>,
    /// Share count.
    pub shares: Option<f64>,
    /// Latest cash and debt.
    pub position: BalancePosition,
}

impl FieldInputs {
    fn shares(&self) -> Result<f64, ModelError> {
        self.shares.filter(|s| s.is_finite() && *s > 0.0).ok_or(ModelError::ShareCountUnavailable)
    }
}

/// A way of turning company figures into a per-share range.
pub trait ValuationMethod {
    /// Which method this is.
    fn method(&self) -> RangeMethod;

    /// Compute the band.
    ///
    /// # Errors
    /// Returns the missing input if the band cannot be computed.
    fn band(&self, inputs: &FieldInputs) -> Result<ValuationBand, ModelError>;
}

/// Quantile band of the DCF sensitivity distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcfRange {
    /// Lower quantile.
    pub low: f64,
    /// Upper quantile.
    pub high: f64,
}

impl ValuationMethod for DcfRange {
    fn method(&self) -> RangeMethod {
        RangeMethod::Dcf
    }

    fn band(&self, inputs: &FieldInputs) -> Result<ValuationBand, ModelError> {
        let lo = percentile(&inputs.dcf_per_share, self.low)?;
        let hi = percentile(&inputs.dcf_per_share, self.high)?;
        Ok(ValuationBand::new(self.method(), lo, hi))
    }
}

/// `(multiple * EBITDA + cash - debt) / shares`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvEbitdaMultiple {
    /// Low multiple.
    pub low: f64,
    /// High multiple.
    pub high: f64,
}

impl ValuationMethod for EvEbitdaMultiple {
    fn method(&self) -> RangeMethod {
        RangeMethod::EvEbitda
    }

    fn band(&self, inputs: &FieldInputs) -> Result<ValuationBand, ModelError> {
        let ebitda = inputs.ebitda.ok_or(ModelError::MissingLineItem(LineItem::Ebitda))?;
        let shares = inputs.shares()?;
        let (net_cash, _) = inputs.position.net_cash();
        let per_share = |m: f64| (m * ebitda + net_cash) / shares;
        Ok(ValuationBand::new(self.method(), per_share(self.low), per_share(self.high)))
    }
}

/// `multiple * net income / shares`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeMultiple {
    /// Low multiple.
    pub low: f64,
    /// High multiple.
    pub high: f64,
}

impl ValuationMethod for PeMultiple {
    fn method(&self) -> RangeMethod {
        RangeMethod::PriceEarnings
    }

    fn band(&self, inputs: &FieldInputs) -> Result<ValuationBand, ModelError> {
        let net_income = inputs.net_income.ok_or(ModelError::MissingLineItem(LineItem::NetIncome))?;
        let eps = net_income / inputs.shares()?;
        Ok(ValuationBand::new(self.method(), self.low * eps, self.high * eps))
    }
}

/// Bands from every method that could be computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FootballField {
    /// Computed bands, in method order.
    pub bands: Vec<ValuationBand>,
    /// Methods left out and why.
    pub omitted: Vec<(RangeMethod, ModelError)>,
    /// Bridge substitutions behind the DCF and EV/EBITDA bands.
    pub warnings: Vec<BridgeWarning>,
}

impl FootballField {
    /// Evaluate `methods`, omitting any that fail or give a non-finite band.
    #[must_use]
    pub fn build(inputs: &FieldInputs, methods: &[&dyn ValuationMethod]) -> Self {
        let mut field = Self::default();
        for m in methods {
            match m.band(inputs) {
                Ok(band) if band.low().is_finite() && band.high().is_finite() => {
                    if matches!(band.method, RangeMethod::Dcf | RangeMethod::EvEbitda)
                        && field.warnings.is_empty()
                    {
                        field.warnings = inputs.position.net_cash().1;
                    }
                    field.bands.push(band);
                }
                Ok(band) => field.omitted.push((
                    m.method(),
                    ModelError::InvalidAssumption(format!(
                        "non-finite band ({}, {})",
                        band.low(),
                        band.high()
                    )),
                )),
                Err(e) => field.omitted.push((m.method(), e)),
            }
        }
        field
    }

    /// Band for `method`, if computed.
    #[must_use]
    pub fn band(&self, method: RangeMethod) -> Option<&ValuationBand> {
        self.bands.iter().find(|b| b.method == method)
    }

    /// Lowest and highest bound across all bands.
    #[must_use]
    pub fn span(&self) -> Option<(f64, f64)> {
        self.bands.iter().fold(None, |acc, b| match acc {
            None => Some((b.low(), b.high())),
            Some((lo, hi)) => Some((lo.min(b.low()), hi.max(b.high()))),
        })
    }
}

/// Football field with the DCF, EV/EBITDA and P/E methods from `config`.
///
/// # Errors
/// Returns `ModelError::InvalidAssumption` if `config` is invalid. Missing
/// inputs never fail; the affected method is listed in `omitted`.
pub fn football_field(
    inputs: &FieldInputs,
    config: &MultiplesConfig,
) -> Result<FootballField, ModelError> {
    config.validate()?;
    let dcf = DcfRange { low: config.dcf_quantiles.0, high: config.dcf_quantiles.1 };
    let ev = EvEbitdaMultiple { low: config.ev_ebitda.0, high: config.ev_ebitda.1 };
    let pe = PeMultiple { low: config.pe.0, high: config.pe.1 };
    Ok(FootballField::build(inputs, &[&dcf, &ev, &pe]))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use fairvalue_math::MathError;
    use fairvalue_primitives::{Assumptions, Statement, TimeSeries};
    use rstest::rstest;

    use super::*;
    use crate::{DcfModel, GridSpec, valuation::tests::sample_financials};

    fn inputs() -> FieldInputs {
        FieldInputs {
            dcf_per_share: (1..=9).map(f64::from).collect(),
            ebitda: Some(100.0),
            net_income: Some(50.0),
            shares: Some(10.0),
            position: BalancePosition::new(20.0, 70.0),
        }
    }

    #[test]
    fn three_bands() {
        let field = football_field(&inputs(), &MultiplesConfig::default()).unwrap();
        assert_eq!(field.bands.len(), 3);
        assert!(field.omitted.is_empty());

        let dcf = field.band(RangeMethod::Dcf).unwrap();
        assert_relative_eq!(dcf.low(), 3.0);
        assert_relative_eq!(dcf.high(), 7.0);

        let ev = field.band(RangeMethod::EvEbitda).unwrap();
        assert_relative_eq!(ev.low(), (1000.0 - 50.0) / 10.0);
        assert_relative_eq!(ev.high(), (1600.0 - 50.0) / 10.0);

        let pe = field.band(RangeMethod::PriceEarnings).unwrap();
        assert_relative_eq!(pe.low(), 90.0);
        assert_relative_eq!(pe.high(), 140.0);
    }

    #[rstest]
    #[case((16.0, 10.0), (28.0, 18.0))]
    #[case((10.0, 16.0), (28.0, 18.0))]
    #[case((-4.0, 3.0), (5.0, -5.0))]
    fn bands_are_ordered(#[case] ev_ebitda: (f64, f64), #[case] pe: (f64, f64)) {
        let config = MultiplesConfig { ev_ebitda, pe, dcf_quantiles: (0.75, 0.25) };
        let field = football_field(&inputs(), &config).unwrap();
        for band in &field.bands {
            assert!(band.low() <= band.high());
        }
    }

    #[test]
    fn missing_ebitda_omits_only_that_band() {
        let i = FieldInputs { ebitda: None, ..inputs() };
        let field = football_field(&i, &MultiplesConfig::default()).unwrap();
        assert_eq!(field.bands.len(), 2);
        assert!(field.band(RangeMethod::EvEbitda).is_none());
        assert_eq!(
            field.omitted,
            vec![(RangeMethod::EvEbitda, ModelError::MissingLineItem(LineItem::Ebitda))]
        );
    }

    #[test]
    fn missing_shares_omits_multiple_bands() {
        let i = FieldInputs { shares: None, ..inputs() };
        let field = football_field(&i, &MultiplesConfig::default()).unwrap();
        assert_eq!(field.bands.len(), 1);
        assert_eq!(field.bands[0].method, RangeMethod::Dcf);
        assert!(field.omitted.iter().all(|(_, e)| *e == ModelError::ShareCountUnavailable));
    }

    #[test]
    fn empty_grid_omits_dcf() {
        let i = FieldInputs { dcf_per_share: vec![], ..inputs() };
        let field = football_field(&i, &MultiplesConfig::default()).unwrap();
        assert_eq!(
            field.omitted,
            vec![(RangeMethod::Dcf, ModelError::Math(MathError::EmptyData))]
        );
    }

    #[test]
    fn missing_debt_is_flagged() {
        let i = FieldInputs { position: BalancePosition { cash: Some(20.0), debt: None }, ..inputs() };
        let field = football_field(&i, &MultiplesConfig::default()).unwrap();
        assert_eq!(field.warnings, vec![BridgeWarning::MissingDebt]);
    }

    #[test]
    fn dcf_band_alone_carries_bridge_warnings() {
        let i = FieldInputs {
            ebitda: None,
            net_income: None,
            position: BalancePosition { cash: None, debt: None },
            ..inputs()
        };
        let field = football_field(&i, &MultiplesConfig::default()).unwrap();
        assert_eq!(field.bands.len(), 1);
        assert_eq!(field.bands[0].method, RangeMethod::Dcf);
        assert_eq!(field.warnings, vec![BridgeWarning::MissingCash, BridgeWarning::MissingDebt]);
    }

    #[test]
    fn model_without_balance_sheet_flags_dcf_range() {
        let mut fin = sample_financials();
        fin.balance = Statement::new();
        fin.income = Statement::new().with(
            "Total Revenue",
            TimeSeries::from_values([(2021, 1000.0), (2022, 1100.0), (2023, 1210.0)]),
        );
        let model = DcfModel::new(&fin, Assumptions::default()).unwrap();
        let grid = model.sensitivity(&GridSpec::default()).unwrap();
        let field = model.football_field(Some(&grid), &MultiplesConfig::default()).unwrap();

        assert!(field.band(RangeMethod::Dcf).is_some());
        assert_eq!(field.omitted.len(), 2);
        assert_eq!(field.warnings, grid.warnings);
        assert_eq!(field.warnings, vec![BridgeWarning::MissingCash, BridgeWarning::MissingDebt]);
    }

    #[test]
    fn no_bridge_band_no_warnings() {
        let i = FieldInputs {
            dcf_per_share: vec![],
            ebitda: None,
            position: BalancePosition { cash: None, debt: None },
            ..inputs()
        };
        let field = football_field(&i, &MultiplesConfig::default()).unwrap();
        assert_eq!(field.bands.len(), 1);
        assert_eq!(field.bands[0].method, RangeMethod::PriceEarnings);
        assert!(field.warnings.is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = MultiplesConfig { dcf_quantiles: (0.25, 1.5), ..MultiplesConfig::default() };
        assert!(football_field(&inputs(), &config).is_err());
        let config = MultiplesConfig { pe: (f64::NAN, 20.0), ..MultiplesConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_model_grid() {
        let model = DcfModel::new(&sample_financials(), Assumptions::default()).unwrap();
        let grid = model.sensitivity(&GridSpec::default()).unwrap();
        let field = model.football_field(Some(&grid), &MultiplesConfig::default()).unwrap();
        assert_eq!(field.bands.len(), 3);
        let (lo, hi) = field.span().unwrap();
        assert!(lo <= hi);

        let dcf = field.band(RangeMethod::Dcf).unwrap();
        let values = grid.finite_values();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(dcf.low() >= min && dcf.high() <= max);
    }
}
