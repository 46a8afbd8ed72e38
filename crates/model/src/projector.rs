//! Forecast projection.

use fairvalue_primitives::{
    Assumptions, CapitalConvention, CompanyFinancials, FiscalYear, ForecastYear, LineItem,
    TimeSeries,
};
use serde::{Deserialize, Serialize};

use crate::{HistoricalRatios, ModelError, Ratio};

/// Resolved per-year drivers for a projection.
///
/// Every driver is either the caller's override or the historical mean.
/// How `depreciation` and `capex` are read depends on `convention`:
///
/// | convention | depreciation | capex |
/// |---|---|---|
/// | `PercentOfRevenue` | share of revenue | share of revenue |
/// | `BalanceSheet` | share of net fixed assets | multiple of the change in net fixed assets |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drivers {
    /// Constant revenue growth rate.
    pub revenue_growth: f64,
    /// EBIT / revenue.
    pub ebit_margin: f64,
    /// Tax rate applied to EBIT.
    pub tax_rate: f64,
    /// Depreciation ratio.
    pub depreciation: f64,
    /// Capex ratio.
    pub capex: f64,
    /// Net working capital / revenue.
    pub nwc: f64,
    /// Net fixed assets / revenue, used by the balance-sheet convention only.
    pub fixed_assets: Option<f64>,
    /// Capital convention.
    pub convention: CapitalConvention,
}

impl Drivers {
    /// Resolve drivers, letting each override win over history.
    ///
    /// # Errors
    /// Propagates `InsufficientHistory` or `MissingLineItem` for any driver
    /// that has no override and cannot be derived.
    pub fn resolve(ratios: &HistoricalRatios, a: &Assumptions) -> Result<Self, ModelError> {
        let pick = |value: Option<f64>, ratio: Ratio| match value {
            Some(v) => Ok(v),
            None => ratios.get(ratio),
        };

        let (depreciation, capex, fixed_assets) = match a.convention {
            CapitalConvention::PercentOfRevenue => (
                pick(a.depreciation_pct, Ratio::DepreciationToRevenue)?,
                pick(a.capex_pct, Ratio::CapexToRevenue)?,
                a.fixed_assets_pct,
            ),
            CapitalConvention::BalanceSheet => (
                pick(a.depreciation_pct, Ratio::DepreciationToFixedAssets)?,
                pick(a.capex_pct, Ratio::CapexToFixedAssetChange)?,
                Some(pick(a.fixed_assets_pct, Ratio::FixedAssetsToRevenue)?),
            ),
        };

        Ok(Self {
            revenue_growth: pick(a.revenue_growth, Ratio::RevenueGrowth)?,
            ebit_margin: pick(a.ebit_margin, Ratio::EbitMargin)?,
            tax_rate: a.tax_rate,
            depreciation,
            capex,
            nwc: pick(a.nwc_pct, Ratio::NwcToRevenue)?,
            fixed_assets,
            convention: a.convention,
        })
    }

    /// Replace the revenue growth rate.
    #[must_use]
    pub const fn with_revenue_growth(mut self, g: f64) -> Self {
        self.revenue_growth = g;
        self
    }

    /// Replace the EBIT margin.
    #[must_use]
    pub const fn with_ebit_margin(mut self, m: f64) -> Self {
        self.ebit_margin = m;
        self
    }

    /// Replace the tax rate.
    #[must_use]
    pub const fn with_tax_rate(mut self, t: f64) -> Self {
        self.tax_rate = t;
        self
    }
}

/// Last historical values the projection starts from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBase {
    /// Latest revenue year; forecasts start the year after.
    pub year: FiscalYear,
    /// Latest revenue.
    pub revenue: f64,
    /// Latest net fixed assets, if reported.
    pub fixed_assets: Option<f64>,
    /// Latest current assets minus current liabilities, if both reported.
    pub nwc: Option<f64>,
}

impl ProjectionBase {
    /// Base with revenue only.
    #[must_use]
    pub const fn new(year: FiscalYear, revenue: f64) -> Self {
        Self { year, revenue, fixed_assets: None, nwc: None }
    }

    /// Take the latest reported values.
    ///
    /// # Errors
    /// Returns `ModelError::MissingLineItem` if no revenue is reported.
    pub fn from_financials(financials: &CompanyFinancials) -> Result<Self, ModelError> {
        let (year, revenue) = financials
            .latest(LineItem::Revenue)
            .ok_or(ModelError::MissingLineItem(LineItem::Revenue))?;
        let latest = |item| financials.latest(item).map(|(_, v)| v);
        let nwc = latest(LineItem::CurrentAssets)
            .zip(latest(LineItem::CurrentLiabilities))
            .map(|(ca, cl)| ca - cl);
        Ok(Self { year, revenue, fixed_assets: latest(LineItem::NetFixedAssets), nwc })
    }
}

/// A projected schedule and the base it grew from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Starting point.
    pub base: ProjectionBase,
    /// One entry per forecast year, in order.
    pub years: Vec<ForecastYear>,
}

impl Forecast {
    /// Number of forecast years.
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.years.len()
    }

    /// Last forecast year.
    #[must_use]
    pub fn last(&self) -> Option<&ForecastYear> {
        self.years.last()
    }

    /// Historical revenue followed by the forecast.
    ///
    /// Returns `None` if the forecast does not start after the history ends.
    #[must_use]
    pub fn revenue_series(&self, history: &TimeSeries) -> Option<TimeSeries> {
        history.extended(self.years.iter().map(|y| (y.year, y.revenue)))
    }
}

/// Project `horizon` years forward from `base`.
///
/// Revenue grows at a constant rate from the last historical value, and
/// forecast years run from `base.year + 1` to `base.year + horizon`.
///
/// # Errors
/// Returns `ModelError::InvalidAssumption` if `horizon < 1`, or if the
/// balance-sheet convention is selected without a fixed-asset ratio.
pub fn project(base: ProjectionBase, d: &Drivers, horizon: u32) -> Result<Forecast, ModelError> {
    if horizon < 1 {
        return Err(ModelError::InvalidAssumption("horizon must be at least 1 year".to_string()));
    }

    let mut years = Vec::with_capacity(horizon as usize);
    let mut prev_revenue = base.revenue;

    match d.convention {
        CapitalConvention::PercentOfRevenue => {
            for period in 1..=horizon {
                let revenue = prev_revenue * (1.0 + d.revenue_growth);
                let depreciation = revenue * d.depreciation;
                let capex = revenue * d.capex;
                let delta_nwc = d.nwc * (revenue - prev_revenue);
                years.push(row(base.year, period, revenue, d, depreciation, capex, delta_nwc));
                prev_revenue = revenue;
            }
        }
        CapitalConvention::BalanceSheet => {
            let fa_ratio = d.fixed_assets.ok_or_else(|| {
                ModelError::InvalidAssumption(
                    "balance-sheet convention needs a fixed assets ratio".to_string(),
                )
            })?;
            let mut prev_fa = base.fixed_assets.unwrap_or(fa_ratio * base.revenue);
            let mut prev_nwc = base.nwc.unwrap_or(d.nwc * base.revenue);
            for period in 1..=horizon {
                let revenue = prev_revenue * (1.0 + d.revenue_growth);
                let fixed_assets = fa_ratio * revenue;
                let nwc = d.nwc * revenue;
                let depreciation = d.depreciation * fixed_assets;
                let capex = d.capex * (fixed_assets - prev_fa);
                years.push(row(base.year, period, revenue, d, depreciation, capex, nwc - prev_nwc));
                prev_revenue = revenue;
                prev_fa = fixed_assets;
                prev_nwc = nwc;
            }
        }
    }

    Ok(Forecast { base, years })
}

fn row(
    last_year: FiscalYear,
    period: u32,
    revenue: f64,
    d: &Drivers,
    depreciation: f64,
    capex: f64,
    delta_nwc: f64,
) -> ForecastYear {
    let ebit = revenue * d.ebit_margin;
    let nopat = ebit * (1.0 - d.tax_rate);
    ForecastYear {
        year: last_year.offset(period as i32),
        period,
        revenue,
        ebit,
        nopat,
        depreciation,
        capex,
        delta_nwc,
        fcff: ForecastYear::free_cash_flow(nopat, depreciation, capex, delta_nwc),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn drivers() -> Drivers {
        Drivers {
            revenue_growth: 0.10,
            ebit_margin: 0.20,
            tax_rate: 0.25,
            depreciation: 0.05,
            capex: 0.08,
            nwc: 0.10,
            fixed_assets: None,
            convention: CapitalConvention::PercentOfRevenue,
        }
    }

    #[test]
    fn nopat_from_margin_and_tax() {
        // revenue 1000 in the first forecast year
        let base = ProjectionBase::new(FiscalYear(2023), 1000.0 / 1.1);
        let f = project(base, &drivers(), 1).unwrap();
        let y = f.years[0];
        assert_relative_eq!(y.revenue, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(y.nopat, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn constant_growth_from_last_revenue() {
        let base = ProjectionBase::new(FiscalYear(2023), 100.0);
        let f = project(base, &drivers(), 3).unwrap();
        let revenue: Vec<f64> = f.years.iter().map(|y| y.revenue).collect();
        assert_relative_eq!(revenue[0], 110.0, epsilon = 1e-9);
        assert_relative_eq!(revenue[1], 121.0, epsilon = 1e-9);
        assert_relative_eq!(revenue[2], 133.1, epsilon = 1e-9);
        assert_eq!(f.years[0].year, FiscalYear(2024));
        assert_eq!(f.years[2].year, FiscalYear(2026));
        assert_eq!(f.years[2].period, 3);
    }

    #[test]
    fn fcff_identity() {
        let base = ProjectionBase::new(FiscalYear(2023), 100.0);
        let f = project(base, &drivers(), 1).unwrap();
        let y = f.years[0];
        // 110 revenue: NOPAT 16.5, dep 5.5, capex 8.8, dNWC 1.0
        assert_relative_eq!(y.delta_nwc, 1.0, epsilon = 1e-9);
        assert_relative_eq!(y.fcff, 16.5 + 5.5 - 8.8 - 1.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    #[case(10)]
    fn schedule_length_matches_horizon(#[case] n: u32) {
        let base = ProjectionBase::new(FiscalYear(2023), 100.0);
        assert_eq!(project(base, &drivers(), n).unwrap().horizon(), n as usize);
    }

    #[test]
    fn zero_horizon_rejected() {
        let base = ProjectionBase::new(FiscalYear(2023), 100.0);
        assert!(matches!(project(base, &drivers(), 0), Err(ModelError::InvalidAssumption(_))));
    }

    #[test]
    fn balance_sheet_convention_differences_balances() {
        let d = Drivers {
            depreciation: 0.10,
            capex: 1.5,
            fixed_assets: Some(0.5),
            convention: CapitalConvention::BalanceSheet,
            ..drivers()
        };
        let base = ProjectionBase {
            year: FiscalYear(2023),
            revenue: 100.0,
            fixed_assets: Some(50.0),
            nwc: Some(8.0),
        };
        let f = project(base, &d, 2).unwrap();
        let y1 = f.years[0];
        // NFA 55, NWC balance 11
        assert_relative_eq!(y1.depreciation, 5.5, epsilon = 1e-9);
        assert_relative_eq!(y1.capex, 7.5, epsilon = 1e-9);
        assert_relative_eq!(y1.delta_nwc, 3.0, epsilon = 1e-9);
        let y2 = f.years[1];
        // NFA 60.5, NWC balance 12.1
        assert_relative_eq!(y2.capex, 8.25, epsilon = 1e-9);
        assert_relative_eq!(y2.delta_nwc, 1.1, epsilon = 1e-9);
    }

    #[test]
    fn balance_sheet_convention_needs_fixed_assets() {
        let d = Drivers { convention: CapitalConvention::BalanceSheet, ..drivers() };
        let base = ProjectionBase::new(FiscalYear(2023), 100.0);
        assert!(matches!(project(base, &d, 1), Err(ModelError::InvalidAssumption(_))));
    }

    #[test]
    fn revenue_series_appends_forecast() {
        let history = TimeSeries::from_values([(2022, 90.0), (2023, 100.0)]);
        let base = ProjectionBase::new(FiscalYear(2023), 100.0);
        let f = project(base, &drivers(), 2).unwrap();
        let s = f.revenue_series(&history).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.latest().map(|(y, _)| y), Some(FiscalYear(2025)));
    }
}
