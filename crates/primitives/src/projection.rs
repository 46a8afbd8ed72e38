//! Forecast schedule rows.

use serde::{Deserialize, Serialize};

use crate::FiscalYear;

/// One projected year before discounting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastYear {
    /// Fiscal year.
    pub year: FiscalYear,
    /// Period index, 1 for the first forecast year.
    pub period: u32,
    /// Revenue.
    pub revenue: f64,
    /// EBIT (operating income).
    pub ebit: f64,
    /// EBIT after tax.
    pub nopat: f64,
    /// Depreciation.
    pub depreciation: f64,
    /// Capital expenditure (positive outflow).
    pub capex: f64,
    /// Increase in net working capital.
    pub delta_nwc: f64,
    /// Free cash flow to the firm.
    pub fcff: f64,
}

impl ForecastYear {
    /// `NOPAT + depreciation - capex - ΔNWC`.
    #[must_use]
    pub fn free_cash_flow(nopat: f64, depreciation: f64, capex: f64, delta_nwc: f64) -> f64 {
        nopat + depreciation - capex - delta_nwc
    }
}

/// A forecast year together with its discounting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Fiscal year.
    pub year: FiscalYear,
    /// Period index, 1 for the first forecast year.
    pub period: u32,
    /// Revenue.
    pub revenue: f64,
    /// EBIT (operating income).
    pub ebit: f64,
    /// EBIT after tax.
    pub nopat: f64,
    /// Depreciation.
    pub depreciation: f64,
    /// Capital expenditure (positive outflow).
    pub capex: f64,
    /// Increase in net working capital.
    pub delta_nwc: f64,
    /// Free cash flow to the firm.
    pub fcff: f64,
    /// `(1 + r)^-period`.
    pub discount_factor: f64,
    /// `fcff * discount_factor`.
    pub pv_fcff: f64,
}

impl ProjectionRow {
    /// Attach a discount factor to a forecast year.
    #[must_use]
    pub fn discounted(f: ForecastYear, discount_factor: f64) -> Self {
        Self {
            year: f.year,
            period: f.period,
            revenue: f.revenue,
            ebit: f.ebit,
            nopat: f.nopat,
            depreciation: f.depreciation,
            capex: f.capex,
            delta_nwc: f.delta_nwc,
            fcff: f.fcff,
            discount_factor,
            pv_fcff: f.fcff * discount_factor,
        }
    }
}
