//! Modeling assumptions for a single valuation run.

use serde::{Deserialize, Serialize};

/// How depreciation, capex and working capital are projected.
///
/// The two conventions give materially different cash flows for the same
/// company, so the choice is always explicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapitalConvention {
    /// Depreciation and capex are shares of revenue; ΔNWC is the NWC share
    /// times the change in revenue.
    #[default]
    PercentOfRevenue,
    /// Net fixed assets and the NWC balance are projected as shares of
    /// revenue. Depreciation is a share of same-year net fixed assets, capex
    /// a multiple of the change in net fixed assets, and ΔNWC the change in
    /// the projected NWC balance.
    BalanceSheet,
}

impl std::fmt::Display for CapitalConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PercentOfRevenue => write!(f, "percent-of-revenue"),
            Self::BalanceSheet => write!(f, "balance-sheet"),
        }
    }
}

/// Inputs to one valuation run. All rates are decimals (`0.12` for 12%).
///
/// Drivers held as `Option` are overrides: `Some` takes precedence over the
/// value derived from history, `None` falls back to the historical mean.
/// The struct is `Copy`; perturbed runs build a modified copy rather than
/// mutating a shared instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Number of forecast years (at least one).
    pub horizon: u32,
    /// Annual revenue growth override.
    pub revenue_growth: Option<f64>,
    /// EBIT margin override.
    pub ebit_margin: Option<f64>,
    /// Tax rate applied to EBIT.
    pub tax_rate: f64,
    /// Depreciation override: share of revenue, or of same-year net fixed
    /// assets under [`CapitalConvention::BalanceSheet`].
    pub depreciation_pct: Option<f64>,
    /// Capex override: share of revenue, or multiple of the change in net
    /// fixed assets under [`CapitalConvention::BalanceSheet`].
    pub capex_pct: Option<f64>,
    /// Net working capital as a share of revenue override.
    pub nwc_pct: Option<f64>,
    /// Net fixed assets as a share of revenue override (balance-sheet
    /// convention only).
    pub fixed_assets_pct: Option<f64>,
    /// Discount rate (WACC).
    pub discount_rate: f64,
    /// Perpetual growth rate after the horizon.
    pub terminal_growth: f64,
    /// Share count override.
    pub shares_override: Option<f64>,
    /// Capex / working-capital projection convention.
    pub convention: CapitalConvention,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            horizon: 5,
            revenue_growth: Some(0.10),
            ebit_margin: Some(0.15),
            tax_rate: 0.25,
            depreciation_pct: Some(0.06),
            capex_pct: Some(0.08),
            nwc_pct: Some(0.10),
            fixed_assets_pct: None,
            discount_rate: 0.12,
            terminal_growth: 0.03,
            shares_override: None,
            convention: CapitalConvention::PercentOfRevenue,
        }
    }
}

impl Assumptions {
    /// Defaults with every overridable driver derived from history.
    #[must_use]
    pub fn from_history() -> Self {
        Self {
            revenue_growth: None,
            ebit_margin: None,
            depreciation_pct: None,
            capex_pct: None,
            nwc_pct: None,
            fixed_assets_pct: None,
            ..Self::default()
        }
    }

    /// Copy with a different discount rate and terminal growth.
    #[must_use]
    pub const fn with_rates(self, discount_rate: f64, terminal_growth: f64) -> Self {
        Self { discount_rate, terminal_growth, ..self }
    }

    /// Copy with a different horizon.
    #[must_use]
    pub const fn with_horizon(self, horizon: u32) -> Self {
        Self { horizon, ..self }
    }

    /// Copy with a different capital convention.
    ///
    /// The depreciation and capex overrides are measured against different
    /// bases under each convention, so switching convention clears them and
    /// both fall back to history. Set them again after switching to override.
    #[must_use]
    pub const fn with_convention(self, convention: CapitalConvention) -> Self {
        let unchanged = matches!(
            (self.convention, convention),
            (CapitalConvention::PercentOfRevenue, CapitalConvention::PercentOfRevenue)
                | (CapitalConvention::BalanceSheet, CapitalConvention::BalanceSheet)
        );
        if unchanged {
            return self;
        }
        Self { convention, depreciation_pct: None, capex_pct: None, ..self }
    }

    /// Copy with a share count override.
    #[must_use]
    pub const fn with_shares(self, shares: f64) -> Self {
        Self { shares_override: Some(shares), ..self }
    }

    /// Whether the Gordon-growth terminal value is defined (`r > g`).
    #[must_use]
    pub fn has_defined_terminal_value(&self) -> bool {
        self.discount_rate > self.terminal_growth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard() {
        let a = Assumptions::default();
        assert_eq!(a.horizon, 5);
        assert_eq!(a.revenue_growth, Some(0.10));
        assert_eq!(a.tax_rate, 0.25);
        assert_eq!(a.discount_rate, 0.12);
        assert_eq!(a.terminal_growth, 0.03);
        assert_eq!(a.convention, CapitalConvention::PercentOfRevenue);
    }

    #[test]
    fn from_history_clears_overrides() {
        let a = Assumptions::from_history();
        assert!(a.revenue_growth.is_none());
        assert!(a.ebit_margin.is_none());
        assert!(a.nwc_pct.is_none());
        assert_eq!(a.tax_rate, 0.25);
    }

    #[test]
    fn with_rates_leaves_original_untouched() {
        let base = Assumptions::default();
        let bumped = base.with_rates(0.08, 0.02);
        assert_eq!(base.discount_rate, 0.12);
        assert_eq!(bumped.discount_rate, 0.08);
        assert_eq!(bumped.terminal_growth, 0.02);
        assert_eq!(bumped.revenue_growth, base.revenue_growth);
    }

    #[test]
    fn switching_convention_clears_capital_overrides() {
        let a = Assumptions::default().with_convention(CapitalConvention::BalanceSheet);
        assert_eq!(a.convention, CapitalConvention::BalanceSheet);
        assert!(a.depreciation_pct.is_none());
        assert!(a.capex_pct.is_none());
        assert_eq!(a.nwc_pct, Some(0.10));
        assert_eq!(a.revenue_growth, Some(0.10));

        let kept = Assumptions::default().with_convention(CapitalConvention::PercentOfRevenue);
        assert_eq!(kept, Assumptions::default());

        let explicit = Assumptions { capex_pct: Some(1.5), ..a }
            .with_convention(CapitalConvention::BalanceSheet);
        assert_eq!(explicit.capex_pct, Some(1.5));
    }

    #[test]
    fn terminal_value_definedness() {
        assert!(Assumptions::default().has_defined_terminal_value());
        assert!(!Assumptions::default().with_rates(0.05, 0.05).has_defined_terminal_value());
    }
}
