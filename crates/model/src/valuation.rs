//! Full DCF runs over one company's history.

use std::ops::RangeInclusive;

use fairvalue_primitives::{
    Assumptions, CompanyFinancials, FiscalYear, LineItem, Symbol, TimeSeries, ValuationResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    BalancePosition, DiscountedCashFlows, Drivers, FieldInputs, FootballField, Forecast,
    GridSpec, HistoricalRatios, ModelError, MultiplesConfig, ProjectionBase, SensitivityGrid,
    Sweep, SweepFactor, SweepSpec, ValidationBounds, bridge_to_equity, discount_cash_flows,
    extract_ratios, extract_ratios_in, football_field, project, resolve_shares,
    sensitivity_grid, sweep,
};

/// Everything produced by one valuation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRun {
    /// Assumptions the run used.
    pub assumptions: Assumptions,
    /// Drivers after resolving overrides against history.
    pub drivers: Drivers,
    /// Undiscounted forecast.
    pub forecast: Forecast,
    /// Discounted schedule and enterprise value.
    pub discounted: DiscountedCashFlows,
    /// Enterprise, equity and per-share values.
    pub result: ValuationResult,
}

/// DCF model over one company's historical base.
///
/// The historical inputs (ratios, latest balances, share count) are
/// extracted once at construction. Every run then takes its own
/// [`Assumptions`] and recomputes the projection from that base; nothing
/// is cached between runs, so results do not depend on call order.
///
/// # Example
///
/// ```no_run
/// use fairvalue_model::DcfModel;
/// use fairvalue_primitives::{Assumptions, CompanyFinancials};
///
/// # fn demo(financials: CompanyFinancials) -> Result<(), fairvalue_model::ModelError> {
/// let model = DcfModel::new(&financials, Assumptions::default())?;
/// let run = model.run()?;
/// println!("{:.2} per share", run.result.per_share);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DcfModel {
    symbol: Symbol,
    assumptions: Assumptions,
    bounds: ValidationBounds,
    ratios: HistoricalRatios,
    base: ProjectionBase,
    revenue_history: TimeSeries,
    position: BalancePosition,
    provider_shares: Option<f64>,
    ebitda: Option<f64>,
    net_income: Option<f64>,
    price: Option<f64>,
}

impl DcfModel {
    /// Build a model from all reported years.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidAssumption` if `assumptions` fail
    /// validation, and `ModelError::MissingLineItem` if no revenue is reported.
    pub fn new(financials: &CompanyFinancials, assumptions: Assumptions) -> Result<Self, ModelError> {
        let ratios = extract_ratios(financials)?;
        Self::with_ratios(financials, ratios, assumptions, ValidationBounds::default())
    }

    /// Build a model whose ratios use only the years in `years`.
    ///
    /// The projection still starts from the latest reported revenue.
    ///
    /// # Errors
    /// See [`DcfModel::new`].
    pub fn new_in(
        financials: &CompanyFinancials,
        years: RangeInclusive<FiscalYear>,
        assumptions: Assumptions,
    ) -> Result<Self, ModelError> {
        let ratios = extract_ratios_in(financials, years)?;
        Self::with_ratios(financials, ratios, assumptions, ValidationBounds::default())
    }

    /// Build a model from pre-extracted ratios and custom validation bounds.
    ///
    /// # Errors
    /// See [`DcfModel::new`].
    pub fn with_ratios(
        financials: &CompanyFinancials,
        ratios: HistoricalRatios,
        assumptions: Assumptions,
        bounds: ValidationBounds,
    ) -> Result<Self, ModelError> {
        bounds.check(&assumptions)?;
        let base = ProjectionBase::from_financials(financials)?;
        let revenue_history = financials.series(LineItem::Revenue).cloned().unwrap_or_default();
        let position = BalancePosition::from_financials(financials);
        if position.cash.is_none() || position.debt.is_none() {
            warn!(
                symbol = %financials.symbol,
                cash = position.cash.is_some(),
                debt = position.debt.is_some(),
                "incomplete balance position, missing terms will be treated as zero"
            );
        }

        let latest = |item| financials.latest(item).map(|(_, v)| v);
        Ok(Self {
            symbol: financials.symbol.clone(),
            assumptions,
            bounds,
            ratios,
            base,
            revenue_history,
            position,
            provider_shares: financials.provider_shares(),
            ebitda: latest(LineItem::Ebitda).or_else(|| latest(LineItem::Ebit)),
            net_income: latest(LineItem::NetIncome),
            price: financials.facts.price,
        })
    }

    /// Company symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Default assumptions of this model.
    #[must_use]
    pub const fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Historical ratios.
    #[must_use]
    pub const fn ratios(&self) -> &HistoricalRatios {
        &self.ratios
    }

    /// Projection starting point.
    #[must_use]
    pub const fn base(&self) -> &ProjectionBase {
        &self.base
    }

    /// Historical revenue.
    #[must_use]
    pub const fn revenue_history(&self) -> &TimeSeries {
        &self.revenue_history
    }

    /// Latest cash and debt.
    #[must_use]
    pub const fn position(&self) -> &BalancePosition {
        &self.position
    }

    /// Share count reported by the provider.
    #[must_use]
    pub const fn provider_shares(&self) -> Option<f64> {
        self.provider_shares
    }

    /// Latest EBITDA, falling back to EBIT.
    #[must_use]
    pub const fn latest_ebitda(&self) -> Option<f64> {
        self.ebitda
    }

    /// Latest net income.
    #[must_use]
    pub const fn latest_net_income(&self) -> Option<f64> {
        self.net_income
    }

    /// Current market price, if the provider reported one.
    #[must_use]
    pub const fn price(&self) -> Option<f64> {
        self.price
    }

    /// Resolve drivers for `a`.
    ///
    /// # Errors
    /// See [`Drivers::resolve`].
    pub fn drivers(&self, a: &Assumptions) -> Result<Drivers, ModelError> {
        Drivers::resolve(&self.ratios, a)
    }

    /// Share count for `a`.
    ///
    /// # Errors
    /// Returns `ModelError::ShareCountUnavailable` if none is positive.
    pub fn shares(&self, a: &Assumptions) -> Result<f64, ModelError> {
        resolve_shares(a.shares_override, self.provider_shares)
    }

    /// Project and discount without bridging to equity.
    ///
    /// # Errors
    /// Propagates validation, driver, projection and discounting errors.
    pub fn run_enterprise(
        &self,
        a: &Assumptions,
    ) -> Result<(Drivers, Forecast, DiscountedCashFlows), ModelError> {
        self.bounds.check(a)?;
        let drivers = self.drivers(a)?;
        let forecast = project(self.base, &drivers, a.horizon)?;
        let discounted = discount_cash_flows(&forecast, a.discount_rate, a.terminal_growth)?;
        Ok((drivers, forecast, discounted))
    }

    /// Full run under `a`.
    ///
    /// # Errors
    /// Propagates any stage's error; see [`ModelError`].
    pub fn run_with(&self, a: &Assumptions) -> Result<ValuationRun, ModelError> {
        let (drivers, forecast, discounted) = self.run_enterprise(a)?;
        let bridge = bridge_to_equity(
            discounted.enterprise_value,
            &self.position,
            a.shares_override,
            self.provider_shares,
        )?;

        let result = ValuationResult {
            pv_explicit: discounted.pv_explicit,
            terminal_value: discounted.terminal_value,
            pv_terminal_value: discounted.pv_terminal_value,
            enterprise_value: discounted.enterprise_value,
            equity_value: bridge.equity_value,
            shares: bridge.shares,
            per_share: bridge.per_share,
            warnings: bridge.warnings,
        };
        debug!(
            symbol = %self.symbol,
            discount_rate = a.discount_rate,
            terminal_growth = a.terminal_growth,
            per_share = result.per_share,
            "valuation run"
        );
        Ok(ValuationRun { assumptions: *a, drivers, forecast, discounted, result })
    }

    /// Full run under the model's own assumptions.
    ///
    /// # Errors
    /// See [`DcfModel::run_with`].
    pub fn run(&self) -> Result<ValuationRun, ModelError> {
        self.run_with(&self.assumptions)
    }

    /// Per-share value under `a`.
    ///
    /// # Errors
    /// See [`DcfModel::run_with`].
    pub fn per_share_with(&self, a: &Assumptions) -> Result<f64, ModelError> {
        self.run_with(a).map(|run| run.result.per_share)
    }

    /// Discount-rate by terminal-growth grid around the model's assumptions.
    ///
    /// # Errors
    /// See [`sensitivity_grid`].
    pub fn sensitivity(&self, spec: &GridSpec) -> Result<SensitivityGrid, ModelError> {
        sensitivity_grid(self, &self.assumptions, spec)
    }

    /// One-way sweep around the model's assumptions.
    ///
    /// # Errors
    /// See [`sweep`].
    pub fn sweep(&self, spec: &SweepSpec) -> Result<Sweep, ModelError> {
        sweep(self, &self.assumptions, spec)
    }

    /// Growth and margin sweeps centred on the resolved drivers.
    ///
    /// # Errors
    /// Propagates driver resolution errors.
    pub fn default_sweeps(&self) -> Result<Vec<SweepSpec>, ModelError> {
        let d = self.drivers(&self.assumptions)?;
        Ok(vec![
            SweepSpec::around(SweepFactor::RevenueGrowth, d.revenue_growth, 0.10)
                .clamped(-0.5, f64::INFINITY),
            SweepSpec::around(SweepFactor::EbitMargin, d.ebit_margin, 0.05).clamped(-0.2, 0.7),
        ])
    }

    /// Inputs for the football field from a sensitivity grid.
    #[must_use]
    pub fn field_inputs(&self, grid: Option<&SensitivityGrid>) -> FieldInputs {
        FieldInputs {
            dcf_per_share: grid.map(SensitivityGrid::finite_values).unwrap_or_default(),
            ebitda: self.ebitda,
            net_income: self.net_income,
            shares: self.shares(&self.assumptions).ok(),
            position: self.position,
        }
    }

    /// Football field from a sensitivity grid and multiple ranges.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidAssumption` if `config` is invalid.
    pub fn football_field(
        &self,
        grid: Option<&SensitivityGrid>,
        config: &MultiplesConfig,
    ) -> Result<FootballField, ModelError> {
        football_field(&self.field_inputs(grid), config)
    }
}

/// One-shot valuation under `assumptions`.
///
/// # Errors
/// See [`DcfModel::new`] and [`DcfModel::run_with`].
pub fn valuate(
    financials: &CompanyFinancials,
    assumptions: Assumptions,
) -> Result<ValuationResult, ModelError> {
    DcfModel::new(financials, assumptions)?.run().map(|run| run.result)
}

#[cfg(test)]
pub(crate) mod tests {
    use approx::assert_relative_eq;
    use fairvalue_primitives::{BridgeWarning, CapitalConvention, Statement};

    use super::*;

    fn series(values: &[(i32, f64)]) -> TimeSeries {
        TimeSeries::from_values(values.iter().copied())
    }

    /// Three years of history growing 10% a year with steady ratios.
    pub(crate) fn sample_financials() -> CompanyFinancials {
        let mut fin = CompanyFinancials::new("ACME");
        fin.income = Statement::new()
            .with("Total Revenue", series(&[(2021, 1000.0), (2022, 1100.0), (2023, 1210.0)]))
            .with("EBIT", series(&[(2021, 200.0), (2022, 220.0), (2023, 242.0)]))
            .with("EBITDA", series(&[(2021, 260.0), (2022, 286.0), (2023, 314.6)]))
            .with("Net Income", series(&[(2021, 140.0), (2022, 154.0), (2023, 169.4)]))
            .with("Reconciled Depreciation", series(&[(2021, 50.0), (2022, 55.0), (2023, 60.5)]));
        fin.balance = Statement::new()
            .with("Net PPE", series(&[(2021, 500.0), (2022, 550.0), (2023, 605.0)]))
            .with("Current Assets", series(&[(2021, 400.0), (2022, 440.0), (2023, 484.0)]))
            .with("Current Liabilities", series(&[(2021, 300.0), (2022, 330.0), (2023, 363.0)]))
            .with("Cash And Cash Equivalents", series(&[(2023, 150.0)]))
            .with("Total Debt", series(&[(2023, 400.0)]));
        fin.cash_flow = Statement::new().with(
            "Capital Expenditure",
            series(&[(2021, -80.0), (2022, -88.0), (2023, -96.8)]),
        );
        fin.facts.shares_outstanding = Some(100.0);
        fin
    }

    #[test]
    fn historical_drivers() {
        let model = DcfModel::new(&sample_financials(), Assumptions::from_history()).unwrap();
        let d = model.drivers(model.assumptions()).unwrap();
        assert_relative_eq!(d.revenue_growth, 0.10, epsilon = 1e-12);
        assert_relative_eq!(d.ebit_margin, 0.20, epsilon = 1e-12);
        assert_relative_eq!(d.depreciation, 0.05, epsilon = 1e-12);
        assert_relative_eq!(d.capex, 0.08, epsilon = 1e-12);
        assert_relative_eq!(d.nwc, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn overrides_win() {
        let a = Assumptions { revenue_growth: Some(0.02), ..Assumptions::from_history() };
        let model = DcfModel::new(&sample_financials(), a).unwrap();
        assert_relative_eq!(model.drivers(&a).unwrap().revenue_growth, 0.02);
    }

    #[test]
    fn run_is_consistent() {
        let model = DcfModel::new(&sample_financials(), Assumptions::from_history()).unwrap();
        let run = model.run().unwrap();
        let r = &run.result;

        assert_eq!(run.forecast.years[0].year, FiscalYear(2024));
        assert_relative_eq!(r.enterprise_value, r.pv_explicit + r.pv_terminal_value);
        assert_relative_eq!(r.equity_value, r.enterprise_value + 150.0 - 400.0, epsilon = 1e-9);
        assert_relative_eq!(r.per_share, r.equity_value / 100.0, epsilon = 1e-12);
        assert!(r.warnings.is_empty());
        assert!(r.terminal_share() > 0.0 && r.terminal_share() < 1.0);
    }

    #[test]
    fn undefined_terminal_value_surfaces() {
        let a = Assumptions::default().with_rates(0.05, 0.05);
        let model = DcfModel::new(&sample_financials(), a).unwrap();
        assert!(matches!(model.run(), Err(ModelError::UndefinedTerminalValue { .. })));
    }

    #[test]
    fn missing_shares_refuses() {
        let mut fin = sample_financials();
        fin.facts.shares_outstanding = None;
        assert_eq!(
            valuate(&fin, Assumptions::default()).unwrap_err(),
            ModelError::ShareCountUnavailable
        );
        assert!(valuate(&fin, Assumptions::default().with_shares(50.0)).is_ok());
    }

    #[test]
    fn missing_cash_degrades() {
        let mut fin = sample_financials();
        fin.balance = Statement::new().with("Total Debt", series(&[(2023, 400.0)]));
        let r = valuate(&fin, Assumptions::default()).unwrap();
        assert!(r.is_degraded());
        assert_eq!(r.warnings, vec![BridgeWarning::MissingCash]);
    }

    #[test]
    fn missing_ratio_without_override() {
        let mut fin = sample_financials();
        fin.income = Statement::new()
            .with("Total Revenue", series(&[(2021, 1000.0), (2022, 1100.0), (2023, 1210.0)]));
        let model = DcfModel::new(&fin, Assumptions::from_history()).unwrap();
        assert_eq!(model.run().unwrap_err(), ModelError::MissingLineItem(LineItem::Ebit));
        // Dashboard defaults override every driver.
        assert!(model.run_with(&Assumptions::default()).is_ok());
    }

    #[test]
    fn balance_sheet_convention_runs() {
        let a = Assumptions::from_history().with_convention(CapitalConvention::BalanceSheet);
        let model = DcfModel::new(&sample_financials(), a).unwrap();
        let run = model.run().unwrap();
        let d = run.drivers;
        assert_relative_eq!(d.depreciation, 0.10, epsilon = 1e-12);
        assert_relative_eq!(d.fixed_assets.unwrap(), 0.5, epsilon = 1e-12);
        assert!(run.result.per_share.is_finite());
    }

    #[test]
    fn balance_sheet_defaults_use_historical_capital_ratios() {
        let bs = CapitalConvention::BalanceSheet;
        let model = DcfModel::new(&sample_financials(), Assumptions::default()).unwrap();
        let from_defaults = model.drivers(&Assumptions::default().with_convention(bs)).unwrap();
        let from_history = model.drivers(&Assumptions::from_history().with_convention(bs)).unwrap();

        assert_relative_eq!(from_defaults.depreciation, from_history.depreciation);
        assert_relative_eq!(from_defaults.capex, from_history.capex);
        assert_relative_eq!(from_defaults.capex, 1.76, epsilon = 1e-12);

        let run = model.run_with(&Assumptions::default().with_convention(bs)).unwrap();
        assert_relative_eq!(run.forecast.years[0].capex, 1.76 * 60.5, epsilon = 1e-9);
    }

    #[test]
    fn ebitda_falls_back_to_ebit() {
        let mut fin = sample_financials();
        fin.income = Statement::new()
            .with("Total Revenue", series(&[(2022, 1100.0), (2023, 1210.0)]))
            .with("Operating Income", series(&[(2023, 242.0)]));
        let model = DcfModel::new(&fin, Assumptions::default()).unwrap();
        assert_eq!(model.latest_ebitda(), Some(242.0));
        assert_eq!(model.latest_net_income(), None);
    }

    #[test]
    fn invalid_assumptions_rejected_up_front() {
        let a = Assumptions::default().with_horizon(0);
        assert!(matches!(
            DcfModel::new(&sample_financials(), a),
            Err(ModelError::InvalidAssumption(_))
        ));
    }

    #[test]
    fn history_window() {
        let model = DcfModel::new_in(
            &sample_financials(),
            FiscalYear(2022)..=FiscalYear(2023),
            Assumptions::from_history(),
        )
        .unwrap();
        assert_eq!(model.ratios().revenue_years(), 2);
        assert_eq!(model.base().year, FiscalYear(2023));
    }
}
