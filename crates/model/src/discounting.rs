//! Present value of a forecast plus its Gordon-growth terminal value.

use fairvalue_math::{discount_factors, gordon_growth};
use fairvalue_primitives::ProjectionRow;
use serde::{Deserialize, Serialize};

use crate::{Forecast, ModelError};

/// A discounted projection schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedCashFlows {
    /// Forecast rows with discount factors attached.
    pub rows: Vec<ProjectionRow>,
    /// Discount rate used.
    pub discount_rate: f64,
    /// Terminal growth rate used.
    pub terminal_growth: f64,
    /// Sum of discounted explicit-horizon FCFF.
    pub pv_explicit: f64,
    /// Nominal terminal value at the end of the horizon.
    pub terminal_value: f64,
    /// Terminal value discounted by the last row's factor.
    pub pv_terminal_value: f64,
    /// `pv_explicit + pv_terminal_value`.
    pub enterprise_value: f64,
}

/// Discount a forecast at `discount_rate` with perpetual growth `terminal_growth`.
///
/// Row `t` is discounted by `(1 + r)^-t`. The terminal value is
/// `FCFF_N * (1 + g) / (r - g)` discounted by `(1 + r)^-N`.
///
/// # Errors
/// Returns `ModelError::UndefinedTerminalValue` if `r <= g`, and
/// `ModelError::InvalidAssumption` for an empty forecast.
pub fn discount_cash_flows(
    forecast: &Forecast,
    discount_rate: f64,
    terminal_growth: f64,
) -> Result<DiscountedCashFlows, ModelError> {
    // Checked first so an undefined cell never yields a partial result.
    let undefined = || ModelError::UndefinedTerminalValue { discount_rate, terminal_growth };
    if discount_rate.is_nan() || terminal_growth.is_nan() || discount_rate <= terminal_growth {
        return Err(undefined());
    }

    let last = forecast
        .last()
        .ok_or_else(|| ModelError::InvalidAssumption("empty forecast".to_string()))?;
    let n = u32::try_from(forecast.horizon())
        .map_err(|_| ModelError::InvalidAssumption("horizon too long".to_string()))?;

    let factors = discount_factors(discount_rate, n)?;
    let rows: Vec<ProjectionRow> = forecast
        .years
        .iter()
        .zip(factors.iter())
        .map(|(y, df)| ProjectionRow::discounted(*y, *df))
        .collect();

    let pv_explicit: f64 = rows.iter().map(|r| r.pv_fcff).sum();
    let terminal_value =
        gordon_growth(last.fcff, discount_rate, terminal_growth).ok_or_else(undefined)?;
    let last_factor = rows.last().map_or(1.0, |r| r.discount_factor);
    let pv_terminal_value = terminal_value * last_factor;

    Ok(DiscountedCashFlows {
        rows,
        discount_rate,
        terminal_growth,
        pv_explicit,
        terminal_value,
        pv_terminal_value,
        enterprise_value: pv_explicit + pv_terminal_value,
    })
}
