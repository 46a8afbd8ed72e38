//! Valuation outputs as polars `DataFrame`s.

use fairvalue_model::{HistoricalRatios, Ratio, SensitivityGrid, Sweep};
use fairvalue_primitives::ProjectionRow;
use polars::prelude::*;

use crate::UtilsError;

/// Projection schedule, one row per forecast year.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be assembled.
pub fn schedule_frame(rows: &[ProjectionRow]) -> Result<DataFrame, UtilsError> {
    let col = |name: &str, f: fn(&ProjectionRow) -> f64| {
        Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
    };

    let df = DataFrame::new(vec![
        Column::new("year".into(), rows.iter().map(|r| r.year.0).collect::<Vec<_>>()),
        Column::new("period".into(), rows.iter().map(|r| r.period).collect::<Vec<_>>()),
        col("revenue", |r| r.revenue),
        col("ebit", |r| r.ebit),
        col("nopat", |r| r.nopat),
        col("depreciation", |r| r.depreciation),
        col("capex", |r| r.capex),
        col("delta_nwc", |r| r.delta_nwc),
        col("fcff", |r| r.fcff),
        col("discount_factor", |r| r.discount_factor),
        col("pv_fcff", |r| r.pv_fcff),
    ])?;
    Ok(df)
}

/// Sensitivity grid in long format.
///
/// Columns: `terminal_growth`, `discount_rate`, `per_share`. Rows run over
/// discount rates within each terminal growth rate; undefined cells keep
/// their NaN.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be assembled.
pub fn grid_frame(grid: &SensitivityGrid) -> Result<DataFrame, UtilsError> {
    let cells = grid.values.len();
    let mut growth = Vec::with_capacity(cells);
    let mut rates = Vec::with_capacity(cells);
    let mut values = Vec::with_capacity(cells);

    for ((i, j), v) in grid.values.indexed_iter() {
        growth.push(grid.terminal_growth_rates[i]);
        rates.push(grid.discount_rates[j]);
        values.push(*v);
    }

    let df = DataFrame::new(vec![
        Column::new("terminal_growth".into(), growth),
        Column::new("discount_rate".into(), rates),
        Column::new("per_share".into(), values),
    ])?;
    Ok(df)
}

/// One-way sweeps stacked into a single frame.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be assembled.
pub fn sweep_frame(sweeps: &[Sweep]) -> Result<DataFrame, UtilsError> {
    let mut factors = Vec::new();
    let mut inputs = Vec::new();
    let mut values = Vec::new();

    for s in sweeps {
        for (x, v) in s.inputs.iter().zip(s.values.iter()) {
            factors.push(s.factor.to_string());
            inputs.push(*x);
            values.push(*v);
        }
    }

    let df = DataFrame::new(vec![
        Column::new("factor".into(), factors),
        Column::new("input".into(), inputs),
        Column::new("per_share".into(), values),
    ])?;
    Ok(df)
}

/// Every per-year ratio observation behind the historical means.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be assembled.
pub fn ratios_frame(ratios: &HistoricalRatios) -> Result<DataFrame, UtilsError> {
    let mut names = Vec::new();
    let mut years = Vec::new();
    let mut values = Vec::new();

    for ratio in Ratio::ALL {
        for (year, v) in &ratios.observations(ratio).points {
            names.push(ratio.to_string());
            years.push(year.0);
            values.push(*v);
        }
    }

    let df = DataFrame::new(vec![
        Column::new("ratio".into(), names),
        Column::new("year".into(), years),
        Column::new("value".into(), values),
    ])?;
    Ok(df)
}
