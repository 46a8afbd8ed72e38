//! Sensitivity grids and one-way sweeps.
//!
//! Every cell or sweep point is a complete, independent valuation run from
//! the same historical base. Runs share no mutable state, so the grid can be
//! evaluated in parallel and the result is identical to a serial build.

use fairvalue_math::{arange_inclusive, linspace};
use fairvalue_primitives::{Assumptions, BridgeWarning};
use ndarray::{Array1, Array2, parallel::prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DcfModel, ModelError};

/// An inclusive `min..=max` axis sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// First value.
    pub min: f64,
    /// Last value (included).
    pub max: f64,
    /// Spacing.
    pub step: f64,
}

impl AxisSpec {
    /// Create an axis.
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Sample the axis.
    ///
    /// # Errors
    /// Returns `ModelError::Math` for an empty or non-finite range.
    pub fn values(&self) -> Result<Array1<f64>, ModelError> {
        Ok(arange_inclusive(self.min, self.max, self.step)?)
    }
}

/// Configuration for a discount-rate by terminal-growth grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Discount rates (columns).
    pub discount_rate: AxisSpec,
    /// Terminal growth rates (rows).
    pub terminal_growth: AxisSpec,
    /// Evaluate cells on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            discount_rate: AxisSpec::new(0.08, 0.16, 0.01),
            terminal_growth: AxisSpec::new(0.01, 0.05, 0.005),
            parallel: true,
        }
    }
}

/// Per-share values over discount rate and terminal growth.
///
/// `values[[i, j]]` is the value at `terminal_growth_rates[i]` and
/// `discount_rates[j]`. Cells where the discount rate does not exceed
/// terminal growth hold NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    /// Column axis.
    pub discount_rates: Array1<f64>,
    /// Row axis.
    pub terminal_growth_rates: Array1<f64>,
    /// Per-share values.
    pub values: Array2<f64>,
    /// Bridge substitutions shared by every cell.
    pub warnings: Vec<BridgeWarning>,
}

impl SensitivityGrid {
    /// `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Value at discount rate index `col` and terminal growth index `row`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// All defined cells, row-major.
    #[must_use]
    pub fn finite_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| v.is_finite()).collect()
    }

    /// Number of undefined cells.
    #[must_use]
    pub fn undefined_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}

/// Build a sensitivity grid around `base`.
///
/// Drivers and the share count are resolved before any cell is run, so a
/// missing input fails the whole grid instead of surfacing as NaN.
///
/// # Errors
/// Returns driver, share-count or axis errors. An undefined terminal value
/// in a cell is not an error; the cell is NaN.
pub fn sensitivity_grid(
    model: &DcfModel,
    base: &Assumptions,
    spec: &GridSpec,
) -> Result<SensitivityGrid, ModelError> {
    model.drivers(base)?;
    model.shares(base)?;

    let discount_rates = spec.discount_rate.values()?;
    let terminal_growth_rates = spec.terminal_growth.values()?;
    let (rows, cols) = (terminal_growth_rates.len(), discount_rates.len());

    let cell = |k: usize| {
        let (g, r) = (terminal_growth_rates[k / cols], discount_rates[k % cols]);
        defined_or_nan(model.per_share_with(&base.with_rates(r, g)))
    };

    let flat: Vec<f64> = if spec.parallel {
        (0..rows * cols).into_par_iter().map(cell).collect::<Result<_, _>>()?
    } else {
        (0..rows * cols).map(cell).collect::<Result<_, _>>()?
    };

    let values = Array2::from_shape_vec((rows, cols), flat)
        .map_err(|e| ModelError::InvalidAssumption(format!("grid shape: {e}")))?;
    let warnings = model.position().net_cash().1;
    let grid = SensitivityGrid { discount_rates, terminal_growth_rates, values, warnings };
    debug!(
        symbol = %model.symbol(),
        rows,
        cols,
        undefined = grid.undefined_count(),
        degraded = !grid.warnings.is_empty(),
        "sensitivity grid built"
    );
    Ok(grid)
}

/// A single assumption varied in a one-way sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SweepFactor {
    /// Revenue growth override.
    RevenueGrowth,
    /// EBIT margin override.
    EbitMargin,
    /// Discount rate.
    DiscountRate,
    /// Terminal growth rate.
    TerminalGrowth,
    /// Tax rate.
    TaxRate,
}

impl SweepFactor {
    /// Copy of `a` with this factor set to `value`.
    #[must_use]
    pub const fn apply(self, a: Assumptions, value: f64) -> Assumptions {
        match self {
            Self::RevenueGrowth => Assumptions { revenue_growth: Some(value), ..a },
            Self::EbitMargin => Assumptions { ebit_margin: Some(value), ..a },
            Self::DiscountRate => Assumptions { discount_rate: value, ..a },
            Self::TerminalGrowth => Assumptions { terminal_growth: value, ..a },
            Self::TaxRate => Assumptions { tax_rate: value, ..a },
        }
    }
}

impl std::fmt::Display for SweepFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RevenueGrowth => write!(f, "Revenue growth"),
            Self::EbitMargin => write!(f, "EBIT margin"),
            Self::DiscountRate => write!(f, "Discount rate"),
            Self::TerminalGrowth => write!(f, "Terminal growth"),
            Self::TaxRate => write!(f, "Tax rate"),
        }
    }
}

/// A linearly spaced one-way sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    /// Factor to vary.
    pub factor: SweepFactor,
    /// First input.
    pub low: f64,
    /// Last input.
    pub high: f64,
    /// Number of points.
    pub points: usize,
}

impl SweepSpec {
    /// Default number of sweep points.
    pub const DEFAULT_POINTS: usize = 9;

    /// `center ± delta` with [`Self::DEFAULT_POINTS`] points.
    #[must_use]
    pub const fn around(factor: SweepFactor, center: f64, delta: f64) -> Self {
        Self { factor, low: center - delta, high: center + delta, points: Self::DEFAULT_POINTS }
    }

    /// Clamp both ends into `[floor, ceiling]`.
    #[must_use]
    pub fn clamped(self, floor: f64, ceiling: f64) -> Self {
        Self { low: self.low.max(floor), high: self.high.min(ceiling), ..self }
    }

    /// Change the number of points.
    #[must_use]
    pub const fn with_points(self, points: usize) -> Self {
        Self { points, ..self }
    }
}

/// Per-share value against one varied input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    /// Factor that was varied.
    pub factor: SweepFactor,
    /// Input values.
    pub inputs: Array1<f64>,
    /// Per-share value at each input, NaN where the terminal value is undefined.
    pub values: Array1<f64>,
}

impl Sweep {
    /// Lowest and highest defined per-share values.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.iter().copied().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Run a one-way sweep around `base`.
///
/// # Errors
/// Returns axis errors and any run error other than an undefined terminal value.
pub fn sweep(model: &DcfModel, base: &Assumptions, spec: &SweepSpec) -> Result<Sweep, ModelError> {
    let inputs = linspace(spec.low, spec.high, spec.points)?;
    let values = inputs
        .iter()
        .map(|v| defined_or_nan(model.per_share_with(&spec.factor.apply(*base, *v))))
        .collect::<Result<Array1<f64>, _>>()?;
    debug!(symbol = %model.symbol(), factor = %spec.factor, points = spec.points, "sweep built");
    Ok(Sweep { factor: spec.factor, inputs, values })
}

fn defined_or_nan(value: Result<f64, ModelError>) -> Result<f64, ModelError> {
    match value {
        Err(ModelError::UndefinedTerminalValue { .. }) => Ok(f64::NAN),
        other => other,
    }
}
