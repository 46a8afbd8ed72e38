//! Historical ratio extraction.
//!
//! Each ratio is observed independently in every historical year where both
//! its numerator and denominator are reported, and averaged arithmetically.
//! Years with a gap are excluded, never interpolated.

use std::{collections::BTreeMap, ops::RangeInclusive};

use fairvalue_math::{cagr, mean};
use fairvalue_primitives::{CompanyFinancials, FiscalYear, LineItem, TimeSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ModelError;

/// A ratio derived from historical statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ratio {
    /// Year-over-year revenue growth.
    RevenueGrowth,
    /// EBIT / revenue.
    EbitMargin,
    /// Depreciation / revenue.
    DepreciationToRevenue,
    /// Depreciation / net fixed assets (same year).
    DepreciationToFixedAssets,
    /// Capex / revenue.
    CapexToRevenue,
    /// Capex / change in net fixed assets.
    CapexToFixedAssetChange,
    /// Net fixed assets / revenue.
    FixedAssetsToRevenue,
    /// Current assets / revenue.
    CurrentAssetsToRevenue,
    /// Current liabilities / revenue.
    CurrentLiabilitiesToRevenue,
    /// (Current assets - current liabilities) / revenue.
    NwcToRevenue,
}

impl Ratio {
    /// All ratios, in report order.
    pub const ALL: [Self; 10] = [
        Self::RevenueGrowth,
        Self::EbitMargin,
        Self::DepreciationToRevenue,
        Self::DepreciationToFixedAssets,
        Self::CapexToRevenue,
        Self::CapexToFixedAssetChange,
        Self::FixedAssetsToRevenue,
        Self::CurrentAssetsToRevenue,
        Self::CurrentLiabilitiesToRevenue,
        Self::NwcToRevenue,
    ];

    /// Minimum years of line-item history needed for one observation.
    #[must_use]
    pub const fn required_years(self) -> usize {
        match self {
            Self::RevenueGrowth | Self::CapexToFixedAssetChange => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RevenueGrowth => "revenue growth",
            Self::EbitMargin => "EBIT margin",
            Self::DepreciationToRevenue => "depreciation / revenue",
            Self::DepreciationToFixedAssets => "depreciation / net fixed assets",
            Self::CapexToRevenue => "capex / revenue",
            Self::CapexToFixedAssetChange => "capex / change in net fixed assets",
            Self::FixedAssetsToRevenue => "net fixed assets / revenue",
            Self::CurrentAssetsToRevenue => "current assets / revenue",
            Self::CurrentLiabilitiesToRevenue => "current liabilities / revenue",
            Self::NwcToRevenue => "net working capital / revenue",
        };
        f.write_str(s)
    }
}

/// Per-year observations of one ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioObservations {
    /// `(year, ratio)` for every year where it could be computed.
    pub points: Vec<(FiscalYear, f64)>,
    /// Years where the numerator was reported but the denominator was
    /// absent or zero.
    pub skipped: Vec<FiscalYear>,
    /// First line item found absent under all aliases, if any.
    pub missing: Option<LineItem>,
}

impl RatioObservations {
    fn missing(item: LineItem) -> Self {
        Self { points: Vec::new(), skipped: Vec::new(), missing: Some(item) }
    }

    fn from_points(points: Vec<(FiscalYear, f64)>) -> Self {
        Self { points, skipped: Vec::new(), missing: None }
    }
}

/// Historical ratios for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRatios {
    observations: BTreeMap<Ratio, RatioObservations>,
    revenue_years: usize,
    revenue_cagr: Option<f64>,
}

impl HistoricalRatios {
    /// Mean of a ratio over its observed years.
    ///
    /// # Errors
    /// Returns `ModelError::MissingLineItem` if an input concept is absent
    /// altogether, or `ModelError::InsufficientHistory` if the inputs exist
    /// but never overlap.
    pub fn get(&self, ratio: Ratio) -> Result<f64, ModelError> {
        let obs = self.observations(ratio);
        if obs.points.is_empty() {
            if let Some(item) = obs.missing {
                return Err(ModelError::MissingLineItem(item));
            }
            let actual = if ratio == Ratio::RevenueGrowth { self.revenue_years } else { 0 };
            return Err(ModelError::InsufficientHistory {
                ratio,
                required: ratio.required_years(),
                actual,
            });
        }
        let values: Vec<f64> = obs.points.iter().map(|(_, v)| *v).collect();
        Ok(mean(&values)?)
    }

    /// Raw observations of a ratio.
    #[must_use]
    pub fn observations(&self, ratio: Ratio) -> &RatioObservations {
        static EMPTY: RatioObservations =
            RatioObservations { points: Vec::new(), skipped: Vec::new(), missing: None };
        self.observations.get(&ratio).unwrap_or(&EMPTY)
    }

    /// Mean year-over-year revenue growth.
    ///
    /// # Errors
    /// See [`HistoricalRatios::get`].
    pub fn revenue_growth(&self) -> Result<f64, ModelError> {
        self.get(Ratio::RevenueGrowth)
    }

    /// Mean EBIT margin.
    ///
    /// # Errors
    /// See [`HistoricalRatios::get`].
    pub fn ebit_margin(&self) -> Result<f64, ModelError> {
        self.get(Ratio::EbitMargin)
    }

    /// Compound growth between the first and last revenue years, if at
    /// least two years with a positive starting value are reported.
    #[must_use]
    pub const fn revenue_cagr(&self) -> Option<f64> {
        self.revenue_cagr
    }

    /// Number of historical revenue observations.
    #[must_use]
    pub const fn revenue_years(&self) -> usize {
        self.revenue_years
    }
}

/// Derive historical ratios from all reported years.
///
/// # Errors
/// Returns `ModelError::MissingLineItem` if revenue is absent under every
/// alias; every ratio is a share of, or growth in, revenue.
pub fn extract_ratios(financials: &CompanyFinancials) -> Result<HistoricalRatios, ModelError> {
    extract(financials, None)
}

/// Derive historical ratios from the years in `years` only.
///
/// # Errors
/// Returns `ModelError::MissingLineItem` if revenue is absent, and
/// `ModelError::InvalidAssumption` if the window is empty.
pub fn extract_ratios_in(
    financials: &CompanyFinancials,
    years: RangeInclusive<FiscalYear>,
) -> Result<HistoricalRatios, ModelError> {
    if years.is_empty() {
        return Err(ModelError::InvalidAssumption(format!(
            "empty history window {}..={}",
            years.start(),
            years.end()
        )));
    }
    extract(financials, Some(years))
}

fn extract(
    financials: &CompanyFinancials,
    window: Option<RangeInclusive<FiscalYear>>,
) -> Result<HistoricalRatios, ModelError> {
    let restrict = |item: LineItem| -> Option<TimeSeries> {
        financials.series(item).map(|s| match &window {
            Some(w) => s.iter().filter(|(y, _)| w.contains(y)).collect(),
            None => s.clone(),
        })
    };

    let revenue = restrict(LineItem::Revenue)
        .filter(|s| !s.is_empty())
        .ok_or(ModelError::MissingLineItem(LineItem::Revenue))?;
    let ebit = restrict(LineItem::Ebit);
    let depreciation = restrict(LineItem::Depreciation).map(abs_series);
    let capex = restrict(LineItem::Capex).map(abs_series);
    let fixed_assets = restrict(LineItem::NetFixedAssets);
    let current_assets = restrict(LineItem::CurrentAssets);
    let current_liabilities = restrict(LineItem::CurrentLiabilities);

    let aligned = |ratio: Ratio, numerator: &TimeSeries, denominator: &TimeSeries| {
        let (points, skipped) = share_of(numerator, denominator);
        if !skipped.is_empty() {
            warn!(
                symbol = %financials.symbol,
                %ratio,
                ?skipped,
                "historical years skipped, denominator missing or zero"
            );
        }
        RatioObservations { points, skipped, missing: None }
    };

    let mut observations = BTreeMap::new();

    let growth: Vec<(FiscalYear, f64)> = revenue
        .adjacent()
        .filter(|((_, prev), _)| *prev != 0.0)
        .map(|((_, prev), (year, value))| (year, value / prev - 1.0))
        .collect();
    observations.insert(Ratio::RevenueGrowth, RatioObservations::from_points(growth));

    let per_revenue = |ratio: Ratio, series: Option<&TimeSeries>, item: LineItem| match series {
        Some(s) => aligned(ratio, s, &revenue),
        None => RatioObservations::missing(item),
    };

    for (ratio, series, item) in [
        (Ratio::EbitMargin, ebit.as_ref(), LineItem::Ebit),
        (Ratio::DepreciationToRevenue, depreciation.as_ref(), LineItem::Depreciation),
        (Ratio::CapexToRevenue, capex.as_ref(), LineItem::Capex),
        (Ratio::FixedAssetsToRevenue, fixed_assets.as_ref(), LineItem::NetFixedAssets),
        (Ratio::CurrentAssetsToRevenue, current_assets.as_ref(), LineItem::CurrentAssets),
        (
            Ratio::CurrentLiabilitiesToRevenue,
            current_liabilities.as_ref(),
            LineItem::CurrentLiabilities,
        ),
    ] {
        observations.insert(ratio, per_revenue(ratio, series, item));
    }

    let nwc = match (&current_assets, &current_liabilities) {
        (Some(ca), Some(cl)) => {
            let balance: TimeSeries =
                ca.iter().filter_map(|(y, a)| cl.get(y).map(|l| (y, a - l))).collect();
            aligned(Ratio::NwcToRevenue, &balance, &revenue)
        }
        (None, _) => RatioObservations::missing(LineItem::CurrentAssets),
        (_, None) => RatioObservations::missing(LineItem::CurrentLiabilities),
    };
    observations.insert(Ratio::NwcToRevenue, nwc);

    let dep_to_assets = match (&depreciation, &fixed_assets) {
        (Some(d), Some(fa)) => aligned(Ratio::DepreciationToFixedAssets, d, fa),
        (None, _) => RatioObservations::missing(LineItem::Depreciation),
        (_, None) => RatioObservations::missing(LineItem::NetFixedAssets),
    };
    observations.insert(Ratio::DepreciationToFixedAssets, dep_to_assets);

    let capex_to_change = match (&capex, &fixed_assets) {
        (Some(c), Some(fa)) => {
            let change: TimeSeries =
                fa.adjacent().map(|((_, prev), (year, value))| (year, value - prev)).collect();
            aligned(Ratio::CapexToFixedAssetChange, c, &change)
        }
        (None, _) => RatioObservations::missing(LineItem::Capex),
        (_, None) => RatioObservations::missing(LineItem::NetFixedAssets),
    };
    observations.insert(Ratio::CapexToFixedAssetChange, capex_to_change);

    let revenue_cagr = match (revenue.first(), revenue.latest()) {
        (Some((y0, first)), Some((y1, last))) if y1 > y0 => {
            u32::try_from(y1.0 - y0.0).ok().and_then(|years| cagr(first, last, years).ok())
        }
        _ => None,
    };

    let ratios =
        HistoricalRatios { observations, revenue_years: revenue.len(), revenue_cagr };
    debug!(
        symbol = %financials.symbol,
        revenue_years = ratios.revenue_years,
        "extracted historical ratios"
    );
    Ok(ratios)
}

/// `numerator / denominator` for years present in both with a non-zero
/// denominator, plus the numerator years that had no usable denominator.
fn share_of(
    numerator: &TimeSeries,
    denominator: &TimeSeries,
) -> (Vec<(FiscalYear, f64)>, Vec<FiscalYear>) {
    let mut points = Vec::new();
    let mut skipped = Vec::new();
    for (y, n) in numerator.iter() {
        match denominator.get(y).filter(|d| *d != 0.0) {
            Some(d) => points.push((y, n / d)),
            None => skipped.push(y),
        }
    }
    (points, skipped)
}

fn abs_series(s: TimeSeries) -> TimeSeries {
    s.iter().map(|(y, v)| (y, v.abs())).collect()
}
