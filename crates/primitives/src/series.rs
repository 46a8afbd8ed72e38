//! Year-indexed line-item series.

use std::collections::BTreeMap;

use chrono::Datelike;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::Date;

/// A fiscal year label (e.g. 2024).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    /// Create a new fiscal year.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    /// The year `n` years after this one.
    #[must_use]
    pub const fn offset(self, n: i32) -> Self {
        Self(self.0 + n)
    }

    /// Fiscal year of a statement period-end date.
    #[must_use]
    pub fn of_date(date: Date) -> Self {
        Self(date.year())
    }
}

/// Values of a single line item keyed by fiscal year.
///
/// Years are always strictly increasing and every stored value is finite:
/// non-finite inputs (provider gaps coerced to NaN) are dropped on
/// construction, so a missing year is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    values: BTreeMap<FiscalYear, f64>,
}

impl TimeSeries {
    /// Create an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: BTreeMap::new() }
    }

    /// Build a series from `(year, value)` pairs, dropping non-finite values.
    ///
    /// A year given more than once keeps its last value.
    pub fn from_values<Y, I>(values: I) -> Self
    where
        Y: Into<FiscalYear>,
        I: IntoIterator<Item = (Y, f64)>,
    {
        let values = values
            .into_iter()
            .map(|(y, v)| (y.into(), v))
            .filter(|(_, v)| v.is_finite())
            .collect();
        Self { values }
    }

    /// Build a series from period-end dates, keyed by each date's calendar year.
    pub fn from_dated<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (Date, f64)>,
    {
        Self::from_values(values.into_iter().map(|(d, v)| (FiscalYear::of_date(d), v)))
    }

    /// Number of years with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for a specific year.
    #[must_use]
    pub fn get(&self, year: FiscalYear) -> Option<f64> {
        self.values.get(&year).copied()
    }

    /// Earliest year and its value.
    #[must_use]
    pub fn first(&self) -> Option<(FiscalYear, f64)> {
        self.values.first_key_value().map(|(y, v)| (*y, *v))
    }

    /// Most recent year and its value.
    #[must_use]
    pub fn latest(&self) -> Option<(FiscalYear, f64)> {
        self.values.last_key_value().map(|(y, v)| (*y, *v))
    }

    /// Iterate over `(year, value)` in increasing year order.
    pub fn iter(&self) -> impl Iterator<Item = (FiscalYear, f64)> + '_ {
        self.values.iter().map(|(y, v)| (*y, *v))
    }

    /// Years present in the series, increasing.
    pub fn years(&self) -> impl Iterator<Item = FiscalYear> + '_ {
        self.values.keys().copied()
    }

    /// Adjacent observations `((prev_year, prev), (year, value))`.
    ///
    /// Adjacency follows available observations, so a gap year is bridged
    /// rather than breaking the chain.
    pub fn adjacent(&self) -> impl Iterator<Item = ((FiscalYear, f64), (FiscalYear, f64))> + '_ {
        self.iter().zip(self.iter().skip(1))
    }

    /// A new series with `forecast` appended after the last historical year.
    ///
    /// Returns `None` if any forecast year is not strictly after the latest
    /// year already present; the historical values are never overwritten.
    #[must_use]
    pub fn extended<I>(&self, forecast: I) -> Option<Self>
    where
        I: IntoIterator<Item = (FiscalYear, f64)>,
    {
        let mut values = self.values.clone();
        let mut last = self.latest().map(|(y, _)| y);
        for (year, value) in forecast {
            if last.is_some_and(|l| year <= l) {
                return None;
            }
            values.insert(year, value);
            last = Some(year);
        }
        Some(Self { values })
    }
}

impl<Y: Into<FiscalYear>> FromIterator<(Y, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (Y, f64)>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}
