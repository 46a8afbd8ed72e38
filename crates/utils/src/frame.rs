//! Building statements from year-indexed `DataFrame`s.

use fairvalue_primitives::{Date, FiscalYear, PointFacts, Statement, TimeSeries};
use polars::prelude::*;

use crate::UtilsError;

/// Column holding the fiscal year as an integer.
pub const YEAR_COLUMN: &str = "year";

/// Column holding the statement period-end date.
pub const DATE_COLUMN: &str = "date";

/// Build a [`Statement`] from a frame with one row per period.
///
/// The period is read from [`YEAR_COLUMN`] when present, else from
/// [`DATE_COLUMN`] (ISO dates, keyed by calendar year). Every other column
/// becomes a line item; values that do not parse as numbers are treated as
/// gaps.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if neither period column exists, or
/// `UtilsError::InvalidDate` if a period-end date cannot be parsed.
pub fn statement_from_frame(df: &DataFrame) -> Result<Statement, UtilsError> {
    let (period_col, years) = period_years(df)?;

    let mut statement = Statement::new();
    for name in df.get_column_names() {
        if name.as_str() == period_col {
            continue;
        }
        let values = df.column(name.as_str())?.cast(&DataType::Float64)?;
        let series = years
            .iter()
            .zip(values.f64()?.into_iter())
            .filter_map(|(year, v)| Some(((*year)?, v?)))
            .collect::<TimeSeries>();
        statement.insert(name.as_str(), series);
    }
    Ok(statement)
}

fn period_years(df: &DataFrame) -> Result<(&'static str, Vec<Option<FiscalYear>>), UtilsError> {
    if let Ok(col) = df.column(YEAR_COLUMN) {
        let years = col.cast(&DataType::Int32)?;
        let years = years.i32()?.into_iter().map(|y| y.map(FiscalYear)).collect();
        return Ok((YEAR_COLUMN, years));
    }

    let col = df
        .column(DATE_COLUMN)
        .map_err(|_| UtilsError::MissingColumn(format!("{YEAR_COLUMN} or {DATE_COLUMN}")))?;
    let dates = col.cast(&DataType::String)?;
    let years = dates
        .str()?
        .into_iter()
        .map(|d| d.map(parse_period_end).transpose())
        .collect::<Result<_, _>>()?;
    Ok((DATE_COLUMN, years))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_period_end(s: &str) -> Result<FiscalYear, UtilsError> {
    s.get(..10)
        .and_then(|d| Date::parse_from_str(d, "%Y-%m-%d").ok())
        .map(FiscalYear::of_date)
        .ok_or_else(|| UtilsError::InvalidDate(s.to_string()))
}

/// Point-in-time facts from the first row of a quote frame.
///
/// Recognizes `sharesOutstanding`, `floatShares` and `currentPrice`
/// (or `price`). Unknown columns are ignored and absent ones stay `None`.
///
/// # Errors
/// Returns `UtilsError::Polars` if a recognized column cannot be cast to a float.
pub fn point_facts_from_frame(df: &DataFrame) -> Result<PointFacts, UtilsError> {
    let first = |names: &[&str]| -> Result<Option<f64>, UtilsError> {
        for name in names {
            if let Ok(col) = df.column(name) {
                let values = col.cast(&DataType::Float64)?;
                return Ok(values.f64()?.get(0).filter(|v| v.is_finite()));
            }
        }
        Ok(None)
    };

    Ok(PointFacts {
        shares_outstanding: first(&["sharesOutstanding", "shares_outstanding"])?,
        float_shares: first(&["floatShares", "float_shares"])?,
        price: first(&["currentPrice", "price"])?,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn statement_from_year_column() {
        let df = df! {
            "year" => &[2021, 2022, 2023],
            "Total Revenue" => &[1000.0, 1100.0, 1210.0],
            "EBIT" => &[Some(200.0), None, Some(242.0)],
        }
        .unwrap();

        let st = statement_from_frame(&df).unwrap();
        assert_eq!(st.len(), 2);
        assert_eq!(st.get("Total Revenue").unwrap().len(), 3);
        let ebit = st.get("EBIT").unwrap();
        assert_eq!(ebit.len(), 2);
        assert!(ebit.get(FiscalYear(2022)).is_none());
        assert_relative_eq!(ebit.get(FiscalYear(2023)).unwrap(), 242.0);
    }

    #[test]
    fn statement_from_date_column() {
        let df = df! {
            "date" => &["2022-09-30", "2023-09-30 00:00:00"],
            "Net Income" => &[90.0, 110.0],
        }
        .unwrap();

        let st = statement_from_frame(&df).unwrap();
        let ni = st.get("Net Income").unwrap();
        assert_eq!(ni.first(), Some((FiscalYear(2022), 90.0)));
        assert_eq!(ni.latest(), Some((FiscalYear(2023), 110.0)));
    }

    #[test]
    fn text_values_are_gaps() {
        let df = df! {
            "year" => &[2022, 2023],
            "Total Debt" => &["n/a", "400"],
        }
        .unwrap();

        let st = statement_from_frame(&df).unwrap();
        let debt = st.get("Total Debt").unwrap();
        assert_eq!(debt.len(), 1);
        assert_relative_eq!(debt.get(FiscalYear(2023)).unwrap(), 400.0);
    }

    #[test]
    fn missing_period_column() {
        let df = df! { "EBIT" => &[1.0, 2.0] }.unwrap();
        assert!(matches!(statement_from_frame(&df), Err(UtilsError::MissingColumn(_))));
    }

    #[test]
    fn malformed_date() {
        let df = df! { "date" => &["30/09/2023"], "EBIT" => &[1.0] }.unwrap();
        assert!(matches!(statement_from_frame(&df), Err(UtilsError::InvalidDate(_))));
    }

    #[test]
    fn point_facts_first_row() {
        let df = df! {
            "sharesOutstanding" => &[100.0],
            "currentPrice" => &[20.5],
            "sector" => &["Industrials"],
        }
        .unwrap();

        let facts = point_facts_from_frame(&df).unwrap();
        assert_eq!(facts.shares_outstanding, Some(100.0));
        assert_eq!(facts.float_shares, None);
        assert_eq!(facts.price, Some(20.5));
    }
}
