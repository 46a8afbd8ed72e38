//! A [`FinancialsProvider`] over a directory of CSV files.

use std::path::{Path, PathBuf};

use fairvalue_primitives::{CompanyFinancials, Statement, StatementKind, Symbol};
use fairvalue_traits::{FinancialsProvider, ProviderError};
use polars::prelude::*;
use tracing::debug;

use crate::{UtilsError, point_facts_from_frame, statement_from_frame};

/// File holding point-in-time facts for a ticker.
pub const INFO_FILE: &str = "info.csv";

/// Reads statements laid out as `<root>/<TICKER>/<statement>.csv`.
///
/// Each ticker directory may contain `income.csv`, `balance.csv` and
/// `cashflow.csv`, one row per period with a `year` or `date` column, plus an
/// optional [`INFO_FILE`]. A missing statement file yields an empty statement;
/// a missing ticker directory is `ProviderError::NotFound`.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    root: PathBuf,
}

impl CsvProvider {
    /// Create a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Tickers with a directory under the root, sorted.
    ///
    /// # Errors
    /// Returns `UtilsError::Io` if the root cannot be listed.
    pub fn symbols(&self) -> Result<Vec<Symbol>, UtilsError> {
        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                symbols.push(Symbol::new(entry.file_name().to_string_lossy()));
            }
        }
        symbols.sort();
        Ok(symbols)
    }

    fn load(&self, dir: &Path, symbol: &Symbol) -> Result<CompanyFinancials, UtilsError> {
        let mut fin = CompanyFinancials::new(symbol.clone());
        for kind in StatementKind::ALL {
            let statement = load_statement(&dir.join(format!("{kind}.csv")))?;
            match kind {
                StatementKind::Income => fin.income = statement,
                StatementKind::Balance => fin.balance = statement,
                StatementKind::CashFlow => fin.cash_flow = statement,
            }
        }

        let info = dir.join(INFO_FILE);
        if info.is_file() {
            fin.facts = point_facts_from_frame(&read_csv(&info)?)?;
        }
        Ok(fin)
    }
}

fn load_statement(path: &Path) -> Result<Statement, UtilsError> {
    if !path.is_file() {
        debug!(path = %path.display(), "statement file absent");
        return Ok(Statement::new());
    }
    statement_from_frame(&read_csv(path)?)
}

/// Read a headed CSV file into a `DataFrame`.
///
/// # Errors
/// Returns `UtilsError::Polars` if the file cannot be read or parsed.
pub fn read_csv(path: &Path) -> Result<DataFrame, UtilsError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

impl FinancialsProvider for CsvProvider {
    fn financials(&self, symbol: &Symbol) -> Result<CompanyFinancials, ProviderError> {
        let dir = self.root.join(symbol.as_str());
        if !dir.is_dir() {
            return Err(ProviderError::NotFound(symbol.clone()));
        }

        let fin = self.load(&dir, symbol).map_err(|e| match e {
            UtilsError::Io(e) => ProviderError::Backend(e.to_string()),
            e => ProviderError::Malformed { symbol: symbol.clone(), reason: e.to_string() },
        })?;
        debug!(
            %symbol,
            income = fin.income.len(),
            balance = fin.balance.len(),
            cash_flow = fin.cash_flow.len(),
            "loaded financials from csv"
        );
        Ok(fin)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use fairvalue_primitives::{FiscalYear, LineItem, PointFacts};
    use tempfile::tempdir;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn seed(root: &Path) {
        let acme = root.join("ACME");
        fs::create_dir_all(&acme).unwrap();
        write(
            &acme,
            "income.csv",
            "date,Total Revenue,EBIT\n2021-12-31,1000,200\n2022-12-31,1100,220\n2023-12-31,1210,242\n",
        );
        write(&acme, "balance.csv", "year,Cash And Cash Equivalents,Total Debt\n2023,150,400\n");
        write(&acme, "info.csv", "sharesOutstanding,floatShares,currentPrice\n100,90,20.5\n");
        fs::create_dir_all(root.join("BARE")).unwrap();
    }

    #[test]
    fn loads_ticker_directory() {
        let tmp = tempdir().unwrap();
        seed(tmp.path());
        let provider = CsvProvider::new(tmp.path());

        let fin = provider.financials(&Symbol::new("ACME")).unwrap();
        assert_eq!(fin.symbol, Symbol::new("ACME"));
        assert_eq!(fin.series(LineItem::Revenue).unwrap().len(), 3);
        assert_eq!(fin.latest(LineItem::Cash), Some((FiscalYear(2023), 150.0)));
        assert!(fin.cash_flow.is_empty());
        assert_eq!(fin.facts.shares_outstanding, Some(100.0));
        assert_eq!(fin.facts.float_shares, Some(90.0));
        assert_eq!(fin.facts.price, Some(20.5));
    }

    #[test]
    fn empty_ticker_directory_has_no_data() {
        let tmp = tempdir().unwrap();
        seed(tmp.path());
        let fin = CsvProvider::new(tmp.path()).financials(&Symbol::new("BARE")).unwrap();
        assert!(fin.income.is_empty());
        assert_eq!(fin.facts, PointFacts::default());
    }

    #[test]
    fn unknown_ticker_is_not_found() {
        let tmp = tempdir().unwrap();
        let provider = CsvProvider::new(tmp.path());
        assert_eq!(
            provider.financials(&Symbol::new("NOPE")),
            Err(ProviderError::NotFound(Symbol::new("NOPE")))
        );
    }

    #[test]
    fn bad_dates_are_malformed() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("BAD");
        fs::create_dir_all(&dir).unwrap();
        write(&dir, "income.csv", "date,EBIT\n31/12/2023,1\n");

        let err = CsvProvider::new(tmp.path()).financials(&Symbol::new("BAD")).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    #[test]
    fn lists_symbols() {
        let tmp = tempdir().unwrap();
        seed(tmp.path());
        write(tmp.path(), "README", "not a ticker");

        let symbols = CsvProvider::new(tmp.path()).symbols().unwrap();
        assert_eq!(symbols, vec![Symbol::new("ACME"), Symbol::new("BARE")]);
        assert_eq!(CsvProvider::new(tmp.path()).name(), "csv");
    }
}
