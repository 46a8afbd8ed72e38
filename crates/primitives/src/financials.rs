//! Financial statement containers and line-item alias tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{FiscalYear, Symbol, TimeSeries};

/// The three financial statements a provider supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    Balance,
    /// Cash-flow statement.
    CashFlow,
}

impl StatementKind {
    /// All statement kinds in probing order.
    pub const ALL: [Self; 3] = [Self::Income, Self::Balance, Self::CashFlow];
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Balance => write!(f, "balance"),
            Self::CashFlow => write!(f, "cashflow"),
        }
    }
}

/// A financial-statement concept the engine knows how to look up.
///
/// Providers label line items inconsistently across tickers, so each concept
/// carries an ordered list of accepted column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineItem {
    /// Total revenue.
    Revenue,
    /// Earnings before interest and taxes (operating income).
    Ebit,
    /// Earnings before interest, taxes, depreciation and amortization.
    Ebitda,
    /// Net income attributable to common holders.
    NetIncome,
    /// Net property, plant and equipment.
    NetFixedAssets,
    /// Depreciation and amortization expense.
    Depreciation,
    /// Capital expenditure (reported negative on cash-flow statements).
    Capex,
    /// Total current assets.
    CurrentAssets,
    /// Total current liabilities.
    CurrentLiabilities,
    /// Cash, equivalents and short-term investments.
    Cash,
    /// Total debt.
    TotalDebt,
    /// Ordinary shares outstanding / issued.
    SharesOutstanding,
}

impl LineItem {
    /// Accepted provider column names, most preferred first.
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Revenue => &["Total Revenue", "Operating Revenue", "Revenue"],
            Self::Ebit => &["EBIT", "Operating Income", "Ebit"],
            Self::Ebitda => &["EBITDA", "Normalized EBITDA", "Ebitda"],
            Self::NetIncome => &["Net Income", "Net Income Common Stockholders"],
            Self::NetFixedAssets => &["Net PPE", "Net Property Plant And Equipment"],
            Self::Depreciation => {
                &["Reconciled Depreciation", "Depreciation And Amortization", "Depreciation"]
            }
            Self::Capex => &["Capital Expenditure", "Capital Expenditures"],
            Self::CurrentAssets => &["Current Assets", "Total Current Assets"],
            Self::CurrentLiabilities => &["Current Liabilities", "Total Current Liabilities"],
            Self::Cash => &[
                "Cash Cash Equivalents And Short Term Investments",
                "Cash And Cash Equivalents",
                "Cash And Short Term Investments",
            ],
            Self::TotalDebt => &["Total Debt", "Short Long Term Debt Total"],
            Self::SharesOutstanding => &["Ordinary Shares Number", "Share Issued"],
        }
    }

    /// Statement where the concept normally lives; searched first.
    #[must_use]
    pub const fn home(self) -> StatementKind {
        match self {
            Self::Revenue | Self::Ebit | Self::Ebitda | Self::NetIncome | Self::Depreciation => {
                StatementKind::Income
            }
            Self::Capex => StatementKind::CashFlow,
            Self::NetFixedAssets
            | Self::CurrentAssets
            | Self::CurrentLiabilities
            | Self::Cash
            | Self::TotalDebt
            | Self::SharesOutstanding => StatementKind::Balance,
        }
    }

    /// Primary display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.aliases()[0]
    }
}

impl std::fmt::Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One financial statement: provider column name to yearly series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    items: BTreeMap<String, TimeSeries>,
}

impl Statement {
    /// Create an empty statement.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: BTreeMap::new() }
    }

    /// Add (or replace) a line item, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, series: TimeSeries) -> Self {
        self.insert(name, series);
        self
    }

    /// Add (or replace) a line item.
    pub fn insert(&mut self, name: impl Into<String>, series: TimeSeries) {
        self.items.insert(name.into(), series);
    }

    /// Series for an exact column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TimeSeries> {
        self.items.get(name)
    }

    /// First non-empty series among `candidates`, with the matching name.
    #[must_use]
    pub fn first_available<'a>(&'a self, candidates: &[&str]) -> Option<(&'a str, &'a TimeSeries)> {
        candidates.iter().find_map(|c| {
            self.items
                .get_key_value(*c)
                .filter(|(_, s)| !s.is_empty())
                .map(|(k, s)| (k.as_str(), s))
        })
    }

    /// Column names present.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.keys().map(String::as_str)
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Point-in-time facts reported outside the statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointFacts {
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Float shares, used when shares outstanding is not reported.
    pub float_shares: Option<f64>,
    /// Current market price per share.
    pub price: Option<f64>,
}

/// Everything the data provider knows about one company.
///
/// The engine treats this as read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Income statement.
    pub income: Statement,
    /// Balance sheet.
    pub balance: Statement,
    /// Cash-flow statement.
    pub cash_flow: Statement,
    /// Point facts (share count, price).
    pub facts: PointFacts,
}

impl CompanyFinancials {
    /// Create financials with empty statements.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            income: Statement::new(),
            balance: Statement::new(),
            cash_flow: Statement::new(),
            facts: PointFacts::default(),
        }
    }

    /// Borrow a statement by kind.
    #[must_use]
    pub const fn statement(&self, kind: StatementKind) -> &Statement {
        match kind {
            StatementKind::Income => &self.income,
            StatementKind::Balance => &self.balance,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    /// Resolve a concept to its provider column and series.
    ///
    /// Aliases are tried in preference order; for each alias the concept's
    /// home statement is checked before the other two.
    #[must_use]
    pub fn find(&self, item: LineItem) -> Option<(StatementKind, &str, &TimeSeries)> {
        let home = item.home();
        let order: Vec<StatementKind> = std::iter::once(home)
            .chain(StatementKind::ALL.into_iter().filter(|k| *k != home))
            .collect();

        item.aliases().iter().find_map(|alias| {
            order.iter().find_map(|kind| {
                self.statement(*kind).first_available(&[*alias]).map(|(name, s)| (*kind, name, s))
            })
        })
    }

    /// Series for a concept, if any alias is present.
    #[must_use]
    pub fn series(&self, item: LineItem) -> Option<&TimeSeries> {
        self.find(item).map(|(_, _, s)| s)
    }

    /// Most recent value of a concept.
    #[must_use]
    pub fn latest(&self, item: LineItem) -> Option<(FiscalYear, f64)> {
        self.series(item).and_then(TimeSeries::latest)
    }

    /// Share count reported by the provider, if any is positive.
    ///
    /// Tries shares outstanding, then float shares, then the latest
    /// balance-sheet share count.
    #[must_use]
    pub fn provider_shares(&self) -> Option<f64> {
        let positive = |v: &f64| v.is_finite() && *v > 0.0;
        self.facts
            .shares_outstanding
            .filter(positive)
            .or_else(|| self.facts.float_shares.filter(positive))
            .or_else(|| self.latest(LineItem::SharesOutstanding).map(|(_, v)| v).filter(positive))
    }
}
