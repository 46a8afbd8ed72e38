//! Financial data provider trait definitions.

use std::collections::HashMap;

use fairvalue_primitives::{CompanyFinancials, Symbol};

/// Errors a data provider can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The provider has no data for the symbol.
    #[error("no financials found for {0}")]
    NotFound(Symbol),

    /// Data was found but could not be interpreted.
    #[error("malformed data for {symbol}: {reason}")]
    Malformed {
        /// Symbol being loaded.
        symbol: Symbol,
        /// What went wrong.
        reason: String,
    },

    /// Transport or storage failure.
    #[error("provider backend error: {0}")]
    Backend(String),
}

impl ProviderError {
    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// Source of normalized financial statements.
///
/// Implementations do all I/O. The engine is invoked only after
/// `financials` has returned, and never calls back into the provider.
pub trait FinancialsProvider: Send + Sync {
    /// Load statements and point facts for `symbol`.
    ///
    /// # Errors
    /// Returns `ProviderError` if the symbol is unknown or the data cannot be read.
    fn financials(&self, symbol: &Symbol) -> Result<CompanyFinancials, ProviderError>;

    /// Human-readable provider name for diagnostics.
    fn name(&self) -> &str;
}

/// In-memory provider over pre-built financials.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    companies: HashMap<Symbol, CompanyFinancials>,
}

impl StaticProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register financials under their own symbol, builder style.
    #[must_use]
    pub fn with(mut self, financials: CompanyFinancials) -> Self {
        self.companies.insert(financials.symbol.clone(), financials);
        self
    }
}

impl FinancialsProvider for StaticProvider {
    fn financials(&self, symbol: &Symbol) -> Result<CompanyFinancials, ProviderError> {
        self.companies.get(symbol).cloned().ok_or_else(|| ProviderError::NotFound(symbol.clone()))
    }

    fn name(&self) -> &str {
        "static"
    }
}
