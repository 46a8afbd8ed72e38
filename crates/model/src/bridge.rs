//! Enterprise value to per-share equity value.

use fairvalue_primitives::{BridgeWarning, CompanyFinancials, LineItem};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Most recent cash and debt balances, if reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalancePosition {
    /// Cash and short-term investments.
    pub cash: Option<f64>,
    /// Total debt.
    pub debt: Option<f64>,
}

impl BalancePosition {
    /// Position with both balances known.
    #[must_use]
    pub const fn new(cash: f64, debt: f64) -> Self {
        Self { cash: Some(cash), debt: Some(debt) }
    }

    /// Latest cash and debt from the balance sheet.
    #[must_use]
    pub fn from_financials(financials: &CompanyFinancials) -> Self {
        Self {
            cash: financials.latest(LineItem::Cash).map(|(_, v)| v),
            debt: financials.latest(LineItem::TotalDebt).map(|(_, v)| v),
        }
    }

    /// Cash minus debt, missing terms as zero, with a warning per substitution.
    #[must_use]
    pub fn net_cash(&self) -> (f64, Vec<BridgeWarning>) {
        let mut warnings = Vec::new();
        let cash = self.cash.unwrap_or_else(|| {
            warnings.push(BridgeWarning::MissingCash);
            0.0
        });
        let debt = self.debt.unwrap_or_else(|| {
            warnings.push(BridgeWarning::MissingDebt);
            0.0
        });
        (cash - debt, warnings)
    }
}

/// Equity value and its per-share figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityBridge {
    /// `EV + cash - debt`.
    pub equity_value: f64,
    /// Share count used.
    pub shares: f64,
    /// `equity_value / shares`.
    pub per_share: f64,
    /// Substitutions made for missing balances.
    pub warnings: Vec<BridgeWarning>,
}

/// Pick the share count: a positive override, else a positive provider value.
///
/// # Errors
/// Returns `ModelError::ShareCountUnavailable` if neither is positive.
pub fn resolve_shares(
    override_shares: Option<f64>,
    provider_shares: Option<f64>,
) -> Result<f64, ModelError> {
    let positive = |v: &f64| v.is_finite() && *v > 0.0;
    override_shares
        .filter(positive)
        .or_else(|| provider_shares.filter(positive))
        .ok_or(ModelError::ShareCountUnavailable)
}

/// Bridge enterprise value to equity value per share.
///
/// # Errors
/// Returns `ModelError::ShareCountUnavailable` if no positive share count
/// is available. Missing cash or debt never fails; it is reported in
/// `EquityBridge::warnings`.
pub fn bridge_to_equity(
    enterprise_value: f64,
    position: &BalancePosition,
    override_shares: Option<f64>,
    provider_shares: Option<f64>,
) -> Result<EquityBridge, ModelError> {
    let shares = resolve_shares(override_shares, provider_shares)?;
    let (net_cash, warnings) = position.net_cash();
    let equity_value = enterprise_value + net_cash;
    Ok(EquityBridge { equity_value, shares, per_share: equity_value / shares, warnings })
}
