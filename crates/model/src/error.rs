//! Error types for the valuation engine.

use fairvalue_math::MathError;
use fairvalue_primitives::LineItem;

use crate::Ratio;

/// Errors that can occur while valuing a company.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Too few historical observations to derive a ratio.
    #[error("insufficient history for {ratio}: need {required} observation(s), got {actual}")]
    InsufficientHistory {
        /// Ratio being derived.
        ratio: Ratio,
        /// Minimum observations needed.
        required: usize,
        /// Observations available.
        actual: usize,
    },

    /// A required concept is absent under every known alias.
    #[error("missing line item: {0}")]
    MissingLineItem(LineItem),

    /// An assumption is outside its domain.
    #[error("invalid assumption: {0}")]
    InvalidAssumption(String),

    /// Neither an override nor the provider gave a positive share count.
    #[error("share count unavailable: no positive override or provider value")]
    ShareCountUnavailable,

    /// Gordon growth requires the discount rate to exceed terminal growth.
    #[error(
        "terminal value undefined: discount rate {discount_rate} does not exceed terminal growth {terminal_growth}"
    )]
    UndefinedTerminalValue {
        /// Discount rate used.
        discount_rate: f64,
        /// Terminal growth rate used.
        terminal_growth: f64,
    },

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl ModelError {
    /// Returns whether this error reflects missing input data, as opposed
    /// to an invalid assumption. Reports skip the affected section and
    /// carry on with the rest.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientHistory { .. } | Self::MissingLineItem(_) | Self::ShareCountUnavailable
        )
    }
}
