//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    /// Invalid percentile value.
    #[error("invalid percentile: {0} (must be in [0, 1])")]
    InvalidPercentile(f64),

    /// Empty data, or no finite values left after dropping NaN.
    #[error("empty data provided")]
    EmptyData,

    /// Malformed range specification.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Growth base that is zero or negative.
    #[error("non-positive base value: {0}")]
    NonPositiveBase(f64),

    /// Rate at or below -100%, for which discounting is undefined.
    #[error("rate {0} is at or below -100%")]
    RateOutOfDomain(f64),
}
