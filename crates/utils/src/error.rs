//! Error types for tabular interchange and file-backed providers.

/// Errors that can occur while reading or writing tabular data.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A period-end value that is not an ISO date.
    #[error("invalid period date: {0}")]
    InvalidDate(String),
}
