//! # fairvalue
//!
//! Discounted cash flow valuation of listed companies from their historical
//! financial statements.
//!
//! This crate re-exports the fairvalue components behind feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Statements, assumptions and result types
//! - `traits`: The `FinancialsProvider` seam
//! - `math`: Discounting and summary statistics
//! - `model`: The valuation engine
//! - `utils`: Polars interchange and the CSV provider
//! - `cli`: The `valuate` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use fairvalue::model::{DcfModel, ReportConfig, ValuationReport};
//! use fairvalue::primitives::Assumptions;
//!
//! let model = DcfModel::new(&financials, Assumptions::default())?;
//! ValuationReport::build(&model, &ReportConfig::default()).print_summary();
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use fairvalue_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use fairvalue_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use fairvalue_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use fairvalue_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use fairvalue_utils as utils;
