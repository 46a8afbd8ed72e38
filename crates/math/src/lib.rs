#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairvalue/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod discount;
pub use discount::{discount_factor, discount_factors, gordon_growth};

mod stats;
pub use stats::{cagr, mean, percentile, yoy_growth};

mod range;
pub use range::{arange_inclusive, linspace};

mod error;
pub use error::MathError;
