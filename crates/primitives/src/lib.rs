#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairvalue/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod symbol;
pub use symbol::Symbol;

mod series;
pub use series::{FiscalYear, TimeSeries};

mod financials;
pub use financials::{CompanyFinancials, LineItem, PointFacts, Statement, StatementKind};

mod assumptions;
pub use assumptions::{Assumptions, CapitalConvention};

mod projection;
pub use projection::{ForecastYear, ProjectionRow};

mod valuation;
pub use valuation::{BridgeWarning, RangeMethod, ValuationBand, ValuationResult};

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
