#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairvalue/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod ratios;
pub use ratios::{HistoricalRatios, Ratio, RatioObservations, extract_ratios, extract_ratios_in};

mod projector;
pub use projector::{Drivers, Forecast, ProjectionBase, project};

mod discounting;
pub use discounting::{DiscountedCashFlows, discount_cash_flows};

mod bridge;
pub use bridge::{BalancePosition, EquityBridge, bridge_to_equity, resolve_shares};

mod valuation;
pub use valuation::{DcfModel, ValuationRun, valuate};

mod sensitivity;
pub use sensitivity::{
    AxisSpec, GridSpec, SensitivityGrid, Sweep, SweepFactor, SweepSpec, sensitivity_grid, sweep,
};

mod football_field;
pub use football_field::{
    DcfRange, EvEbitdaMultiple, FieldInputs, FootballField, MultiplesConfig, PeMultiple,
    ValuationMethod, football_field,
};

mod report;
pub use report::{ReportConfig, ValuationReport};

mod validate;
pub use validate::{ValidationBounds, validate};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use fairvalue_primitives::{Assumptions, CapitalConvention, CompanyFinancials};

    pub use super::{
        DcfModel, GridSpec, ModelError, MultiplesConfig, ReportConfig, ValuationReport, valuate,
    };
}
