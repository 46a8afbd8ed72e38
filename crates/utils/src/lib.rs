#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fairvalue/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod frame;
pub use frame::{DATE_COLUMN, YEAR_COLUMN, point_facts_from_frame, statement_from_frame};

mod export;
pub use export::{grid_frame, ratios_frame, schedule_frame, sweep_frame};

mod csv;
pub use csv::{CsvProvider, INFO_FILE, read_csv};

mod error;
pub use error::UtilsError;
