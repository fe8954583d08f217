//! The reporting layer: pure, synchronous transformations from the
//! raw transaction and budget lists into dashboard-ready summaries.
//!
//! Every function here is total: malformed or empty input yields empty
//! or zero results, never an error. Nothing is cached between calls;
//! each report is recomputed from scratch, which is cheap at
//! personal-ledger volumes.

pub mod models;
pub mod service;

pub use models::{BudgetComparison, CategoryData, MonthlyData, Totals};
pub use service::ReportService;
