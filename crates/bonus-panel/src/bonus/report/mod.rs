mod summary;
pub mod views;

pub use summary::{BonusReport, ReportFilter, ReportTotals};
