//! Performance-bonus computation for the branch.
//!
//! Rows flow through the eligibility gate, then through each weighted sub-goal
//! of the employee's role, and finally into monthly or quarterly results.

pub mod branch;
pub mod domain;
pub mod eligibility;
mod engine;
pub mod format;
pub mod indicators;
pub mod normalize;
pub mod period;
pub mod quality;
pub mod report;
pub mod rules;
mod service;

pub use branch::{BranchProfile, SupervisorCitySplit, SupervisorSplits};
pub use domain::{
    ComputedRow, EmployeeKey, EmployeeMonthRecord, MonthName, Period, PeriodResult, RowResult,
    SubGoalOutcome,
};
pub use eligibility::Eligibility;
pub use engine::BonusEngine;
pub use indicators::{IndicatorCalendar, IndicatorFlag, MonthlyIndicatorSet};
pub use period::aggregate_period;
pub use quality::{CityQualityTable, CreditLevel, QualityThresholds};
pub use report::{BonusReport, ReportFilter, ReportTotals};
pub use rules::{RoleRuleSet, RuleBook, SubGoal, SubGoalKind};
pub use service::{BonusPanelService, InMemoryRowSource, RowSource, RowSourceError};
