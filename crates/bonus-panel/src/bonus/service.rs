use super::domain::{ComputedRow, EmployeeMonthRecord, MonthName, Period, PeriodResult};
use super::engine::BonusEngine;
use super::indicators::{IndicatorCalendar, MonthlyIndicatorSet};
use super::period::aggregate_period;
use super::report::{BonusReport, ReportFilter};
use std::collections::HashMap;
use tracing::{info, warn};

/// Supplies the employee rows of one month sheet.
pub trait RowSource: Send + Sync {
    fn month_rows(&self, month: &MonthName) -> Result<Vec<EmployeeMonthRecord>, RowSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RowSourceError {
    #[error("no sheet available for month {0}")]
    MissingMonth(MonthName),
    #[error(transparent)]
    Import(#[from] crate::import::RowImportError),
}

/// Month sheets already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRowSource {
    months: HashMap<MonthName, Vec<EmployeeMonthRecord>>,
}

impl InMemoryRowSource {
    pub fn insert(&mut self, month: MonthName, rows: Vec<EmployeeMonthRecord>) {
        self.months.insert(month, rows);
    }

    pub fn with_month(mut self, month: &str, rows: Vec<EmployeeMonthRecord>) -> Self {
        self.insert(MonthName::new(month), rows);
        self
    }
}

impl RowSource for InMemoryRowSource {
    fn month_rows(&self, month: &MonthName) -> Result<Vec<EmployeeMonthRecord>, RowSourceError> {
        self.months
            .get(month)
            .cloned()
            .ok_or_else(|| RowSourceError::MissingMonth(month.clone()))
    }
}

/// Runs the engine over month sheets and shapes the result for a period.
pub struct BonusPanelService<S: RowSource> {
    engine: BonusEngine,
    calendar: IndicatorCalendar,
    quarter_months: Vec<MonthName>,
    rows: S,
}

impl<S: RowSource> BonusPanelService<S> {
    pub fn new(
        engine: BonusEngine,
        calendar: IndicatorCalendar,
        quarter_months: Vec<MonthName>,
        rows: S,
    ) -> Self {
        Self {
            engine,
            calendar,
            quarter_months,
            rows,
        }
    }

    pub fn engine(&self) -> &BonusEngine {
        &self.engine
    }

    pub fn quarter_months(&self) -> &[MonthName] {
        &self.quarter_months
    }

    /// Computes every row of one month against that month's indicators.
    pub fn compute_month(&self, month: &MonthName) -> Result<Vec<ComputedRow>, RowSourceError> {
        let records = self.rows.month_rows(month)?;
        Ok(self.compute_records(month, &records))
    }

    pub fn compute_records(
        &self,
        month: &MonthName,
        records: &[EmployeeMonthRecord],
    ) -> Vec<ComputedRow> {
        let fallback = MonthlyIndicatorSet::default();
        let indicators = match self.calendar.month(month) {
            Some(indicators) => indicators,
            None => {
                warn!(%month, "month missing from indicators document; every indicator counts as achieved");
                &fallback
            }
        };

        self.engine.compute_month(month, records, indicators)
    }

    /// Per-employee results for a month, or the quarter aggregate.
    pub fn period_results(&self, period: &Period) -> Result<Vec<PeriodResult>, RowSourceError> {
        let results = match period {
            Period::Month(month) => self
                .compute_month(month)?
                .iter()
                .map(PeriodResult::from_row)
                .collect(),
            Period::Quarter => {
                let mut rows = Vec::new();
                for month in &self.quarter_months {
                    rows.extend(self.compute_month(month)?);
                }
                aggregate_period(&rows)
            }
        };

        Ok(results)
    }

    pub fn report(
        &self,
        period: Period,
        filter: &ReportFilter,
    ) -> Result<BonusReport, RowSourceError> {
        let results = self.period_results(&period)?;
        let report = BonusReport::build(period, results, filter);

        info!(
            period = report.period.label(),
            employees = report.entries.len(),
            target = report.totals.target,
            earned = report.totals.earned,
            forfeited = report.totals.forfeited,
            "bonus report built"
        );

        Ok(report)
    }

    /// Report over rows supplied by the caller instead of the stored sheet.
    pub fn report_from_records(
        &self,
        month: MonthName,
        records: &[EmployeeMonthRecord],
        filter: &ReportFilter,
    ) -> BonusReport {
        let results = self
            .compute_records(&month, records)
            .iter()
            .map(PeriodResult::from_row)
            .collect();
        let report = BonusReport::build(Period::Month(month), results, filter);

        info!(
            period = report.period.label(),
            employees = report.entries.len(),
            earned = report.totals.earned,
            "bonus report built from supplied rows"
        );

        report
    }
}
