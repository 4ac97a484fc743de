use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One employee in one month, as read from the branch spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeMonthRecord {
    pub name: String,
    pub role: String,
    pub city: String,
    pub admission_date: String,
    pub tenure: String,
    /// `None` when the cell is empty or not a number.
    pub monthly_target: Option<f64>,
    pub observation: String,
    pub total_defect_rate: f64,
    pub severe_defect_rate: f64,
}

impl EmployeeMonthRecord {
    pub fn key(&self) -> EmployeeKey {
        EmployeeKey {
            city: self.city.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            admission_date: self.admission_date.clone(),
            tenure: self.tenure.clone(),
        }
    }
}

/// Identity used to line the same employee up across months.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeKey {
    pub city: String,
    pub name: String,
    pub role: String,
    pub admission_date: String,
    pub tenure: String,
}

impl EmployeeKey {
    /// Admission date when the sheet cell holds a recognizable date.
    pub fn admission_on(&self) -> Option<NaiveDate> {
        let raw = self.admission_date.trim();
        ["%Y-%m-%d", "%d/%m/%Y", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    }
}

/// Month label as used by the indicators document and the month sheets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthName(String);

impl MonthName {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(super::normalize::normalize(value.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reporting window: a single month or the quarter aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Month(MonthName),
    Quarter,
}

impl Period {
    pub fn parse(raw: &str) -> Self {
        let normalized = super::normalize::normalize(raw);
        match normalized.as_str() {
            "QUARTER" | "TRIMESTRE" => Self::Quarter,
            _ => Self::Month(MonthName(normalized)),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Month(month) => month.as_str(),
            Self::Quarter => "QUARTER",
        }
    }

    pub const fn is_quarter(&self) -> bool {
        matches!(self, Self::Quarter)
    }
}

/// Per sub-goal audit line kept alongside a computed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubGoalOutcome {
    pub name: String,
    pub kind: super::rules::SubGoalKind,
    pub parcela: f64,
    pub earned: f64,
    pub forfeited: f64,
}

/// Bonus computed for one employee-month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowResult {
    pub target: f64,
    pub earned: f64,
    pub forfeited: f64,
    pub percentage: f64,
    /// Empty when the employee participates in the period.
    pub badge: String,
    pub observation: String,
    pub missed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<SubGoalOutcome>,
}

impl RowResult {
    pub fn is_eligible(&self) -> bool {
        self.badge.is_empty()
    }
}

/// A row result together with the identity and month it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedRow {
    pub month: MonthName,
    pub employee: EmployeeKey,
    pub result: RowResult,
}

/// One employee's totals over a set of months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodResult {
    pub employee: EmployeeKey,
    pub target: f64,
    pub earned: f64,
    pub forfeited: f64,
    pub percentage: f64,
    pub badge: String,
    pub observation: String,
    pub missed: Vec<String>,
}

pub(crate) fn percentage_of(earned: f64, target: f64) -> f64 {
    if target == 0.0 {
        0.0
    } else {
        earned / target * 100.0
    }
}
