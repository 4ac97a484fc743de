use super::super::domain::PeriodResult;
use super::super::format::{format_currency, format_pct};
use super::super::normalize::title_case;
use super::summary::ReportTotals;
use serde::Serialize;

/// Serialized shape of a whole report.
#[derive(Debug, Clone, Serialize)]
pub struct BonusReportView {
    pub period: String,
    pub totals: ReportTotalsView,
    pub employees: Vec<EmployeeCardView>,
    pub cities: Vec<String>,
    pub tenures: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportTotalsView {
    pub target: f64,
    pub target_label: String,
    pub earned: f64,
    pub earned_label: String,
    pub forfeited: f64,
    pub forfeited_label: String,
}

impl ReportTotalsView {
    pub(crate) fn from_totals(totals: &ReportTotals) -> Self {
        Self {
            target: totals.target,
            target_label: format_currency(totals.target),
            earned: totals.earned,
            earned_label: format_currency(totals.earned),
            forfeited: totals.forfeited,
            forfeited_label: format_currency(totals.forfeited),
        }
    }
}

/// One employee card as presented to the branch.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeCardView {
    pub name: String,
    pub role: String,
    pub city: String,
    pub admission_date: String,
    pub tenure: String,
    pub target_kind: &'static str,
    pub target: f64,
    pub earned: f64,
    pub forfeited: f64,
    pub percentage: f64,
    pub target_label: String,
    pub earned_label: String,
    pub forfeited_label: String,
    pub percentage_label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub badge: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub observation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missed: Vec<String>,
}

impl EmployeeCardView {
    pub fn from_result(result: &PeriodResult, quarter: bool) -> Self {
        let employee = &result.employee;
        Self {
            name: title_case(&employee.name),
            role: employee.role.clone(),
            city: employee.city.clone(),
            admission_date: employee
                .admission_on()
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| employee.admission_date.clone()),
            tenure: employee.tenure.clone(),
            target_kind: if quarter {
                "Quarterly target"
            } else {
                "Monthly target"
            },
            target: result.target,
            earned: result.earned,
            forfeited: result.forfeited,
            percentage: result.percentage,
            target_label: format_currency(result.target),
            earned_label: format_currency(result.earned),
            forfeited_label: format_currency(result.forfeited),
            percentage_label: format_pct(result.percentage / 100.0),
            badge: result.badge.clone(),
            observation: result.observation.clone(),
            missed: result.missed.clone(),
        }
    }
}
