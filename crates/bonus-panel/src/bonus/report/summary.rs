use super::super::domain::{Period, PeriodResult};
use super::super::normalize::normalize;
use super::views::{BonusReportView, EmployeeCardView, ReportTotalsView};
use serde::{Deserialize, Serialize};

/// Narrowing applied to a computed period before it is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Case-insensitive substring of the employee name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub tenure: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, result: &PeriodResult) -> bool {
        let employee = &result.employee;

        if let Some(name) = non_empty(&self.name) {
            if !normalize(&employee.name).contains(&normalize(name)) {
                return false;
            }
        }

        [
            (&self.role, &employee.role),
            (&self.city, &employee.city),
            (&self.tenure, &employee.tenure),
        ]
        .into_iter()
        .all(|(wanted, actual)| match non_empty(wanted) {
            Some(wanted) => normalize(wanted) == normalize(actual),
            None => true,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReportTotals {
    pub target: f64,
    pub earned: f64,
    pub forfeited: f64,
}

impl ReportTotals {
    fn from_results(results: &[PeriodResult]) -> Self {
        results.iter().fold(Self::default(), |totals, result| Self {
            target: totals.target + result.target,
            earned: totals.earned + result.earned,
            forfeited: totals.forfeited + result.forfeited,
        })
    }

    pub fn to_view(&self) -> ReportTotalsView {
        ReportTotalsView::from_totals(self)
    }
}

/// Filtered, ranked results for one period with their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusReport {
    pub period: Period,
    pub entries: Vec<PeriodResult>,
    pub totals: ReportTotals,
}

impl BonusReport {
    pub fn build(period: Period, results: Vec<PeriodResult>, filter: &ReportFilter) -> Self {
        let mut entries: Vec<PeriodResult> = results
            .into_iter()
            .filter(|result| filter.matches(result))
            .collect();
        entries.sort_by(|left, right| right.percentage.total_cmp(&left.percentage));

        let totals = ReportTotals::from_results(&entries);

        Self {
            period,
            entries,
            totals,
        }
    }

    pub fn cards(&self) -> Vec<EmployeeCardView> {
        self.entries
            .iter()
            .map(|entry| EmployeeCardView::from_result(entry, self.period.is_quarter()))
            .collect()
    }

    pub fn view(&self) -> BonusReportView {
        let (cities, tenures) = self.facets();
        BonusReportView {
            period: self.period.label().to_string(),
            totals: self.totals.to_view(),
            employees: self.cards(),
            cities,
            tenures,
        }
    }

    /// Distinct cities and tenure buckets present in the report, for filter pickers.
    pub fn facets(&self) -> (Vec<String>, Vec<String>) {
        let mut cities: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.employee.city.clone())
            .collect();
        cities.sort();
        cities.dedup();

        let mut tenures: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.employee.tenure.clone())
            .collect();
        tenures.sort();
        tenures.dedup();

        (cities, tenures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::domain::EmployeeKey;

    fn result(name: &str, role: &str, city: &str, target: f64, earned: f64) -> PeriodResult {
        PeriodResult {
            employee: EmployeeKey {
                city: city.to_string(),
                name: name.to_string(),
                role: role.to_string(),
                admission_date: "2020-02-01".to_string(),
                tenure: "4 years".to_string(),
            },
            target,
            earned,
            forfeited: target - earned,
            percentage: if target == 0.0 { 0.0 } else { earned / target * 100.0 },
            badge: String::new(),
            observation: String::new(),
            missed: Vec::new(),
        }
    }

    fn sample() -> Vec<PeriodResult> {
        vec![
            result("Maria Clara", "Vendedor", "Chapadinha", 300.0, 150.0),
            result("José Ramos", "Vistoriador", "Santa Inês", 300.0, 300.0),
            result("Ana Maria", "Vendedor", "Santa Inês", 0.0, 0.0),
        ]
    }

    #[test]
    fn ranks_by_percentage_and_sums_totals() {
        let report = BonusReport::build(Period::Quarter, sample(), &ReportFilter::default());

        let names: Vec<&str> = report
            .entries
            .iter()
            .map(|entry| entry.employee.name.as_str())
            .collect();
        assert_eq!(names, vec!["José Ramos", "Maria Clara", "Ana Maria"]);
        assert_eq!(report.totals.target, 600.0);
        assert_eq!(report.totals.earned, 450.0);
        assert_eq!(report.totals.forfeited, 150.0);
    }

    #[test]
    fn filters_by_name_fragment_and_city() {
        let filter = ReportFilter {
            name: Some("maria".to_string()),
            city: Some("SANTA INES".to_string()),
            ..ReportFilter::default()
        };

        let report = BonusReport::build(Period::Quarter, sample(), &filter);

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].employee.name, "Ana Maria");
    }

    #[test]
    fn blank_filters_are_ignored() {
        let filter = ReportFilter {
            role: Some("  ".to_string()),
            ..ReportFilter::default()
        };

        let report = BonusReport::build(Period::Quarter, sample(), &filter);

        assert_eq!(report.entries.len(), 3);
    }

    #[test]
    fn view_labels_quarter_cards() {
        let report = BonusReport::build(Period::Quarter, sample(), &ReportFilter::default());

        let view = report.view();

        assert_eq!(view.period, "QUARTER");
        assert_eq!(view.employees[0].name, "José Ramos");
        assert_eq!(view.employees[0].target_kind, "Quarterly target");
        assert_eq!(view.employees[0].percentage_label, "100.00%");
        assert_eq!(view.totals.earned_label, "R$ 450.00");
        assert_eq!(view.employees[0].admission_date, "01/02/2020");
    }

    #[test]
    fn facets_list_distinct_values() {
        let report = BonusReport::build(Period::Quarter, sample(), &ReportFilter::default());

        let (cities, tenures) = report.facets();

        assert_eq!(
            cities,
            vec!["Chapadinha".to_string(), "Santa Inês".to_string()]
        );
        assert_eq!(tenures, vec!["4 years".to_string()]);
    }
}
