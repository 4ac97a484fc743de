use super::domain::{percentage_of, ComputedRow, EmployeeKey, PeriodResult};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

impl PeriodResult {
    /// Single-month view of one computed row; missed items keep rule order.
    pub fn from_row(row: &ComputedRow) -> Self {
        let result = &row.result;
        Self {
            employee: row.employee.clone(),
            target: result.target,
            earned: result.earned,
            forfeited: result.forfeited,
            percentage: result.percentage,
            badge: result.badge.clone(),
            observation: result.observation.clone(),
            missed: result.missed.clone(),
        }
    }

    pub fn missed_summary(&self) -> String {
        self.missed.join(", ")
    }
}

#[derive(Default)]
struct Accumulator {
    target: f64,
    earned: f64,
    forfeited: f64,
    observations: BTreeSet<String>,
    badges: BTreeSet<String>,
    missed: BTreeSet<String>,
}

/// Merges several months of computed rows into one result per employee.
///
/// Employees come out sorted by their identity key (city, name, role,
/// admission date, tenure). Observation and badge texts are deduplicated and
/// sorted; missed items are tagged with their month before being deduplicated
/// and sorted.
pub fn aggregate_period(rows: &[ComputedRow]) -> Vec<PeriodResult> {
    let mut groups: BTreeMap<EmployeeKey, Accumulator> = BTreeMap::new();

    for row in rows {
        let accumulator = groups.entry(row.employee.clone()).or_default();

        let result = &row.result;
        accumulator.target += result.target;
        accumulator.earned += result.earned;
        accumulator.forfeited += result.forfeited;
        if !result.observation.is_empty() {
            accumulator.observations.insert(result.observation.clone());
        }
        if !result.badge.is_empty() {
            accumulator.badges.insert(result.badge.clone());
        }
        for item in &result.missed {
            accumulator
                .missed
                .insert(format!("{item} ({})", row.month));
        }
    }

    let results: Vec<PeriodResult> = groups
        .into_iter()
        .map(|(employee, accumulator)| PeriodResult {
            employee,
            target: accumulator.target,
            earned: accumulator.earned,
            forfeited: accumulator.forfeited,
            percentage: percentage_of(accumulator.earned, accumulator.target),
            badge: join_sorted(accumulator.badges, " / "),
            observation: join_sorted(accumulator.observations, ", "),
            missed: accumulator.missed.into_iter().collect(),
        })
        .collect();

    info!(
        rows = rows.len(),
        employees = results.len(),
        "period aggregated"
    );

    results
}

fn join_sorted(values: BTreeSet<String>, separator: &str) -> String {
    values.into_iter().collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::domain::{MonthName, RowResult};

    fn employee(name: &str) -> EmployeeKey {
        EmployeeKey {
            city: "Chapadinha".to_string(),
            name: name.to_string(),
            role: "Vendedor".to_string(),
            admission_date: "2022-01-10".to_string(),
            tenure: "2 years".to_string(),
        }
    }

    fn row(month: &str, name: &str, target: f64, earned: f64, missed: &[&str]) -> ComputedRow {
        ComputedRow {
            month: MonthName::new(month),
            employee: employee(name),
            result: RowResult {
                target,
                earned,
                forfeited: target - earned,
                percentage: percentage_of(earned, target),
                badge: String::new(),
                observation: String::new(),
                missed: missed.iter().map(|item| item.to_string()).collect(),
                breakdown: Vec::new(),
            },
        }
    }

    #[test]
    fn quarter_sums_money_and_recomputes_percentage() {
        let rows = vec![
            row("JULY", "Maria", 100.0, 100.0, &[]),
            row("AUGUST", "Maria", 100.0, 50.0, &["Quality"]),
            row("SEPTEMBER", "Maria", 100.0, 100.0, &[]),
        ];

        let results = aggregate_period(&rows);

        assert_eq!(results.len(), 1);
        let maria = &results[0];
        assert_eq!(maria.target, 300.0);
        assert_eq!(maria.earned, 250.0);
        assert_eq!(maria.forfeited, 50.0);
        assert!((maria.percentage - 83.333_333).abs() < 1e-4);
        assert_eq!(maria.missed, vec!["Quality (AUGUST)".to_string()]);
    }

    #[test]
    fn missed_items_are_month_tagged_and_deduplicated() {
        let rows = vec![
            row("JULY", "Maria", 100.0, 80.0, &["Quality", "Profitability"]),
            row("JULY", "Maria", 0.0, 0.0, &["Quality"]),
            row("AUGUST", "Maria", 100.0, 80.0, &["Quality"]),
        ];

        let results = aggregate_period(&rows);

        assert_eq!(
            results[0].missed,
            vec![
                "Profitability (JULY)".to_string(),
                "Quality (AUGUST)".to_string(),
                "Quality (JULY)".to_string(),
            ]
        );
        assert_eq!(
            results[0].missed_summary(),
            "Profitability (JULY), Quality (AUGUST), Quality (JULY)"
        );
    }

    #[test]
    fn badges_and_observations_merge_as_sorted_sets() {
        let mut july = row("JULY", "Maria", 0.0, 0.0, &[]);
        july.result.badge = "On leave this period".to_string();
        july.result.observation = "Maternity leave".to_string();
        let mut august = row("AUGUST", "Maria", 0.0, 0.0, &[]);
        august.result.badge = "On leave this period".to_string();
        august.result.observation = "Maternity leave".to_string();
        let mut september = row("SEPTEMBER", "Maria", 0.0, 0.0, &[]);
        september.result.badge = "No eligibility this period".to_string();
        september.result.observation = "Back on 10/10".to_string();

        let results = aggregate_period(&[july, august, september]);

        let maria = &results[0];
        assert_eq!(
            maria.badge,
            "No eligibility this period / On leave this period"
        );
        assert_eq!(maria.observation, "Back on 10/10, Maternity leave");
        assert_eq!(maria.percentage, 0.0);
    }

    #[test]
    fn employees_are_grouped_in_key_order() {
        let mut elsewhere = row("JULY", "Bruno", 100.0, 100.0, &[]);
        elsewhere.employee.city = "Bacabal".to_string();
        let rows = vec![
            row("JULY", "Pedro", 100.0, 100.0, &[]),
            row("JULY", "Ana", 100.0, 100.0, &[]),
            elsewhere,
            row("AUGUST", "Pedro", 100.0, 100.0, &[]),
        ];

        let names: Vec<String> = aggregate_period(&rows)
            .into_iter()
            .map(|result| result.employee.name)
            .collect();

        assert_eq!(
            names,
            vec!["Bruno".to_string(), "Ana".to_string(), "Pedro".to_string()]
        );
    }

    #[test]
    fn single_month_view_keeps_rule_order() {
        let computed = row("JULY", "Ana", 100.0, 60.0, &["Quality", "Profitability"]);

        let view = PeriodResult::from_row(&computed);

        assert_eq!(view.missed_summary(), "Quality, Profitability");
        assert_eq!(view.target, 100.0);
    }
}
