mod resolver;

use super::branch::BranchProfile;
use super::domain::{
    percentage_of, ComputedRow, EmployeeMonthRecord, MonthName, RowResult,
};
use super::eligibility::Eligibility;
use super::indicators::MonthlyIndicatorSet;
use super::normalize::clean_observation;
use super::rules::RuleBook;
use resolver::{resolve_goals, Resolution, RowContext};
use tracing::{debug, warn};

/// Stateless calculator applying the role rule book and branch profile to rows.
#[derive(Debug, Clone)]
pub struct BonusEngine {
    rules: RuleBook,
    branch: BranchProfile,
}

impl BonusEngine {
    pub fn new(rules: RuleBook, branch: BranchProfile) -> Self {
        Self { rules, branch }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn branch(&self) -> &BranchProfile {
        &self.branch
    }

    pub fn compute_row(
        &self,
        record: &EmployeeMonthRecord,
        indicators: &MonthlyIndicatorSet,
    ) -> RowResult {
        let observation = clean_observation(&record.observation);

        let eligibility = Eligibility::evaluate(record.monthly_target, &record.observation);
        if !eligibility.is_eligible() {
            return RowResult {
                target: 0.0,
                earned: 0.0,
                forfeited: 0.0,
                percentage: 0.0,
                badge: eligibility.badge().to_string(),
                observation,
                missed: Vec::new(),
                breakdown: Vec::new(),
            };
        }

        let Some(rule_set) = self.rules.get(&record.role) else {
            warn!(role = %record.role, name = %record.name, "role missing from weights document");
            let target = record.monthly_target.unwrap_or_default();
            return aggregate_row(target, Resolution::default(), observation);
        };

        let context = RowContext {
            record,
            indicators,
            branch: &self.branch,
        };
        let resolution = resolve_goals(rule_set, &context);

        let target = rule_set.total_for(record.monthly_target);
        aggregate_row(target, resolution, observation)
    }

    /// Computes every row of one month sheet, in sheet order.
    pub fn compute_month(
        &self,
        month: &MonthName,
        records: &[EmployeeMonthRecord],
        indicators: &MonthlyIndicatorSet,
    ) -> Vec<ComputedRow> {
        records
            .iter()
            .map(|record| {
                let result = self.compute_row(record, indicators);
                debug!(
                    %month,
                    name = %record.name,
                    target = result.target,
                    earned = result.earned,
                    missed = result.missed.len(),
                    "bonus row computed"
                );
                ComputedRow {
                    month: month.clone(),
                    employee: record.key(),
                    result,
                }
            })
            .collect()
    }
}

fn aggregate_row(target: f64, resolution: Resolution, observation: String) -> RowResult {
    RowResult {
        target,
        earned: resolution.earned,
        forfeited: resolution.forfeited,
        percentage: percentage_of(resolution.earned, target),
        badge: String::new(),
        observation,
        missed: resolution.missed,
        breakdown: resolution.breakdown,
    }
}
