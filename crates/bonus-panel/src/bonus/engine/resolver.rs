use super::super::branch::BranchProfile;
use super::super::domain::{EmployeeMonthRecord, SubGoalOutcome};
use super::super::format::format_pct;
use super::super::indicators::{IndicatorFlag, MonthlyIndicatorSet};
use super::super::normalize::{normalize, title_case};
use super::super::quality::{self, pct_fraction, CreditLevel};
use super::super::rules::{RoleRuleSet, SubGoal, SubGoalKind};

const SUPERVISOR_ROLE: &str = "SUPERVISOR";
const INSPECTOR_ROLES: &[&str] = &["INSPECTOR", "VISTORIADOR"];

pub(crate) struct RowContext<'a> {
    pub record: &'a EmployeeMonthRecord,
    pub indicators: &'a MonthlyIndicatorSet,
    pub branch: &'a BranchProfile,
}

/// Running totals for one row's sub-goals.
#[derive(Debug, Default)]
pub(crate) struct Resolution {
    pub earned: f64,
    pub forfeited: f64,
    pub missed: Vec<String>,
    pub breakdown: Vec<SubGoalOutcome>,
}

struct GoalOutcome {
    earned: f64,
    forfeited: f64,
    missed: Option<String>,
}

impl GoalOutcome {
    fn gated(parcela: f64, achieved: bool, label: &str) -> Self {
        if achieved {
            Self {
                earned: parcela,
                forfeited: 0.0,
                missed: None,
            }
        } else {
            Self {
                earned: 0.0,
                forfeited: parcela,
                missed: Some(label.to_string()),
            }
        }
    }
}

pub(crate) fn resolve_goals(rule_set: &RoleRuleSet, context: &RowContext<'_>) -> Resolution {
    let mut resolution = Resolution::default();
    let total = rule_set.total_for(context.record.monthly_target);

    for goal in &rule_set.goals {
        let parcela = total * goal.weight;
        let outcome = resolve_goal(goal, parcela, context);

        resolution.earned += outcome.earned;
        resolution.forfeited += outcome.forfeited;
        if let Some(item) = outcome.missed {
            resolution.missed.push(item);
        }
        resolution.breakdown.push(SubGoalOutcome {
            name: goal.name.clone(),
            kind: goal.kind,
            parcela,
            earned: outcome.earned,
            forfeited: outcome.forfeited,
        });
    }

    resolution
}

fn resolve_goal(goal: &SubGoal, parcela: f64, context: &RowContext<'_>) -> GoalOutcome {
    let indicators = context.indicators;

    match goal.kind {
        SubGoalKind::Production => resolve_production(parcela, context),
        SubGoalKind::Quality if is_inspector(&context.record.role) => {
            resolve_inspector_quality(parcela, context)
        }
        SubGoalKind::Quality => GoalOutcome::gated(
            parcela,
            indicators.flag(IndicatorFlag::Quality),
            SubGoalKind::Quality.label(),
        ),
        SubGoalKind::Profitability => GoalOutcome::gated(
            parcela,
            indicators.flag(IndicatorFlag::Financial),
            SubGoalKind::Profitability.label(),
        ),
        SubGoalKind::StoreOrganization => GoalOutcome::gated(
            parcela,
            indicators.flag(IndicatorFlag::StoreOrganization),
            SubGoalKind::StoreOrganization.label(),
        ),
        SubGoalKind::LeadershipOrganization => GoalOutcome::gated(
            parcela,
            indicators.flag(IndicatorFlag::LeadershipOrganization),
            SubGoalKind::LeadershipOrganization.label(),
        ),
        SubGoalKind::Generic => GoalOutcome::gated(parcela, true, ""),
    }
}

fn resolve_production(parcela: f64, context: &RowContext<'_>) -> GoalOutcome {
    let record = context.record;
    let split = if normalize(&record.role) == SUPERVISOR_ROLE {
        context.branch.supervisor_splits.get(&record.name)
    } else {
        None
    };

    let Some(split) = split else {
        let city_label = if record.city.trim().is_empty() {
            "city not informed".to_string()
        } else {
            title_case(&record.city)
        };
        return GoalOutcome::gated(
            parcela,
            context.indicators.production_achieved(&record.city),
            &format!("Production – {city_label}"),
        );
    };

    let mut earned = 0.0;
    let mut forfeited = 0.0;
    let mut failed_cities = Vec::new();
    for (city, weight) in split.cities() {
        let share = parcela * weight;
        if context.indicators.production_achieved(city) {
            earned += share;
        } else {
            forfeited += share;
            failed_cities.push(title_case(city));
        }
    }

    let missed =
        (!failed_cities.is_empty()).then(|| format!("Production – {}", failed_cities.join(", ")));

    GoalOutcome {
        earned,
        forfeited,
        missed,
    }
}

fn resolve_inspector_quality(parcela: f64, context: &RowContext<'_>) -> GoalOutcome {
    let record = context.record;
    let total = pct_fraction(record.total_defect_rate);
    let severe = pct_fraction(record.severe_defect_rate);
    let thresholds = context.branch.quality.thresholds_for(&record.city);

    let level = quality::score(total, severe, thresholds);
    let (earned, forfeited) = match level {
        CreditLevel::Full => (parcela, 0.0),
        CreditLevel::Half => (parcela * 0.5, parcela * 0.5),
        CreditLevel::Zero => (0.0, parcela),
    };

    let missed = (level != CreditLevel::Full).then(|| {
        format!(
            "Quality ({}) — total {} | severe {} (target: {} / {})",
            level.label(),
            format_pct(total),
            format_pct(severe),
            format_pct(thresholds.total),
            format_pct(thresholds.severe),
        )
    });

    GoalOutcome {
        earned,
        forfeited,
        missed,
    }
}

fn is_inspector(role: &str) -> bool {
    INSPECTOR_ROLES.contains(&normalize(role).as_str())
}
