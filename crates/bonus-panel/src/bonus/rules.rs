use super::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

const PRODUCTION_PREFIXES: &[&str] = &["PRODUCTION", "PRODUCAO"];
const QUALITY_NAMES: &[&str] = &["QUALITY", "QUALIDADE"];
const PROFITABILITY_NAMES: &[&str] = &["PROFITABILITY", "LUCRATIVIDADE"];
const STORE_ORGANIZATION_MARKERS: &[&str] = &["STORE ORGANIZATION", "ORGANIZACAO DA LOJA"];
const LEADERSHIP_MARKERS: &[&str] = &["LEADERSHIP", "LIDERANCA"];
const ORGANIZATION_MARKERS: &[&str] = &["ORGANIZATION", "ORGANIZACAO"];

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Evaluation rule a sub-goal is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubGoalKind {
    Production,
    Quality,
    Profitability,
    StoreOrganization,
    LeadershipOrganization,
    Generic,
}

impl SubGoalKind {
    /// First match wins, in declaration order.
    pub fn classify(name: &str) -> Self {
        let key = normalize(name);

        if PRODUCTION_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
        {
            return Self::Production;
        }
        if QUALITY_NAMES.contains(&key.as_str()) {
            return Self::Quality;
        }
        if PROFITABILITY_NAMES.contains(&key.as_str()) {
            return Self::Profitability;
        }
        if contains_any(&key, STORE_ORGANIZATION_MARKERS) {
            return Self::StoreOrganization;
        }
        if contains_any(&key, LEADERSHIP_MARKERS) && contains_any(&key, ORGANIZATION_MARKERS) {
            return Self::LeadershipOrganization;
        }

        Self::Generic
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Quality => "Quality",
            Self::Profitability => "Profitability",
            Self::StoreOrganization => "Store Organization 5S",
            Self::LeadershipOrganization => "Leadership & Organization",
            Self::Generic => "Other",
        }
    }
}

fn contains_any(key: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| key.contains(marker))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubGoal {
    pub name: String,
    pub weight: f64,
    pub kind: SubGoalKind,
}

impl SubGoal {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        let name = name.into();
        let kind = SubGoalKind::classify(&name);
        Self { name, weight, kind }
    }
}

/// Weighted sub-goals and total target for one job function.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRuleSet {
    pub role: String,
    /// `None` when the weights document omits the total; the row's stated
    /// monthly target is used instead.
    pub total: Option<f64>,
    pub goals: Vec<SubGoal>,
}

impl RoleRuleSet {
    pub fn new(role: impl Into<String>, total: f64) -> Self {
        Self {
            role: role.into(),
            total: Some(total),
            goals: Vec::new(),
        }
    }

    pub fn without_total(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            total: None,
            goals: Vec::new(),
        }
    }

    pub fn total_for(&self, stated_target: Option<f64>) -> f64 {
        self.total.or(stated_target).unwrap_or_default()
    }

    pub fn with_goal(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.goals.push(SubGoal::new(name, weight));
        self
    }

    pub fn weight_sum(&self) -> f64 {
        self.goals.iter().map(|goal| goal.weight).sum()
    }
}

/// Every role's rule set, looked up by normalized role name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBook {
    roles: HashMap<String, RoleRuleSet>,
}

impl RuleBook {
    pub fn new(rule_sets: impl IntoIterator<Item = RoleRuleSet>) -> Self {
        let mut book = Self::default();
        for rule_set in rule_sets {
            book.insert(rule_set);
        }
        book
    }

    /// Registers a role under its normalized label; a later entry for the same
    /// label replaces the earlier one, which is returned.
    pub fn insert(&mut self, rule_set: RoleRuleSet) -> Option<RoleRuleSet> {
        let weight_sum = rule_set.weight_sum();
        if !rule_set.goals.is_empty() && (weight_sum - 1.0).abs() > WEIGHT_TOLERANCE {
            warn!(role = %rule_set.role, weight_sum, "sub-goal weights do not sum to 1.0");
        }

        let role = rule_set.role.clone();
        let previous = self.roles.insert(normalize(&role), rule_set);
        if let Some(previous) = &previous {
            warn!(%role, previous = %previous.role, "role listed twice; the later entry wins");
        }
        previous
    }

    pub fn get(&self, role: &str) -> Option<&RoleRuleSet> {
        self.roles.get(&normalize(role))
    }

    /// Role labels as written in the weights document, sorted.
    pub fn role_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.roles.values().map(|set| set.role.as_str()).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
