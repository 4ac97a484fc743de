use crate::bonus::normalize::normalize;
use crate::bonus::{
    BranchProfile, CityQualityTable, IndicatorCalendar, IndicatorFlag, MonthName,
    MonthlyIndicatorSet, QualityThresholds, RoleRuleSet, RuleBook, SupervisorCitySplit,
    SupervisorSplits,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PRODUCTION_KEYS: &[&str] = &["PRODUCTION_BY_CITY", "PRODUCAO_POR_CIDADE"];

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {document}: {source}")]
    Json {
        document: String,
        source: serde_json::Error,
    },
    #[error("weight for goal '{goal}' of role '{role}' is not a number")]
    InvalidWeight { role: String, goal: String },
}

#[derive(Debug, Deserialize)]
struct RoleWeightsEntry {
    #[serde(default)]
    total: Option<f64>,
    #[serde(default, alias = "metas")]
    goals: Map<String, Value>,
}

/// Weights document: role -> total target and sub-goal weights.
pub fn parse_rule_book<R: Read>(reader: R) -> Result<RuleBook, DocumentError> {
    let document: Map<String, Value> =
        serde_json::from_reader(reader).map_err(|source| DocumentError::Json {
            document: "weights".to_string(),
            source,
        })?;

    let mut rule_sets = Vec::with_capacity(document.len());
    for (role, entry) in document {
        let entry: RoleWeightsEntry =
            serde_json::from_value(entry).map_err(|source| DocumentError::Json {
                document: format!("weights ({role})"),
                source,
            })?;

        let mut rule_set = match entry.total {
            Some(total) => RoleRuleSet::new(role.as_str(), total),
            None => {
                warn!(%role, "role has no total; stated monthly targets will be used");
                RoleRuleSet::without_total(role.as_str())
            }
        };

        for (goal, weight) in entry.goals {
            let weight = weight.as_f64().ok_or_else(|| DocumentError::InvalidWeight {
                role: role.clone(),
                goal: goal.clone(),
            })?;
            rule_set = rule_set.with_goal(goal, weight);
        }

        rule_sets.push(rule_set);
    }

    Ok(RuleBook::new(rule_sets))
}

/// Indicators document: month -> company flags and per-city production.
pub fn parse_indicator_calendar<R: Read>(reader: R) -> Result<IndicatorCalendar, DocumentError> {
    let document: Map<String, Value> =
        serde_json::from_reader(reader).map_err(|source| DocumentError::Json {
            document: "indicators".to_string(),
            source,
        })?;

    let mut calendar = IndicatorCalendar::default();
    for (month, entries) in document {
        let month = MonthName::new(&month);
        let Value::Object(entries) = entries else {
            warn!(%month, "month entry is not an object; month ignored");
            continue;
        };
        let mut indicators = MonthlyIndicatorSet::new();

        for (key, value) in entries {
            if PRODUCTION_KEYS.contains(&normalize(&key).as_str()) {
                apply_production(&month, &mut indicators, value);
                continue;
            }

            let Some(flag) = IndicatorFlag::from_key(&key) else {
                debug!(%month, %key, "ignoring unknown indicator");
                continue;
            };
            if !matches!(value, Value::Bool(_) | Value::Number(_)) {
                warn!(%month, %key, "indicator is not a boolean; read by truthiness");
            }
            indicators.set_flag(flag, truthy(&value));
        }

        calendar.insert(month, indicators);
    }

    Ok(calendar)
}

fn apply_production(month: &MonthName, indicators: &mut MonthlyIndicatorSet, value: Value) {
    let Value::Object(cities) = value else {
        warn!(%month, "production map is not an object; every city treated as achieved");
        return;
    };

    for (city, achieved) in cities {
        if !matches!(achieved, Value::Bool(_) | Value::Number(_)) {
            warn!(%month, %city, "production result is not a boolean; read by truthiness");
        }
        indicators.set_production(&city, truthy(&achieved));
    }
}

/// Zero, empty text, empty collections and null are falsy; everything else is truthy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

#[derive(Debug, Default, Deserialize)]
struct BranchDocument {
    #[serde(default)]
    default_quality: Option<QualityThresholds>,
    #[serde(default)]
    quality_by_city: Map<String, Value>,
    #[serde(default)]
    supervisor_splits: Map<String, Value>,
}

/// Branch document: quality ceilings per city and supervisor production splits.
pub fn parse_branch_profile<R: Read>(reader: R) -> Result<BranchProfile, DocumentError> {
    let json_error = |source| DocumentError::Json {
        document: "branch".to_string(),
        source,
    };
    let document: BranchDocument = serde_json::from_reader(reader).map_err(json_error)?;

    let mut quality = CityQualityTable::new(document.default_quality.unwrap_or_default());
    for (city, thresholds) in document.quality_by_city {
        let thresholds: QualityThresholds =
            serde_json::from_value(thresholds).map_err(json_error)?;
        quality.insert(&city, thresholds);
    }

    let mut supervisor_splits = SupervisorSplits::default();
    for (supervisor, cities) in document.supervisor_splits {
        let cities: Map<String, Value> = serde_json::from_value(cities).map_err(json_error)?;
        let shares = cities
            .into_iter()
            .map(|(city, weight)| {
                weight
                    .as_f64()
                    .map(|weight| (city.clone(), weight))
                    .ok_or_else(|| DocumentError::InvalidWeight {
                        role: supervisor.clone(),
                        goal: city,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        supervisor_splits.insert(&supervisor, SupervisorCitySplit::new(shares));
    }

    Ok(BranchProfile {
        quality,
        supervisor_splits,
    })
}

pub(crate) fn open_document(path: &Path) -> Result<std::fs::File, DocumentError> {
    std::fs::File::open(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}
