use super::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Defect-rate ceilings, both expressed as fractions (0.035 == 3.5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub total: f64,
    #[serde(alias = "graves")]
    pub severe: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            total: 0.035,
            severe: 0.015,
        }
    }
}

/// City-specific ceilings with a fallback pair for unlisted cities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityQualityTable {
    by_city: HashMap<String, QualityThresholds>,
    default: QualityThresholds,
}

impl CityQualityTable {
    pub fn new(default: QualityThresholds) -> Self {
        Self {
            by_city: HashMap::new(),
            default,
        }
    }

    pub fn with_city(mut self, city: &str, thresholds: QualityThresholds) -> Self {
        self.insert(city, thresholds);
        self
    }

    pub fn insert(&mut self, city: &str, thresholds: QualityThresholds) {
        self.by_city.insert(normalize(city), thresholds);
    }

    pub fn thresholds_for(&self, city: &str) -> QualityThresholds {
        self.by_city
            .get(&normalize(city))
            .copied()
            .unwrap_or(self.default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditLevel {
    Full,
    Half,
    Zero,
}

impl CreditLevel {
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Full => 1.0,
            Self::Half => 0.5,
            Self::Zero => 0.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Full => "100%",
            Self::Half => "50%",
            Self::Zero => "0%",
        }
    }
}

/// Coerces a defect rate to a fraction. Values above 1 are read as percents.
pub fn pct_fraction(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

/// Inspector quality credit: both ceilings met, one missed, or both missed.
pub fn score(total: f64, severe: f64, thresholds: QualityThresholds) -> CreditLevel {
    let total = if total.is_nan() { 0.0 } else { total };
    let severe = if severe.is_nan() { 0.0 } else { severe };

    let total_ok = total <= thresholds.total;
    let severe_ok = severe <= thresholds.severe;

    match (total_ok, severe_ok) {
        (true, true) => CreditLevel::Full,
        (false, false) => CreditLevel::Zero,
        _ => CreditLevel::Half,
    }
}
