use super::domain::MonthName;
use super::normalize::normalize;
use serde::Serialize;
use std::collections::HashMap;

/// Company-wide monthly indicators consulted by the sub-goal rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorFlag {
    Quality,
    Financial,
    StoreOrganization,
    LeadershipOrganization,
}

impl IndicatorFlag {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Quality,
            Self::Financial,
            Self::StoreOrganization,
            Self::LeadershipOrganization,
        ]
    }

    /// Normalized document keys accepted for this flag.
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Quality => &["QUALITY", "QUALIDADE"],
            Self::Financial => &["FINANCIAL", "FINANCEIRO"],
            Self::StoreOrganization => &["STORE_ORGANIZATION", "ORGANIZACAO_DA_LOJA"],
            Self::LeadershipOrganization => &[
                "LEADERSHIP_ORGANIZATION",
                "LEADERSHIP & ORGANIZATION",
                "LIDERANCA & ORGANIZACAO",
            ],
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = normalize(key);
        Self::ordered()
            .into_iter()
            .find(|flag| flag.keys().contains(&key.as_str()))
    }
}

/// Flags and per-city production results for one month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyIndicatorSet {
    flags: HashMap<IndicatorFlag, bool>,
    production_by_city: HashMap<String, bool>,
}

impl MonthlyIndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, flag: IndicatorFlag, achieved: bool) -> Self {
        self.set_flag(flag, achieved);
        self
    }

    pub fn with_production(mut self, city: &str, achieved: bool) -> Self {
        self.set_production(city, achieved);
        self
    }

    pub fn set_flag(&mut self, flag: IndicatorFlag, achieved: bool) {
        self.flags.insert(flag, achieved);
    }

    pub fn set_production(&mut self, city: &str, achieved: bool) {
        self.production_by_city.insert(normalize(city), achieved);
    }

    /// Missing flags count as achieved.
    pub fn flag(&self, flag: IndicatorFlag) -> bool {
        self.flags.get(&flag).copied().unwrap_or(true)
    }

    /// Cities without a production entry count as achieved.
    pub fn production_achieved(&self, city: &str) -> bool {
        self.production_by_city
            .get(&normalize(city))
            .copied()
            .unwrap_or(true)
    }
}

/// Indicator sets for every month of the reporting year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorCalendar {
    months: HashMap<MonthName, MonthlyIndicatorSet>,
}

impl IndicatorCalendar {
    pub fn insert(&mut self, month: MonthName, indicators: MonthlyIndicatorSet) {
        self.months.insert(month, indicators);
    }

    pub fn with_month(mut self, month: &str, indicators: MonthlyIndicatorSet) -> Self {
        self.insert(MonthName::new(month), indicators);
        self
    }

    pub fn month(&self, month: &MonthName) -> Option<&MonthlyIndicatorSet> {
        self.months.get(month)
    }

    pub fn months(&self) -> impl Iterator<Item = &MonthName> {
        self.months.keys()
    }
}
