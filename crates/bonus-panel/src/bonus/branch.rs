use super::normalize::normalize;
use super::quality::{CityQualityTable, QualityThresholds};
use std::collections::HashMap;

/// How one supervisor's production sub-goal is shared between cities.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorCitySplit {
    cities: Vec<(String, f64)>,
}

impl SupervisorCitySplit {
    pub fn new(cities: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            cities: cities
                .into_iter()
                .map(|(city, weight)| (normalize(&city), weight))
                .collect(),
        }
    }

    /// Normalized city names with their share of the production parcela.
    pub fn cities(&self) -> &[(String, f64)] {
        &self.cities
    }
}

/// Supervisors with a multi-city production split, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupervisorSplits {
    by_name: HashMap<String, SupervisorCitySplit>,
}

impl SupervisorSplits {
    pub fn insert(&mut self, supervisor: &str, split: SupervisorCitySplit) {
        self.by_name.insert(normalize(supervisor), split);
    }

    pub fn with_supervisor(mut self, supervisor: &str, split: SupervisorCitySplit) -> Self {
        self.insert(supervisor, split);
        self
    }

    pub fn get(&self, supervisor: &str) -> Option<&SupervisorCitySplit> {
        self.by_name.get(&normalize(supervisor))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Organizational facts about the branch that the weights document does not carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchProfile {
    pub quality: CityQualityTable,
    pub supervisor_splits: SupervisorSplits,
}

impl BranchProfile {
    /// Thresholds and splits in force for the current branch layout.
    pub fn standard() -> Self {
        const STANDARD_CITY_CEILINGS: &[(&str, f64, f64)] = &[
            ("BARRA DO CORDA", 0.035, 0.015),
            ("CHAPADINHA", 0.05, 0.02),
            ("SANTA INÊS", 0.035, 0.015),
            ("SÃO JOÃO DOS PATOS", 0.035, 0.015),
            ("SÃO JOSÉ DE RIBAMAR", 0.035, 0.015),
        ];

        let mut quality = CityQualityTable::new(QualityThresholds::default());
        for (city, total, severe) in STANDARD_CITY_CEILINGS {
            quality.insert(
                city,
                QualityThresholds {
                    total: *total,
                    severe: *severe,
                },
            );
        }

        let supervisor_splits = SupervisorSplits::default().with_supervisor(
            "MADSON RONNY PEREIRA MELO",
            SupervisorCitySplit::new([
                ("SÃO JOSÉ DE RIBAMAR".to_string(), 0.5),
                ("CHAPADINHA".to_string(), 0.5),
            ]),
        );

        Self {
            quality,
            supervisor_splits,
        }
    }
}
