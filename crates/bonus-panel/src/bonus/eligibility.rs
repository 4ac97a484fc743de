use super::normalize::normalize;
use serde::Serialize;

const LEAVE_MARKERS: &[&str] = &["LICEN", "LEAVE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    NoTarget,
    OnLeave,
}

impl Eligibility {
    /// Target check runs before the leave check.
    pub fn evaluate(monthly_target: Option<f64>, observation: &str) -> Self {
        match monthly_target {
            None => return Self::NoTarget,
            Some(target) if target == 0.0 || target.is_nan() => return Self::NoTarget,
            Some(_) => {}
        }

        let observation = normalize(observation);
        if LEAVE_MARKERS
            .iter()
            .any(|marker| observation.contains(marker))
        {
            return Self::OnLeave;
        }

        Self::Eligible
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Self::Eligible => "",
            Self::NoTarget => "No eligibility this period",
            Self::OnLeave => "On leave this period",
        }
    }

    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }
}
