use serde::Serialize;
use validator::Validate;

use crate::utils::constants::DEFAULT_SEVERITY_SCORE;

/// Categorical accident severity as reported in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Minor" => Some(Severity::Minor),
            "Moderate" => Some(Severity::Moderate),
            "Severe" => Some(Severity::Severe),
            _ => None,
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Severity::Minor => 1,
            Severity::Moderate => 2,
            Severity::Severe => 3,
        }
    }
}

/// Ordinal score for a severity label; unknown or missing labels score 1.
pub fn severity_score(label: Option<&str>) -> u8 {
    label
        .and_then(Severity::from_label)
        .map_or(DEFAULT_SEVERITY_SCORE, Severity::score)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct FactAccident {
    pub accident_id: i64,

    /// `None` when the accident date has no row in `Dim_Date`
    pub date_id: Option<i64>,

    /// `None` when the accident location has no row in `Dim_Location`
    pub location_id: Option<i64>,

    #[validate(range(min = 1, max = 200))]
    pub vehicle_id: i64,

    pub road_condition_id: i64,

    pub vehicles_involved: Option<i64>,

    #[validate(range(min = 1, max = 3))]
    pub severity_score: u8,
}
