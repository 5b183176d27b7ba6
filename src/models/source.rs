use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Row of the `Vehicles` batch exactly as it appears in the source file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVehicleRecord {
    #[serde(rename = "VehicleID")]
    pub vehicle_id: Option<String>,
    #[serde(rename = "VehicleType")]
    pub vehicle_type: Option<String>,
}

/// Row of the `Accidents` batch exactly as it appears in the source file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAccidentRecord {
    #[serde(rename = "AccidentID")]
    pub accident_id: Option<String>,
    #[serde(rename = "ReportedAt")]
    pub reported_at: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "VehiclesInvolved")]
    pub vehicles_involved: Option<String>,
    #[serde(rename = "Severity")]
    pub severity: Option<String>,
}

/// Row of the `RoadConditions` batch exactly as it appears in the source file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRoadConditionRecord {
    #[serde(rename = "ConditionID")]
    pub condition_id: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "RecordedAt")]
    pub recorded_at: Option<String>,
    #[serde(rename = "Surface")]
    pub surface: Option<String>,
    #[serde(rename = "Visibility")]
    pub visibility: Option<String>,
}

/// The three raw batches read from a source.
#[derive(Debug, Clone, Default)]
pub struct SourceBatches {
    pub vehicles: Vec<RawVehicleRecord>,
    pub accidents: Vec<RawAccidentRecord>,
    pub road_conditions: Vec<RawRoadConditionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub vehicle_id: Option<i64>,
    pub vehicle_type: Option<String>,
}

impl VehicleRecord {
    pub fn new(vehicle_id: i64, vehicle_type: &str) -> Self {
        Self {
            vehicle_id: Some(vehicle_id),
            vehicle_type: Some(vehicle_type.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct AccidentRecord {
    pub accident_id: Option<i64>,
    pub reported_at: Option<NaiveDateTime>,
    pub location: Option<String>,

    #[validate(range(min = 0))]
    pub vehicles_involved: Option<i64>,

    pub severity: Option<String>,
}

impl AccidentRecord {
    pub fn new(
        accident_id: i64,
        reported_at: NaiveDateTime,
        location: &str,
        vehicles_involved: i64,
        severity: &str,
    ) -> Self {
        Self {
            accident_id: Some(accident_id),
            reported_at: Some(reported_at),
            location: Some(location.to_string()),
            vehicles_involved: Some(vehicles_involved),
            severity: Some(severity.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadConditionRecord {
    pub condition_id: Option<i64>,
    pub location: Option<String>,
    pub recorded_at: Option<NaiveDateTime>,
    pub surface: Option<String>,
    pub visibility: Option<String>,
}

impl RoadConditionRecord {
    pub fn new(
        condition_id: i64,
        location: &str,
        recorded_at: NaiveDateTime,
        surface: &str,
        visibility: &str,
    ) -> Self {
        Self {
            condition_id: Some(condition_id),
            location: Some(location.to_string()),
            recorded_at: Some(recorded_at),
            surface: Some(surface.to_string()),
            visibility: Some(visibility.to_string()),
        }
    }
}
