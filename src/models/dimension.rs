use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimLocation {
    pub location_id: i64,
    pub location_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimVehicle {
    pub vehicle_id: i64,
    pub vehicle_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimRoadCondition {
    pub road_condition_id: i64,
    pub surface: String,
    pub visibility: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimDate {
    pub date_id: i64,
    pub date: NaiveDate,
    pub month: u32,
    pub year: i32,
    /// First timestamp observed on `date`, kept verbatim
    pub time: NaiveDateTime,
}

impl DimDate {
    pub fn new(date_id: i64, time: NaiveDateTime) -> Self {
        let date = time.date();
        Self {
            date_id,
            date,
            month: date.month(),
            year: date.year(),
            time,
        }
    }
}

/// Output of the four dimension builders for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub locations: Vec<DimLocation>,
    pub vehicles: Vec<DimVehicle>,
    pub road_conditions: Vec<DimRoadCondition>,
    pub dates: Vec<DimDate>,
}
