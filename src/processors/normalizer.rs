use crate::models::{
    AccidentRecord, RawAccidentRecord, RawRoadConditionRecord, RawVehicleRecord,
    RoadConditionRecord, SourceBatches, VehicleRecord,
};
use crate::utils::values::{clean_text, parse_integer, parse_timestamp};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{info, warn};
use validator::Validate;

/// Non-blank source values per column that could not be parsed and were
/// set to null.
pub type CoercedCounts = BTreeMap<&'static str, usize>;

/// Typed batches after timestamp normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatches {
    pub vehicles: Vec<VehicleRecord>,
    pub accidents: Vec<AccidentRecord>,
    pub road_conditions: Vec<RoadConditionRecord>,
    pub coerced: CoercedCounts,
}

/// Converts raw source rows into typed records.
///
/// Unparseable timestamps and integers become `None` rather than failing the
/// batch; the number of coerced values is logged and counted per column.
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, batches: SourceBatches) -> NormalizedBatches {
        let mut coerced = CoercedCounts::new();
        let vehicles = self.normalize_vehicles(batches.vehicles, &mut coerced);
        let accidents = self.normalize_accidents(batches.accidents, &mut coerced);
        let road_conditions =
            self.normalize_road_conditions(batches.road_conditions, &mut coerced);

        NormalizedBatches {
            vehicles,
            accidents,
            road_conditions,
            coerced,
        }
    }

    pub fn normalize_vehicles(
        &self,
        raw: Vec<RawVehicleRecord>,
        coerced: &mut CoercedCounts,
    ) -> Vec<VehicleRecord> {
        let rows = raw.len();
        let records = raw
            .into_iter()
            .map(|row| VehicleRecord {
                vehicle_id: convert_integer("VehicleID", row.vehicle_id.as_deref(), coerced),
                vehicle_type: clean_text(row.vehicle_type),
            })
            .collect();

        log_coerced("VehicleID", rows, coerced);
        records
    }

    pub fn normalize_accidents(
        &self,
        raw: Vec<RawAccidentRecord>,
        coerced: &mut CoercedCounts,
    ) -> Vec<AccidentRecord> {
        let records: Vec<AccidentRecord> = raw
            .into_iter()
            .map(|row| {
                let mut record = AccidentRecord {
                    accident_id: convert_integer(
                        "AccidentID",
                        row.accident_id.as_deref(),
                        coerced,
                    ),
                    reported_at: convert_timestamp(
                        "ReportedAt",
                        row.reported_at.as_deref(),
                        coerced,
                    ),
                    location: clean_text(row.location),
                    vehicles_involved: convert_integer(
                        "VehiclesInvolved",
                        row.vehicles_involved.as_deref(),
                        coerced,
                    ),
                    severity: clean_text(row.severity),
                };

                if let Err(e) = record.validate() {
                    warn!(
                        accident_id = ?record.accident_id,
                        "Discarding invalid VehiclesInvolved value: {}", e
                    );
                    record.vehicles_involved = None;
                }

                record
            })
            .collect();

        info!("Converted ReportedAt to datetime for {} rows", records.len());
        for column in ["AccidentID", "ReportedAt", "VehiclesInvolved"] {
            log_coerced(column, records.len(), coerced);
        }
        records
    }

    pub fn normalize_road_conditions(
        &self,
        raw: Vec<RawRoadConditionRecord>,
        coerced: &mut CoercedCounts,
    ) -> Vec<RoadConditionRecord> {
        let records: Vec<RoadConditionRecord> = raw
            .into_iter()
            .map(|row| RoadConditionRecord {
                condition_id: convert_integer("ConditionID", row.condition_id.as_deref(), coerced),
                location: clean_text(row.location),
                recorded_at: convert_timestamp("RecordedAt", row.recorded_at.as_deref(), coerced),
                surface: clean_text(row.surface),
                visibility: clean_text(row.visibility),
            })
            .collect();

        info!("Converted RecordedAt to datetime for {} rows", records.len());
        for column in ["ConditionID", "RecordedAt"] {
            log_coerced(column, records.len(), coerced);
        }
        records
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Count a non-blank cell that failed to parse.
fn track<T>(
    column: &'static str,
    value: &str,
    parsed: Option<T>,
    coerced: &mut CoercedCounts,
) -> Option<T> {
    if parsed.is_none() && !value.trim().is_empty() {
        *coerced.entry(column).or_insert(0) += 1;
    }
    parsed
}

fn convert_timestamp(
    column: &'static str,
    value: Option<&str>,
    coerced: &mut CoercedCounts,
) -> Option<NaiveDateTime> {
    let value = value?;
    track(column, value, parse_timestamp(value), coerced)
}

fn convert_integer(
    column: &'static str,
    value: Option<&str>,
    coerced: &mut CoercedCounts,
) -> Option<i64> {
    let value = value?;
    track(column, value, parse_integer(value), coerced)
}

fn log_coerced(column: &str, rows: usize, coerced: &CoercedCounts) {
    if let Some(count) = coerced.get(column).filter(|count| **count > 0) {
        warn!(
            "{} of {} {} values could not be parsed and were set to null",
            count, rows, column
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_accident(id: &str, reported_at: &str, vehicles: &str) -> RawAccidentRecord {
        RawAccidentRecord {
            accident_id: Some(id.to_string()),
            reported_at: Some(reported_at.to_string()),
            location: Some(" Main St ".to_string()),
            vehicles_involved: Some(vehicles.to_string()),
            severity: Some("Severe".to_string()),
        }
    }

    #[test]
    fn test_normalize_accidents() {
        let mut coerced = CoercedCounts::new();
        let records = Normalizer::new().normalize_accidents(
            vec![
                raw_accident("1", "2024-02-10 09:05:00", "2"),
                raw_accident("2.0", "garbage", "3.0"),
                raw_accident("3", "2024-02-11", "-4"),
            ],
            &mut coerced,
        );

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].accident_id, Some(1));
        assert_eq!(
            records[0].reported_at,
            NaiveDate::from_ymd_opt(2024, 2, 10)
                .unwrap()
                .and_hms_opt(9, 5, 0)
        );
        assert_eq!(records[0].location.as_deref(), Some("Main St"));

        assert_eq!(records[1].accident_id, Some(2));
        assert_eq!(records[1].reported_at, None);
        assert_eq!(records[1].vehicles_involved, Some(3));

        // Negative counts are nulled rather than rejected
        assert_eq!(records[2].vehicles_involved, None);

        assert_eq!(coerced.get("ReportedAt"), Some(&1));
        assert_eq!(coerced.get("AccidentID"), None);
    }

    #[test]
    fn test_non_numeric_ids_are_counted() {
        let batches = Normalizer::new().normalize(SourceBatches {
            vehicles: vec![RawVehicleRecord {
                vehicle_id: Some("V-1".to_string()),
                vehicle_type: Some("Car".to_string()),
            }],
            accidents: vec![
                raw_accident("A-17", "2024-02-10 09:05:00", "2"),
                raw_accident("18", "2024-02-10 10:00:00", "many"),
                RawAccidentRecord {
                    accident_id: Some("  ".to_string()),
                    ..raw_accident("0", "2024-02-10 11:00:00", "1")
                },
            ],
            road_conditions: vec![],
        });

        assert_eq!(batches.accidents[0].accident_id, None);
        assert_eq!(batches.accidents[1].vehicles_involved, None);
        // Blank cells are missing, not unparseable
        assert_eq!(batches.accidents[2].accident_id, None);

        assert_eq!(batches.coerced.get("AccidentID"), Some(&1));
        assert_eq!(batches.coerced.get("VehiclesInvolved"), Some(&1));
        assert_eq!(batches.coerced.get("VehicleID"), Some(&1));
        assert_eq!(batches.coerced.get("ReportedAt"), None);
    }

    #[test]
    fn test_normalize_vehicles_and_conditions() {
        let normalizer = Normalizer::new();
        let mut coerced = CoercedCounts::new();
        let vehicles = normalizer.normalize_vehicles(
            vec![
                RawVehicleRecord {
                    vehicle_id: Some("4".to_string()),
                    vehicle_type: Some("Truck".to_string()),
                },
                RawVehicleRecord {
                    vehicle_id: Some("x".to_string()),
                    vehicle_type: Some(" ".to_string()),
                },
            ],
            &mut coerced,
        );
        assert_eq!(vehicles[0], VehicleRecord::new(4, "Truck"));
        assert_eq!(vehicles[1].vehicle_id, None);
        assert_eq!(vehicles[1].vehicle_type, None);

        let conditions = normalizer.normalize_road_conditions(
            vec![RawRoadConditionRecord {
                condition_id: Some("9".to_string()),
                location: Some("Main St".to_string()),
                recorded_at: Some("2024-02-10T08:00:00".to_string()),
                surface: Some("Icy".to_string()),
                visibility: None,
            }],
            &mut coerced,
        );
        assert_eq!(conditions[0].condition_id, Some(9));
        assert!(conditions[0].recorded_at.is_some());
        assert_eq!(conditions[0].visibility, None);
    }
}
