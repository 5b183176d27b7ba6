use crate::models::{
    AccidentRecord, DimDate, DimLocation, DimRoadCondition, DimVehicle, Dimensions,
    RoadConditionRecord, VehicleRecord,
};
use crate::processors::normalizer::NormalizedBatches;
use std::collections::HashSet;
use tracing::{info, warn};

/// Builds the four dimension tables from scratch for a single run.
///
/// Every builder is a pure function of its input batch, so two runs over the
/// same input assign identical surrogate keys.
pub struct DimensionBuilder;

impl DimensionBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_all(&self, batches: &NormalizedBatches) -> Dimensions {
        Dimensions {
            locations: self.build_location_dim(&batches.accidents),
            vehicles: self.build_vehicle_dim(&batches.vehicles),
            road_conditions: self.build_road_condition_dim(&batches.road_conditions),
            dates: self.build_date_dim(&batches.accidents),
        }
    }

    /// Distinct accident locations in first-seen order, numbered from 1.
    pub fn build_location_dim(&self, accidents: &[AccidentRecord]) -> Vec<DimLocation> {
        if accidents.is_empty() {
            warn!("No accidents supplied, Dim_Location will be empty");
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let locations: Vec<DimLocation> = accidents
            .iter()
            .filter_map(|a| a.location.as_deref())
            .filter(|name| seen.insert(*name))
            .zip(1..)
            .map(|(name, location_id)| DimLocation {
                location_id,
                location_name: name.to_string(),
            })
            .collect();

        info!("Built Dim_Location with {} rows", locations.len());
        locations
    }

    /// Vehicles with both fields present, first row per VehicleID.
    pub fn build_vehicle_dim(&self, vehicles: &[VehicleRecord]) -> Vec<DimVehicle> {
        let mut seen = HashSet::new();
        let mut dropped = 0;
        let mut rows = Vec::with_capacity(vehicles.len());

        for vehicle in vehicles {
            let (Some(vehicle_id), Some(vehicle_type)) =
                (vehicle.vehicle_id, vehicle.vehicle_type.as_ref())
            else {
                dropped += 1;
                continue;
            };

            if !seen.insert(vehicle_id) {
                warn!("Duplicate VehicleID {} dropped from Dim_Vehicle", vehicle_id);
                continue;
            }

            rows.push(DimVehicle {
                vehicle_id,
                vehicle_type: vehicle_type.clone(),
            });
        }

        if dropped > 0 {
            info!("Dropped {} vehicle rows with missing values", dropped);
        }
        info!("Built Dim_Vehicle with {} rows", rows.len());
        rows
    }

    /// Road conditions with every projected field present, first row per
    /// ConditionID.
    pub fn build_road_condition_dim(
        &self,
        conditions: &[RoadConditionRecord],
    ) -> Vec<DimRoadCondition> {
        let mut seen = HashSet::new();
        let mut dropped = 0;
        let mut rows = Vec::with_capacity(conditions.len());

        for condition in conditions {
            let (Some(road_condition_id), Some(surface), Some(visibility)) = (
                condition.condition_id,
                condition.surface.as_ref(),
                condition.visibility.as_ref(),
            ) else {
                dropped += 1;
                continue;
            };

            if !seen.insert(road_condition_id) {
                warn!(
                    "Duplicate ConditionID {} dropped from Dim_RoadCondition",
                    road_condition_id
                );
                continue;
            }

            rows.push(DimRoadCondition {
                road_condition_id,
                surface: surface.clone(),
                visibility: visibility.clone(),
            });
        }

        if dropped > 0 {
            info!("Dropped {} road condition rows with missing values", dropped);
        }
        info!("Built Dim_RoadCondition with {} rows", rows.len());
        rows
    }

    /// One row per distinct calendar date of `ReportedAt`, first-seen order.
    pub fn build_date_dim(&self, accidents: &[AccidentRecord]) -> Vec<DimDate> {
        if accidents.is_empty() {
            warn!("No accidents supplied, Dim_Date will be empty");
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let dates: Vec<DimDate> = accidents
            .iter()
            .filter_map(|a| a.reported_at)
            .filter(|ts| seen.insert(ts.date()))
            .zip(1..)
            .map(|(time, date_id)| DimDate::new(date_id, time))
            .collect();

        info!("Built Dim_Date with {} rows", dates.len());
        dates
    }
}

impl Default for DimensionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn accidents() -> Vec<AccidentRecord> {
        vec![
            AccidentRecord::new(1, at(3, 9), "Bridge St", 2, "Minor"),
            AccidentRecord::new(2, at(3, 17), "High St", 1, "Severe"),
            AccidentRecord::new(3, at(1, 7), "Bridge St", 3, "Moderate"),
            AccidentRecord::new(4, at(5, 12), "Mill Lane", 1, "Minor"),
            AccidentRecord::new(5, at(1, 22), "High St", 2, "Minor"),
        ]
    }

    #[test]
    fn test_location_dim_first_seen_order() {
        let dim = DimensionBuilder::new().build_location_dim(&accidents());

        let names: Vec<&str> = dim.iter().map(|d| d.location_name.as_str()).collect();
        let ids: Vec<i64> = dim.iter().map(|d| d.location_id).collect();
        assert_eq!(names, vec!["Bridge St", "High St", "Mill Lane"]);
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_location_dim_is_distinct_and_contiguous() {
        let mut input = accidents();
        input.push(AccidentRecord {
            location: None,
            ..AccidentRecord::new(6, at(6, 1), "", 1, "Minor")
        });
        input.extend(accidents());

        let dim = DimensionBuilder::new().build_location_dim(&input);

        let expected: HashSet<&str> = input.iter().filter_map(|a| a.location.as_deref()).collect();
        let names: HashSet<&str> = dim.iter().map(|d| d.location_name.as_str()).collect();
        assert_eq!(names, expected);
        assert_eq!(dim.len(), expected.len());
        for (index, row) in dim.iter().enumerate() {
            assert_eq!(row.location_id, index as i64 + 1);
        }
    }

    #[test]
    fn test_empty_accidents_produce_empty_dimensions() {
        let builder = DimensionBuilder::new();
        assert!(builder.build_location_dim(&[]).is_empty());
        assert!(builder.build_date_dim(&[]).is_empty());
    }

    #[test]
    fn test_date_dim_one_row_per_date() {
        let dim = DimensionBuilder::new().build_date_dim(&accidents());

        assert_eq!(dim.len(), 3);
        let dates: Vec<NaiveDate> = dim.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![at(3, 0).date(), at(1, 0).date(), at(5, 0).date()]
        );
        for (index, row) in dim.iter().enumerate() {
            assert_eq!(row.date_id, index as i64 + 1);
            assert_eq!(row.month, row.date.month());
            assert_eq!(row.year, row.date.year());
        }

        // Time is the first timestamp seen on that date, not midnight
        assert_eq!(dim[0].time, at(3, 9));
        assert_eq!(dim[1].time, at(1, 7));
    }

    #[test]
    fn test_vehicle_dim_drops_nulls_and_duplicates() {
        let vehicles = vec![
            VehicleRecord::new(1, "Car"),
            VehicleRecord {
                vehicle_id: Some(2),
                vehicle_type: None,
            },
            VehicleRecord {
                vehicle_id: None,
                vehicle_type: Some("Van".to_string()),
            },
            VehicleRecord::new(3, "Motorcycle"),
            VehicleRecord::new(1, "Bus"),
        ];

        let dim = DimensionBuilder::new().build_vehicle_dim(&vehicles);

        assert_eq!(
            dim,
            vec![
                DimVehicle {
                    vehicle_id: 1,
                    vehicle_type: "Car".to_string()
                },
                DimVehicle {
                    vehicle_id: 3,
                    vehicle_type: "Motorcycle".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_road_condition_dim_drops_nulls() {
        let conditions = vec![
            RoadConditionRecord::new(10, "Bridge St", at(3, 8), "Dry", "Good"),
            RoadConditionRecord {
                visibility: None,
                ..RoadConditionRecord::new(11, "High St", at(3, 8), "Wet", "")
            },
            RoadConditionRecord {
                location: None,
                recorded_at: None,
                ..RoadConditionRecord::new(12, "", at(3, 8), "Icy", "Poor")
            },
        ];

        let dim = DimensionBuilder::new().build_road_condition_dim(&conditions);

        // Location and RecordedAt are not projected, so their absence is fine
        let ids: Vec<i64> = dim.iter().map(|d| d.road_condition_id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(dim[1].surface, "Icy");
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let batches = NormalizedBatches {
            vehicles: vec![VehicleRecord::new(1, "Car")],
            accidents: accidents(),
            road_conditions: vec![RoadConditionRecord::new(
                10,
                "Bridge St",
                at(3, 8),
                "Dry",
                "Good",
            )],
            coerced: Default::default(),
        };
        let builder = DimensionBuilder::new();

        assert_eq!(builder.build_all(&batches), builder.build_all(&batches));
    }
}
