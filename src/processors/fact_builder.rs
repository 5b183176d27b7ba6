use crate::error::Result;
use crate::models::{
    severity_score, AccidentRecord, DimDate, DimLocation, FactAccident, RoadConditionRecord,
};
use crate::processors::data_quality::{
    DataQualityIssue, DataQualityReport, Dimension, PlaceholderField,
};
use crate::utils::constants::{
    ROAD_CONDITION_FALLBACK_MAX, ROAD_CONDITION_FALLBACK_MIN, VEHICLE_ID_MAX, VEHICLE_ID_MIN,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};
use validator::Validate;

/// Fact rows plus the diagnostics gathered while building them.
#[derive(Debug, Clone)]
pub struct FactBuildOutput {
    pub facts: Vec<FactAccident>,
    pub report: DataQualityReport,
}

/// Populates `Fact_Accidents` from accident records and the freshly built
/// dimensions.
///
/// VehicleID has no source linkage and is drawn from `rng`; the same goes for
/// RoadConditionID when no reading exists at the accident location. Seed the
/// generator to make those two columns reproducible.
pub struct FactBuilder<R: Rng> {
    rng: R,
}

impl FactBuilder<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FactBuilder<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn build(
        &mut self,
        accidents: &[AccidentRecord],
        locations: &[DimLocation],
        dates: &[DimDate],
        road_conditions: &[RoadConditionRecord],
    ) -> Result<FactBuildOutput> {
        let mut report = DataQualityReport::new(accidents.len());

        report.unmatched_locations = unmatched_locations(accidents, road_conditions);
        if !report.unmatched_locations.is_empty() {
            warn!(
                "Locations in Accidents not found in RoadConditions: {:?}",
                report.unmatched_locations
            );
        }

        let date_ids: HashMap<NaiveDate, i64> =
            dates.iter().map(|d| (d.date, d.date_id)).collect();
        let location_ids: HashMap<&str, i64> = locations
            .iter()
            .map(|l| (l.location_name.as_str(), l.location_id))
            .collect();
        let conditions_by_location = group_by_location(road_conditions);

        let mut unmatched_dates = BTreeSet::new();
        let mut facts = Vec::with_capacity(accidents.len());

        for accident in deduplicate(accidents, &mut report) {
            let Some(accident_id) = accident.accident_id else {
                continue;
            };

            let (Some(reported_at), Some(location)) =
                (accident.reported_at, accident.location.as_deref())
            else {
                warn!(
                    "Skipping row with AccidentID {} due to missing ReportedAt or Location",
                    accident_id
                );
                report.record(DataQualityIssue::SkippedRow {
                    accident_id: Some(accident_id),
                    reason: "missing ReportedAt or Location".to_string(),
                });
                continue;
            };

            let date = reported_at.date();
            let date_id = date_ids.get(&date).copied();
            if date_id.is_none() {
                unmatched_dates.insert(date);
                report.record(DataQualityIssue::UnmatchedReference {
                    accident_id,
                    dimension: Dimension::Date,
                    value: date.to_string(),
                });
            }

            let location_id = location_ids.get(location).copied();
            if location_id.is_none() {
                warn!(
                    "AccidentID {} location '{}' not found in Dim_Location",
                    accident_id, location
                );
                report.record(DataQualityIssue::UnmatchedReference {
                    accident_id,
                    dimension: Dimension::Location,
                    value: location.to_string(),
                });
            }

            let vehicle_id = self.rng.gen_range(VEHICLE_ID_MIN..=VEHICLE_ID_MAX);
            debug!(
                "AccidentID {} assigned placeholder VehicleID {}",
                accident_id, vehicle_id
            );
            report.record(DataQualityIssue::FallbackAssignment {
                accident_id,
                field: PlaceholderField::VehicleId,
                value: vehicle_id,
                reason: "no accident to vehicle linkage in source".to_string(),
            });

            let candidates = conditions_by_location
                .get(location)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let road_condition_id = match nearest_condition(candidates, reported_at) {
                Some(id) => id,
                None => {
                    let id = self
                        .rng
                        .gen_range(ROAD_CONDITION_FALLBACK_MIN..=ROAD_CONDITION_FALLBACK_MAX);
                    info!(
                        "No road condition found for date {} at location {}, using random RoadConditionID: {}",
                        date, location, id
                    );
                    report.record(DataQualityIssue::FallbackAssignment {
                        accident_id,
                        field: PlaceholderField::RoadConditionId,
                        value: id,
                        reason: format!("no timestamped road condition at {}", location),
                    });
                    id
                }
            };

            let fact = FactAccident {
                accident_id,
                date_id,
                location_id,
                vehicle_id,
                road_condition_id,
                vehicles_involved: accident.vehicles_involved,
                severity_score: severity_score(accident.severity.as_deref()),
            };
            fact.validate()?;
            facts.push(fact);
        }

        if !unmatched_dates.is_empty() {
            warn!("Unmatched dates in Fact_Accidents: {:?}", unmatched_dates);
        }

        report.emitted_rows = facts.len();
        info!("Built Fact_Accidents with {} rows", facts.len());

        Ok(FactBuildOutput { facts, report })
    }
}

/// First occurrence of every AccidentID, in input order.
///
/// Rows without an AccidentID cannot be keyed and are skipped here.
fn deduplicate<'a>(
    accidents: &'a [AccidentRecord],
    report: &mut DataQualityReport,
) -> Vec<&'a AccidentRecord> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(accidents.len());

    for accident in accidents {
        match accident.accident_id {
            None => {
                warn!("Skipping accident row without a numeric AccidentID");
                report.record(DataQualityIssue::SkippedRow {
                    accident_id: None,
                    reason: "missing or unparseable AccidentID".to_string(),
                });
            }
            Some(id) if !seen.insert(id) => {
                debug!("Dropping duplicate AccidentID {}", id);
                report.record(DataQualityIssue::DuplicateKey { accident_id: id });
            }
            Some(_) => unique.push(accident),
        }
    }

    unique
}

fn group_by_location(
    road_conditions: &[RoadConditionRecord],
) -> HashMap<&str, Vec<&RoadConditionRecord>> {
    let mut grouped: HashMap<&str, Vec<&RoadConditionRecord>> = HashMap::new();
    for condition in road_conditions {
        if let Some(location) = condition.location.as_deref() {
            grouped.entry(location).or_default().push(condition);
        }
    }
    grouped
}

fn unmatched_locations(
    accidents: &[AccidentRecord],
    road_conditions: &[RoadConditionRecord],
) -> BTreeSet<String> {
    let condition_locations: HashSet<&str> = road_conditions
        .iter()
        .filter_map(|c| c.location.as_deref())
        .collect();

    accidents
        .iter()
        .filter_map(|a| a.location.as_deref())
        .filter(|location| !condition_locations.contains(location))
        .map(str::to_string)
        .collect()
}

/// ConditionID of the candidate recorded closest to `target`.
///
/// Candidates without a RecordedAt or ConditionID are ignored. On equal
/// distance the earlier candidate wins.
pub fn nearest_condition(
    candidates: &[&RoadConditionRecord],
    target: NaiveDateTime,
) -> Option<i64> {
    let mut best: Option<(i64, Duration)> = None;

    for candidate in candidates {
        let (Some(condition_id), Some(recorded_at)) =
            (candidate.condition_id, candidate.recorded_at)
        else {
            continue;
        };

        let delta = recorded_at.signed_duration_since(target);
        let distance = if delta < Duration::zero() { -delta } else { delta };

        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((condition_id, distance));
        }
    }

    best.map(|(condition_id, _)| condition_id)
}
