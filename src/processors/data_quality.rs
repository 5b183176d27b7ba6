use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Dimension a fact row failed to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    Date,
    Location,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Date => write!(f, "Dim_Date"),
            Dimension::Location => write!(f, "Dim_Location"),
        }
    }
}

/// Fact column that received a placeholder value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaceholderField {
    VehicleId,
    RoadConditionId,
}

impl fmt::Display for PlaceholderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderField::VehicleId => write!(f, "VehicleID"),
            PlaceholderField::RoadConditionId => write!(f, "RoadConditionID"),
        }
    }
}

/// Non-fatal problem found while building the fact table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataQualityIssue {
    /// Row excluded from the fact table
    SkippedRow {
        accident_id: Option<i64>,
        reason: String,
    },
    /// Later occurrence of an AccidentID already taken
    DuplicateKey { accident_id: i64 },
    /// Row kept with a null foreign key
    UnmatchedReference {
        accident_id: i64,
        dimension: Dimension,
        value: String,
    },
    /// Row kept with a placeholder key
    FallbackAssignment {
        accident_id: i64,
        field: PlaceholderField,
        value: i64,
        reason: String,
    },
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityIssue::SkippedRow {
                accident_id: Some(id),
                reason,
            } => write!(f, "AccidentID {} skipped: {}", id, reason),
            DataQualityIssue::SkippedRow {
                accident_id: None,
                reason,
            } => write!(f, "Row without a numeric AccidentID skipped: {}", reason),
            DataQualityIssue::DuplicateKey { accident_id } => {
                write!(f, "AccidentID {} duplicated, first occurrence kept", accident_id)
            }
            DataQualityIssue::UnmatchedReference {
                accident_id,
                dimension,
                value,
            } => write!(
                f,
                "AccidentID {}: '{}' not found in {}",
                accident_id, value, dimension
            ),
            DataQualityIssue::FallbackAssignment {
                accident_id,
                field,
                value,
                reason,
            } => write!(
                f,
                "AccidentID {}: {} set to {} ({})",
                accident_id, field, value, reason
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DataQualityReport {
    pub input_rows: usize,
    pub emitted_rows: usize,
    /// Accident locations with no road condition reading at all
    pub unmatched_locations: BTreeSet<String>,
    pub issues: Vec<DataQualityIssue>,
}

impl DataQualityReport {
    pub fn new(input_rows: usize) -> Self {
        Self {
            input_rows,
            ..Self::default()
        }
    }

    pub fn record(&mut self, issue: DataQualityIssue) {
        self.issues.push(issue);
    }

    pub fn skipped_rows(&self) -> usize {
        self.count(|i| matches!(i, DataQualityIssue::SkippedRow { .. }))
    }

    pub fn duplicate_keys(&self) -> usize {
        self.count(|i| matches!(i, DataQualityIssue::DuplicateKey { .. }))
    }

    pub fn unmatched_references(&self) -> usize {
        self.count(|i| matches!(i, DataQualityIssue::UnmatchedReference { .. }))
    }

    pub fn fallback_assignments(&self, field: PlaceholderField) -> usize {
        self.count(
            |i| matches!(i, DataQualityIssue::FallbackAssignment { field: f, .. } if *f == field),
        )
    }

    fn count(&self, predicate: impl Fn(&DataQualityIssue) -> bool) -> usize {
        self.issues.iter().filter(|i| predicate(i)).count()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Fact Table Data Quality ===\n");
        summary.push_str(&format!("Input Accidents: {}\n", self.input_rows));
        summary.push_str(&format!("Fact Rows Emitted: {}\n", self.emitted_rows));
        summary.push_str(&format!("Duplicate AccidentIDs: {}\n", self.duplicate_keys()));
        summary.push_str(&format!("Skipped Rows: {}\n", self.skipped_rows()));
        summary.push_str(&format!(
            "Unmatched References: {}\n",
            self.unmatched_references()
        ));
        summary.push_str(&format!(
            "RoadConditionID Fallbacks: {}\n",
            self.fallback_assignments(PlaceholderField::RoadConditionId)
        ));
        summary.push_str(&format!(
            "Placeholder VehicleIDs: {}\n",
            self.fallback_assignments(PlaceholderField::VehicleId)
        ));

        if !self.unmatched_locations.is_empty() {
            let locations: Vec<&str> =
                self.unmatched_locations.iter().map(String::as_str).collect();
            summary.push_str(&format!(
                "Locations without road conditions: {}\n",
                locations.join(", ")
            ));
        }

        let notable: Vec<&DataQualityIssue> = self
            .issues
            .iter()
            .filter(|i| {
                !matches!(
                    i,
                    DataQualityIssue::FallbackAssignment {
                        field: PlaceholderField::VehicleId,
                        ..
                    }
                )
            })
            .collect();

        if !notable.is_empty() {
            summary.push_str("\nTop 10 Issues:\n");
            for (i, issue) in notable.iter().take(10).enumerate() {
                summary.push_str(&format!("  {}. {}\n", i + 1, issue));
            }
        }

        summary
    }
}
