use crate::error::{Result, WarehouseError};
use crate::models::{RawAccidentRecord, RawRoadConditionRecord, RawVehicleRecord, SourceBatches};
use crate::utils::constants::{
    ACCIDENTS_BATCH, ACCIDENTS_COLUMNS, REQUIRED_BATCHES, ROAD_CONDITIONS_BATCH,
    ROAD_CONDITIONS_COLUMNS, SOURCE_FILE_EXTENSION, VEHICLES_BATCH, VEHICLES_COLUMNS,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Reads the three named batches from a directory of CSV files, one file per
/// batch (`Vehicles.csv`, `Accidents.csv`, `RoadConditions.csv`).
pub struct SourceReader {
    delimiter: u8,
}

impl SourceReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Path of the file holding `batch` inside `source_dir`.
    pub fn batch_path(source_dir: &Path, batch: &str) -> PathBuf {
        source_dir.join(format!("{}.{}", batch, SOURCE_FILE_EXTENSION))
    }

    /// Check that the source exists and holds every required batch.
    pub fn check_source(&self, source_dir: &Path) -> Result<()> {
        if !source_dir.is_dir() {
            error!("Source directory not found: {}", source_dir.display());
            return Err(WarehouseError::MissingSource {
                path: source_dir.to_path_buf(),
            });
        }

        let missing: Vec<String> = REQUIRED_BATCHES
            .iter()
            .filter(|batch| !Self::batch_path(source_dir, batch).is_file())
            .map(|batch| batch.to_string())
            .collect();

        if !missing.is_empty() {
            error!("Missing required batches: {:?}", missing);
            return Err(WarehouseError::MissingBatch { batches: missing });
        }

        Ok(())
    }

    /// Read all three batches.
    pub fn read_batches(&self, source_dir: &Path) -> Result<SourceBatches> {
        self.check_source(source_dir)?;

        let vehicles: Vec<RawVehicleRecord> =
            self.read_batch(source_dir, VEHICLES_BATCH, VEHICLES_COLUMNS)?;
        let accidents: Vec<RawAccidentRecord> =
            self.read_batch(source_dir, ACCIDENTS_BATCH, ACCIDENTS_COLUMNS)?;
        let road_conditions: Vec<RawRoadConditionRecord> =
            self.read_batch(source_dir, ROAD_CONDITIONS_BATCH, ROAD_CONDITIONS_COLUMNS)?;

        info!(
            vehicles = vehicles.len(),
            accidents = accidents.len(),
            road_conditions = road_conditions.len(),
            "Source loaded successfully with all required batches"
        );

        Ok(SourceBatches {
            vehicles,
            accidents,
            road_conditions,
        })
    }

    /// Deserialize one batch after checking its header carries `columns`.
    fn read_batch<T: DeserializeOwned>(
        &self,
        source_dir: &Path,
        batch: &str,
        columns: &[&str],
    ) -> Result<Vec<T>> {
        let path = Self::batch_path(source_dir, batch);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)?;

        let headers = reader.headers()?;
        let missing: Vec<String> = columns
            .iter()
            .filter(|column| !headers.iter().any(|header| header == **column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            error!("Batch {} is missing columns: {:?}", batch, missing);
            return Err(WarehouseError::MissingColumns {
                batch: batch.to_string(),
                columns: missing,
            });
        }

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }

        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

impl Default for SourceReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_batch(dir: &Path, batch: &str, contents: &str) {
        fs::write(SourceReader::batch_path(dir, batch), contents).unwrap();
    }

    #[test]
    fn test_missing_source_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = SourceReader::new().read_batches(&missing).unwrap_err();
        assert!(matches!(err, WarehouseError::MissingSource { path } if path == missing));
    }

    #[test]
    fn test_missing_batches_are_all_named() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), VEHICLES_BATCH, "VehicleID,VehicleType\n1,Car\n");

        let err = SourceReader::new().read_batches(dir.path()).unwrap_err();
        match err {
            WarehouseError::MissingBatch { batches } => {
                assert_eq!(batches, vec!["Accidents", "RoadConditions"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_columns_are_named() {
        let dir = TempDir::new().unwrap();
        write_batch(dir.path(), VEHICLES_BATCH, "VehicleID,VehicleType\n1,Car\n");
        write_batch(
            dir.path(),
            ACCIDENTS_BATCH,
            "AccidentID,ReportedAt,Loc,VehiclesInvolved\n\
             10,2024-01-02 08:15:00,Main St,2\n\
             11,2024-01-02 09:00:00,Elm Rd,1\n",
        );
        write_batch(
            dir.path(),
            ROAD_CONDITIONS_BATCH,
            "ConditionID,Location,RecordedAt,Surface,Visibility\n",
        );

        let err = SourceReader::new().read_batches(dir.path()).unwrap_err();
        match err {
            WarehouseError::MissingColumns { batch, columns } => {
                assert_eq!(batch, ACCIDENTS_BATCH);
                assert_eq!(columns, vec!["Location", "Severity"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_batches_with_empty_cells() -> Result<()> {
        let dir = TempDir::new()?;
        write_batch(
            dir.path(),
            VEHICLES_BATCH,
            "VehicleID,VehicleType\n1,Car\n2,\n",
        );
        write_batch(
            dir.path(),
            ACCIDENTS_BATCH,
            "AccidentID,ReportedAt,Location,VehiclesInvolved,Severity\n\
             10,2024-01-02 08:15:00,Main St,2,Minor\n\
             11,,Elm Rd,1,\n",
        );
        write_batch(
            dir.path(),
            ROAD_CONDITIONS_BATCH,
            "ConditionID,Location,RecordedAt,Surface,Visibility\n\
             5,Main St,2024-01-02 08:00:00,Wet,Low\n",
        );

        let batches = SourceReader::new().read_batches(dir.path())?;

        assert_eq!(batches.vehicles.len(), 2);
        assert_eq!(batches.vehicles[1].vehicle_type, None);
        assert_eq!(batches.accidents.len(), 2);
        assert_eq!(batches.accidents[0].location.as_deref(), Some("Main St"));
        assert_eq!(batches.accidents[1].reported_at, None);
        assert_eq!(batches.accidents[1].severity, None);
        assert_eq!(batches.road_conditions.len(), 1);
        assert_eq!(batches.road_conditions[0].surface.as_deref(), Some("Wet"));

        Ok(())
    }

    #[test]
    fn test_semicolon_delimiter() -> Result<()> {
        let dir = TempDir::new()?;
        write_batch(dir.path(), VEHICLES_BATCH, "VehicleID;VehicleType\n3;Bus\n");
        write_batch(
            dir.path(),
            ACCIDENTS_BATCH,
            "AccidentID;ReportedAt;Location;VehiclesInvolved;Severity\n",
        );
        write_batch(
            dir.path(),
            ROAD_CONDITIONS_BATCH,
            "ConditionID;Location;RecordedAt;Surface;Visibility\n",
        );

        let batches = SourceReader::with_delimiter(b';').read_batches(dir.path())?;
        assert_eq!(batches.vehicles[0].vehicle_type.as_deref(), Some("Bus"));
        assert!(batches.accidents.is_empty());

        Ok(())
    }
}
