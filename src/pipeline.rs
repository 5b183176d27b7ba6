//! End-to-end warehouse load.
//!
//! Chains load -> normalize -> schema -> dimensions -> facts -> persist ->
//! validate. The first stage to fail aborts the run; its error is logged with
//! the stage name and returned unchanged.

use crate::error::{Result, WarehouseError};
use crate::models::Dimensions;
use crate::processors::{
    DataQualityReport, DimensionBuilder, FactBuilder, Normalizer, ValidationReport,
    WarehouseValidator,
};
use crate::readers::SourceReader;
use crate::settings::Settings;
use crate::utils::constants::ACCIDENTS_BATCH;
use crate::utils::progress::ProgressReporter;
use crate::writers::WarehouseSink;
use rand::rngs::StdRng;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span};

/// Row counts written by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadCounts {
    pub locations: usize,
    pub vehicles: usize,
    pub road_conditions: usize,
    pub dates: usize,
    pub facts: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub loaded: LoadCounts,
    pub data_quality: DataQualityReport,
    pub validation: ValidationReport,
}

pub struct Pipeline<R: Rng> {
    source_dir: PathBuf,
    sink: WarehouseSink,
    reader: SourceReader,
    fact_builder: FactBuilder<R>,
    validator: WarehouseValidator,
    silent: bool,
}

impl Pipeline<StdRng> {
    /// Pipeline configured from `settings`; an unset seed draws placeholder
    /// keys from OS entropy.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let fact_builder = match settings.seed {
            Some(seed) => FactBuilder::seeded(seed),
            None => FactBuilder::from_entropy(),
        };

        Ok(Self::new(
            &settings.source_dir,
            WarehouseSink::new(&settings.database),
            fact_builder,
        )
        .with_reader(SourceReader::with_delimiter(settings.delimiter_byte()?))
        .with_sample_size(settings.sample_size))
    }
}

impl<R: Rng> Pipeline<R> {
    pub fn new(source_dir: &Path, sink: WarehouseSink, fact_builder: FactBuilder<R>) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            sink,
            reader: SourceReader::new(),
            fact_builder,
            validator: WarehouseValidator::new(),
            silent: false,
        }
    }

    pub fn with_reader(mut self, reader: SourceReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.validator = WarehouseValidator::new().with_sample_size(sample_size);
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn sink(&self) -> &WarehouseSink {
        &self.sink
    }

    pub fn run(&mut self) -> Result<PipelineSummary> {
        let span = info_span!(
            "pipeline",
            source = %self.source_dir.display(),
            sink = %self.sink.path().display()
        );
        let _entered = span.enter();

        let progress = ProgressReporter::new_spinner("Starting warehouse load...", self.silent);

        match self.execute(&progress) {
            Ok(summary) => {
                progress.finish_with_message(&format!(
                    "Loaded {} fact rows",
                    summary.loaded.facts
                ));
                info!("ETL pipeline completed successfully");
                Ok(summary)
            }
            Err(e) => {
                progress.abandon_with_message("Warehouse load failed");
                error!("ETL pipeline failed: {}", e);
                Err(e)
            }
        }
    }

    fn execute(&mut self, progress: &ProgressReporter) -> Result<PipelineSummary> {
        progress.set_message("Loading source batches...");
        let raw = stage("load", self.reader.read_batches(&self.source_dir))?;

        progress.set_message("Normalizing timestamps...");
        let batches = Normalizer::new().normalize(raw);
        if batches.accidents.is_empty() {
            return stage(
                "normalize",
                Err(WarehouseError::EmptyInput {
                    batch: ACCIDENTS_BATCH.to_string(),
                }),
            );
        }

        progress.set_message("Creating warehouse schema...");
        stage("schema", self.sink.ensure_schema())?;

        progress.set_message("Building dimension tables...");
        let dimensions: Dimensions = DimensionBuilder::new().build_all(&batches);

        progress.set_message("Building fact table...");
        let output = stage(
            "facts",
            self.fact_builder.build(
                &batches.accidents,
                &dimensions.locations,
                &dimensions.dates,
                &batches.road_conditions,
            ),
        )?;
        info!("\n{}", output.report.generate_summary());

        progress.set_message("Writing warehouse tables...");
        stage("persist", self.sink.write_warehouse(&dimensions, &output.facts))?;

        progress.set_message("Validating warehouse...");
        let validation = stage("validate", self.validator.validate(&self.sink))?;

        Ok(PipelineSummary {
            loaded: LoadCounts {
                locations: dimensions.locations.len(),
                vehicles: dimensions.vehicles.len(),
                road_conditions: dimensions.road_conditions.len(),
                dates: dimensions.dates.len(),
                facts: output.facts.len(),
            },
            data_quality: output.report,
            validation,
        })
    }
}

/// Log a failed stage with its name before passing the error on.
fn stage<T>(name: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| {
        error!(stage = name, "Stage failed: {}", e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::Table;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &Path, accidents: &str) {
        fs::write(
            dir.join("Vehicles.csv"),
            "VehicleID,VehicleType\n1,Car\n2,Truck\n",
        )
        .unwrap();
        fs::write(
            dir.join("Accidents.csv"),
            format!(
                "AccidentID,ReportedAt,Location,VehiclesInvolved,Severity\n{}",
                accidents
            ),
        )
        .unwrap();
        fs::write(
            dir.join("RoadConditions.csv"),
            "ConditionID,Location,RecordedAt,Surface,Visibility\n\
             1,Dock St,2024-09-01 07:50:00,Wet,Low\n",
        )
        .unwrap();
    }

    #[test]
    fn test_empty_accidents_abort_before_touching_sink() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "");
        let sink = WarehouseSink::new(dir.path().join("dw.db"));

        let err = Pipeline::new(dir.path(), sink.clone(), FactBuilder::seeded(1))
            .with_silent(true)
            .run()
            .unwrap_err();

        assert!(matches!(err, WarehouseError::EmptyInput { ref batch } if batch == "Accidents"));
        assert!(!sink.path().exists());
    }

    #[test]
    fn test_run_reports_counts() -> Result<()> {
        let dir = TempDir::new()?;
        write_source(
            dir.path(),
            "1,2024-09-01 08:00:00,Dock St,2,Severe\n2,2024-09-01 09:30:00,Dock St,1,Minor\n",
        );
        let sink = WarehouseSink::new(dir.path().join("dw.db"));

        let summary = Pipeline::new(dir.path(), sink, FactBuilder::seeded(1))
            .with_silent(true)
            .with_sample_size(1)
            .run()?;

        assert_eq!(
            summary.loaded,
            LoadCounts {
                locations: 1,
                vehicles: 2,
                road_conditions: 1,
                dates: 1,
                facts: 2,
            }
        );
        assert_eq!(summary.validation.count(Table::FactAccidents), Some(2));
        assert_eq!(summary.validation.fact_sample.rows.len(), 1);
        assert_eq!(summary.data_quality.emitted_rows, 2);

        Ok(())
    }
}
