use crate::cli::args::Commands;
use crate::error::{Result, WarehouseError};
use crate::pipeline::Pipeline;
use crate::processors::WarehouseValidator;
use crate::settings::Settings;
use crate::writers::WarehouseSink;

/// Execute `command` with CLI flags layered over `settings`.
pub fn run(command: Commands, mut settings: Settings) -> Result<()> {
    match command {
        Commands::Run {
            source_dir,
            database,
            seed,
            sample,
            delimiter,
            quiet,
        } => {
            if let Some(dir) = source_dir {
                settings.source_dir = dir;
            }
            if let Some(db) = database {
                settings.database = db;
            }
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(n) = sample {
                settings.sample_size = n;
            }
            if let Some(d) = delimiter {
                settings.delimiter = d;
            }

            println!("Building accident warehouse...");
            println!("Source directory: {}", settings.source_dir.display());
            println!("Warehouse: {}", settings.database.display());

            let summary = Pipeline::from_settings(&settings)?
                .with_silent(quiet)
                .run()?;

            println!("\n{}", summary.data_quality.generate_summary());
            println!("{}", summary.validation.generate_summary());
            println!("Warehouse load complete!");
        }

        Commands::Validate {
            database,
            sample,
            json,
        } => {
            let sink = WarehouseSink::new(database.unwrap_or(settings.database));
            let validator =
                WarehouseValidator::new().with_sample_size(sample.unwrap_or(settings.sample_size));
            let report = validator.validate(&sink)?;

            if json {
                let rendered = serde_json::to_string_pretty(&report)
                    .map_err(|e| WarehouseError::InvalidFormat(e.to_string()))?;
                println!("{}", rendered);
            } else {
                println!("{}", report.generate_summary());
            }
        }

        Commands::Inspect { database, rows } => {
            let sink = WarehouseSink::new(database.unwrap_or(settings.database));
            let samples = WarehouseValidator::new().snapshot(&sink, rows)?;

            for sample in samples {
                println!("\n--- {} (First {} Rows) ---", sample.table, rows);
                print!("{}", sample.render());
            }
        }
    }

    Ok(())
}
