use crate::error::{Result, WarehouseError};
use crate::utils::constants::{
    DEFAULT_DATABASE_FILE, DEFAULT_LOG_FILE, DEFAULT_SAMPLE_SIZE, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime settings, layered as defaults < config file < environment.
///
/// Environment variables use the `ACCIDENT_WAREHOUSE_` prefix, e.g.
/// `ACCIDENT_WAREHOUSE_DATABASE=/data/warehouse.db`. Command line flags are
/// applied on top by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub source_dir: PathBuf,
    pub database: PathBuf,
    pub log_file: PathBuf,
    pub sample_size: usize,
    pub seed: Option<u64>,
    pub delimiter: String,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("source_dir", ".")?
            .set_default("database", DEFAULT_DATABASE_FILE)?
            .set_default("log_file", DEFAULT_LOG_FILE)?
            .set_default("sample_size", DEFAULT_SAMPLE_SIZE as i64)?
            .set_default("delimiter", ",")?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.delimiter_byte()?;
        Ok(settings)
    }

    /// The CSV delimiter as a single byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(WarehouseError::Config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}
