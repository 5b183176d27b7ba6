use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WarehouseError>;

#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Source not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("Missing required batches: {}", batches.join(", "))]
    MissingBatch { batches: Vec<String> },

    #[error("Batch {batch} is missing required columns: {}", columns.join(", "))]
    MissingColumns { batch: String, columns: Vec<String> },

    #[error("Warehouse table {table} does not exist")]
    SchemaMissing { table: String },

    #[error("Warehouse sink {} is unavailable: {source}", path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Batch {batch} contains no rows")]
    EmptyInput { batch: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<config::ConfigError> for WarehouseError {
    fn from(err: config::ConfigError) -> Self {
        WarehouseError::Config(err.to_string())
    }
}
