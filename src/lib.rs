pub mod cli;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{Result, WarehouseError};
pub use pipeline::{Pipeline, PipelineSummary};
pub use settings::Settings;
