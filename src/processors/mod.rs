pub mod data_quality;
pub mod dimension_builder;
pub mod fact_builder;
pub mod normalizer;
pub mod warehouse_validator;

pub use data_quality::{DataQualityIssue, DataQualityReport, Dimension, PlaceholderField};
pub use dimension_builder::DimensionBuilder;
pub use fact_builder::{nearest_condition, FactBuildOutput, FactBuilder};
pub use normalizer::{CoercedCounts, NormalizedBatches, Normalizer};
pub use warehouse_validator::{TableCount, TableSample, ValidationReport, WarehouseValidator};
