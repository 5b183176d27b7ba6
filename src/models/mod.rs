pub mod dimension;
pub mod fact;
pub mod source;

pub use dimension::{DimDate, DimLocation, DimRoadCondition, DimVehicle, Dimensions};
pub use fact::{severity_score, FactAccident, Severity};
pub use source::{
    AccidentRecord, RawAccidentRecord, RawRoadConditionRecord, RawVehicleRecord,
    RoadConditionRecord, SourceBatches, VehicleRecord,
};
