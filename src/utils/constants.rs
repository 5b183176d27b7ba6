/// Source batch names
pub const VEHICLES_BATCH: &str = "Vehicles";
pub const ACCIDENTS_BATCH: &str = "Accidents";
pub const ROAD_CONDITIONS_BATCH: &str = "RoadConditions";
pub const REQUIRED_BATCHES: [&str; 3] = [VEHICLES_BATCH, ACCIDENTS_BATCH, ROAD_CONDITIONS_BATCH];

/// Columns each batch file must carry in its header row
pub const VEHICLES_COLUMNS: &[&str] = &["VehicleID", "VehicleType"];
pub const ACCIDENTS_COLUMNS: &[&str] = &[
    "AccidentID",
    "ReportedAt",
    "Location",
    "VehiclesInvolved",
    "Severity",
];
pub const ROAD_CONDITIONS_COLUMNS: &[&str] = &[
    "ConditionID",
    "Location",
    "RecordedAt",
    "Surface",
    "Visibility",
];

/// Extension of the per-batch source files
pub const SOURCE_FILE_EXTENSION: &str = "csv";

/// Warehouse table names
pub const DIM_LOCATION_TABLE: &str = "Dim_Location";
pub const DIM_VEHICLE_TABLE: &str = "Dim_Vehicle";
pub const DIM_ROAD_CONDITION_TABLE: &str = "Dim_RoadCondition";
pub const DIM_DATE_TABLE: &str = "Dim_Date";
pub const FACT_ACCIDENTS_TABLE: &str = "Fact_Accidents";

/// Placeholder key ranges (inclusive)
pub const VEHICLE_ID_MIN: i64 = 1;
pub const VEHICLE_ID_MAX: i64 = 200;
pub const ROAD_CONDITION_FALLBACK_MIN: i64 = 1;
pub const ROAD_CONDITION_FALLBACK_MAX: i64 = 100;

pub const DEFAULT_SEVERITY_SCORE: u8 = 1;

/// Storage formats for dates and timestamps. Fractional seconds are only
/// written when present.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Defaults
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_DATABASE_FILE: &str = "accident_data_warehouse.db";
pub const DEFAULT_LOG_FILE: &str = "accident_warehouse.log";
pub const ENV_PREFIX: &str = "ACCIDENT_WAREHOUSE";
