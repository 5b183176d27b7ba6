use crate::models::{DimDate, DimLocation, DimRoadCondition, DimVehicle, FactAccident};
use crate::utils::constants::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::writers::schema::Table;
use rusqlite::types::Value;

/// A record that can be bulk-inserted into its warehouse table.
///
/// `values` must line up with `Table::columns` for `TABLE`.
pub trait WarehouseRow {
    const TABLE: Table;

    fn values(&self) -> Vec<Value>;
}

fn nullable(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

impl WarehouseRow for DimLocation {
    const TABLE: Table = Table::DimLocation;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.location_id),
            Value::Text(self.location_name.clone()),
        ]
    }
}

impl WarehouseRow for DimVehicle {
    const TABLE: Table = Table::DimVehicle;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.vehicle_id),
            Value::Text(self.vehicle_type.clone()),
        ]
    }
}

impl WarehouseRow for DimRoadCondition {
    const TABLE: Table = Table::DimRoadCondition;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.road_condition_id),
            Value::Text(self.surface.clone()),
            Value::Text(self.visibility.clone()),
        ]
    }
}

impl WarehouseRow for DimDate {
    const TABLE: Table = Table::DimDate;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.date_id),
            Value::Text(self.date.format(DATE_FORMAT).to_string()),
            Value::Integer(i64::from(self.month)),
            Value::Integer(i64::from(self.year)),
            Value::Text(self.time.format(TIMESTAMP_FORMAT).to_string()),
        ]
    }
}

impl WarehouseRow for FactAccident {
    const TABLE: Table = Table::FactAccidents;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.accident_id),
            nullable(self.date_id),
            nullable(self.location_id),
            Value::Integer(self.vehicle_id),
            Value::Integer(self.road_condition_id),
            nullable(self.vehicles_involved),
            Value::Integer(i64::from(self.severity_score)),
        ]
    }
}
