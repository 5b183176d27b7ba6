//! Star schema definition for the accident warehouse.
//!
//! Tables:
//! - Dim_Location: surrogate-keyed accident locations
//! - Dim_Vehicle: vehicles keyed by their source VehicleID
//! - Dim_RoadCondition: road condition readings keyed by ConditionID
//! - Dim_Date: surrogate-keyed calendar dates
//! - Fact_Accidents: one row per accident
//!
//! Only the surrogate keys (DateID, LocationID) are enforced as foreign keys.
//! VehicleID and RoadConditionID in the fact table can hold placeholder values
//! that have no dimension row.

use crate::error::Result;
use crate::utils::constants::{
    DIM_DATE_TABLE, DIM_LOCATION_TABLE, DIM_ROAD_CONDITION_TABLE, DIM_VEHICLE_TABLE,
    FACT_ACCIDENTS_TABLE,
};
use rusqlite::{Connection, OptionalExtension};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    DimLocation,
    DimVehicle,
    DimRoadCondition,
    DimDate,
    FactAccidents,
}

impl Table {
    /// All tables, dimensions first so foreign key targets exist before the
    /// fact table references them.
    pub const ALL: [Table; 5] = [
        Table::DimLocation,
        Table::DimVehicle,
        Table::DimRoadCondition,
        Table::DimDate,
        Table::FactAccidents,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::DimLocation => DIM_LOCATION_TABLE,
            Table::DimVehicle => DIM_VEHICLE_TABLE,
            Table::DimRoadCondition => DIM_ROAD_CONDITION_TABLE,
            Table::DimDate => DIM_DATE_TABLE,
            Table::FactAccidents => FACT_ACCIDENTS_TABLE,
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::DimLocation => &["LocationID", "LocationName"],
            Table::DimVehicle => &["VehicleID", "VehicleType"],
            Table::DimRoadCondition => &["RoadConditionID", "Surface", "Visibility"],
            Table::DimDate => &["DateID", "Date", "Month", "Year", "Time"],
            Table::FactAccidents => &[
                "AccidentID",
                "DateID",
                "LocationID",
                "VehicleID",
                "RoadConditionID",
                "VehiclesInvolved",
                "SeverityScore",
            ],
        }
    }

    pub fn insert_statement(self) -> String {
        let columns = self.columns();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name(),
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    fn create_statement(self) -> &'static str {
        match self {
            Table::DimLocation => {
                r#"
                CREATE TABLE IF NOT EXISTS Dim_Location (
                    LocationID INTEGER PRIMARY KEY,
                    LocationName VARCHAR(255) NOT NULL UNIQUE
                )
                "#
            }
            Table::DimVehicle => {
                r#"
                CREATE TABLE IF NOT EXISTS Dim_Vehicle (
                    VehicleID INTEGER PRIMARY KEY,
                    VehicleType VARCHAR(100) NOT NULL
                )
                "#
            }
            Table::DimRoadCondition => {
                r#"
                CREATE TABLE IF NOT EXISTS Dim_RoadCondition (
                    RoadConditionID INTEGER PRIMARY KEY,
                    Surface VARCHAR(50) NOT NULL,
                    Visibility VARCHAR(50) NOT NULL
                )
                "#
            }
            Table::DimDate => {
                r#"
                CREATE TABLE IF NOT EXISTS Dim_Date (
                    DateID INTEGER PRIMARY KEY,
                    Date DATE NOT NULL UNIQUE,
                    Month INTEGER NOT NULL,
                    Year INTEGER NOT NULL,
                    Time TIMESTAMP NOT NULL
                )
                "#
            }
            Table::FactAccidents => {
                r#"
                CREATE TABLE IF NOT EXISTS Fact_Accidents (
                    AccidentID INTEGER PRIMARY KEY,
                    DateID INTEGER REFERENCES Dim_Date(DateID),
                    LocationID INTEGER REFERENCES Dim_Location(LocationID),
                    VehicleID INTEGER NOT NULL,
                    RoadConditionID INTEGER NOT NULL,
                    VehiclesInvolved INTEGER,
                    SeverityScore INTEGER NOT NULL CHECK (SeverityScore BETWEEN 1 AND 3)
                )
                "#
            }
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Create every warehouse table and index that does not exist yet.
///
/// Existing tables and their rows are left untouched.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    for table in Table::ALL {
        conn.execute(table.create_statement(), [])?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_fact_accidents_date ON Fact_Accidents(DateID)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_fact_accidents_location ON Fact_Accidents(LocationID)",
        [],
    )?;

    info!("Warehouse tables created successfully");
    Ok(())
}

pub fn table_exists(conn: &Connection, table: Table) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table.name()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        for table in Table::ALL {
            assert!(table_exists(&conn, table).unwrap(), "{} missing", table);
        }
    }

    #[test]
    fn test_create_tables_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute(
            "INSERT INTO Dim_Location (LocationID, LocationName) VALUES (1, 'Harbour Rd')",
            [],
        )
        .unwrap();

        // Should not fail or drop rows on second call
        create_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Dim_Location", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_fact_foreign_keys_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO Fact_Accidents (AccidentID, DateID, LocationID, VehicleID, RoadConditionID, VehiclesInvolved, SeverityScore)
             VALUES (1, 99, NULL, 5, 5, 1, 1)",
            [],
        );
        assert!(result.is_err());

        // Null keys and placeholder vehicle/road condition ids are accepted
        conn.execute(
            "INSERT INTO Fact_Accidents (AccidentID, DateID, LocationID, VehicleID, RoadConditionID, VehiclesInvolved, SeverityScore)
             VALUES (2, NULL, NULL, 150, 77, 1, 1)",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_insert_statement() {
        assert_eq!(
            Table::DimLocation.insert_statement(),
            "INSERT INTO Dim_Location (LocationID, LocationName) VALUES (?1, ?2)"
        );
    }
}
