use crate::error::{Result, WarehouseError};
use crate::models::{Dimensions, FactAccident};
use crate::writers::rows::WarehouseRow;
use crate::writers::schema::{self, Table};
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle on the SQLite warehouse file.
///
/// Connections are opened per operation and dropped when it finishes; nothing
/// holds the database open between pipeline stages.
#[derive(Debug, Clone)]
pub struct WarehouseSink {
    path: PathBuf,
}

impl WarehouseSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-write connection with foreign key enforcement enabled.
    pub fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.path).map_err(|source| self.unavailable(source))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Open a read-only connection. Fails if the database file does not exist.
    pub fn connect_read_only(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| self.unavailable(source))
    }

    fn unavailable(&self, source: rusqlite::Error) -> WarehouseError {
        WarehouseError::SinkUnavailable {
            path: self.path.clone(),
            source,
        }
    }

    /// Create any missing warehouse tables. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::create_tables(&conn)
    }

    /// Delete every row of `table`.
    pub fn clear_table(&self, table: Table) -> Result<usize> {
        let conn = self.connect()?;
        let deleted = conn.execute(&format!("DELETE FROM {}", table.name()), [])?;
        debug!("Cleared {} rows from {}", deleted, table);
        Ok(deleted)
    }

    /// Replace the contents of the row type's table with `rows`.
    ///
    /// The delete and the inserts share one transaction, so readers see
    /// either the previous table or the new one.
    pub fn replace_rows<R: WarehouseRow>(&self, rows: &[R]) -> Result<usize> {
        let table = R::TABLE;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute(&format!("DELETE FROM {}", table.name()), [])?;
        {
            let mut stmt = tx.prepare(&table.insert_statement())?;
            for row in rows {
                stmt.execute(params_from_iter(row.values()))?;
            }
        }
        tx.commit()?;

        info!("Populated {} with {} rows", table, rows.len());
        Ok(rows.len())
    }

    /// Replace every dimension and the fact table.
    ///
    /// Facts are cleared first so that replacing a dimension never leaves
    /// dangling foreign keys, and written last once their targets exist.
    pub fn write_warehouse(&self, dimensions: &Dimensions, facts: &[FactAccident]) -> Result<()> {
        self.clear_table(Table::FactAccidents)?;
        self.replace_rows(&dimensions.locations)?;
        self.replace_rows(&dimensions.vehicles)?;
        self.replace_rows(&dimensions.road_conditions)?;
        self.replace_rows(&dimensions.dates)?;
        self.replace_rows(facts)?;
        Ok(())
    }

    pub fn count_rows(&self, table: Table) -> Result<usize> {
        let conn = self.connect_read_only()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
