use crate::error::{Result, WarehouseError};
use crate::utils::constants::DEFAULT_SAMPLE_SIZE;
use crate::writers::schema::{table_exists, Table};
use crate::writers::WarehouseSink;
use rusqlite::types::Value;
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

/// First rows of a table, rendered as strings.
#[derive(Debug, Clone, Serialize)]
pub struct TableSample {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSample {
    /// Render as a left-aligned text table.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| column.chars().count())
            .collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line(&self.columns));
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format_line(row));
            out.push('\n');
        }
        if self.rows.is_empty() {
            out.push_str("(no rows)\n");
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub counts: Vec<TableCount>,
    pub fact_sample: TableSample,
}

impl ValidationReport {
    pub fn count(&self, table: Table) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.table == table.name())
            .map(|c| c.rows)
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Warehouse Validation ===\n");
        for count in &self.counts {
            summary.push_str(&format!("{}: {} rows\n", count.table, count.rows));
        }
        summary.push_str(&format!(
            "\nSample from {} ({} rows):\n",
            self.fact_sample.table,
            self.fact_sample.rows.len()
        ));
        summary.push_str(&self.fact_sample.render());

        summary
    }
}

/// Read-only checks run after a load.
pub struct WarehouseValidator {
    sample_size: usize,
}

impl WarehouseValidator {
    pub fn new() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Count the rows of every table and sample the fact table.
    pub fn validate(&self, sink: &WarehouseSink) -> Result<ValidationReport> {
        let conn = sink.connect_read_only()?;
        ensure_tables(&conn)?;

        let mut counts = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let rows: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table.name()),
                [],
                |row| row.get(0),
            )?;
            info!("{}: {} rows", table, rows);
            counts.push(TableCount {
                table: table.name().to_string(),
                rows: rows as usize,
            });
        }

        let fact_sample = sample_table(&conn, Table::FactAccidents, self.sample_size)?;
        info!(
            "Sample from {}:\n{}",
            Table::FactAccidents,
            fact_sample.render()
        );

        Ok(ValidationReport {
            counts,
            fact_sample,
        })
    }

    /// First `limit` rows of every table.
    pub fn snapshot(&self, sink: &WarehouseSink, limit: usize) -> Result<Vec<TableSample>> {
        let conn = sink.connect_read_only()?;
        ensure_tables(&conn)?;

        Table::ALL
            .iter()
            .map(|table| sample_table(&conn, *table, limit))
            .collect()
    }
}

impl Default for WarehouseValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_tables(conn: &Connection) -> Result<()> {
    for table in Table::ALL {
        if !table_exists(conn, table)? {
            return Err(WarehouseError::SchemaMissing {
                table: table.name().to_string(),
            });
        }
    }
    Ok(())
}

fn sample_table(conn: &Connection, table: Table, limit: usize) -> Result<TableSample> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT ?1", table.name()))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let rows = stmt
        .query_map([limit as i64], |row| {
            (0..column_count)
                .map(|i| row.get::<_, Value>(i).map(render_value))
                .collect::<rusqlite::Result<Vec<String>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(TableSample {
        table: table.name().to_string(),
        columns,
        rows,
    })
}

fn render_value(value: Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}
