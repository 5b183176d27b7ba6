pub mod rows;
pub mod schema;
pub mod sqlite_writer;

pub use rows::WarehouseRow;
pub use schema::Table;
pub use sqlite_writer::WarehouseSink;
