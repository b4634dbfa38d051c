//! Columnar sink adapter and the embedded analytical store.
//!
//! The extractor only sees [`ColumnarSink`]; DuckDB is one implementation,
//! an in-memory row store is the other.

pub mod database;
pub mod schema;
pub mod sink;

pub use database::{DuckDbSink, Store};
pub use schema::{Column, ColumnType, Table};
pub use sink::{ColumnarSink, Field, MemorySink, RowFrame};
