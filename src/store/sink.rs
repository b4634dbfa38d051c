//! Row-oriented append contract consumed by the extractor.
//!
//! Rows are framed as `begin_row(table)`, one `append` per column in
//! declared order, then `end_row()`. [`RowFrame`] enforces the framing and
//! checks every field against the table schema, so every sink rejects the
//! same mistakes.

use super::schema::{Column, ColumnType, Table};
use crate::utils::error::StoreError;
use duckdb::types::Value;

/// One field value handed to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    UTinyInt(u8),
    UInteger(u32),
    UBigInt(u64),
    Text(&'a str),
    Null,
}

impl<'a> Field<'a> {
    pub fn text_or_null(value: Option<&'a str>) -> Self {
        value.map_or(Field::Null, Field::Text)
    }

    fn matches(&self, column: &Column) -> bool {
        match self {
            Field::Null => column.nullable,
            Field::UTinyInt(_) => column.ty == ColumnType::UTinyInt,
            Field::UInteger(_) => column.ty == ColumnType::UInteger,
            Field::UBigInt(_) => column.ty == ColumnType::UBigInt,
            Field::Text(_) => column.ty == ColumnType::Varchar,
        }
    }

    pub fn to_value(self) -> Value {
        match self {
            Field::UTinyInt(v) => Value::UTinyInt(v),
            Field::UInteger(v) => Value::UInt(v),
            Field::UBigInt(v) => Value::UBigInt(v),
            Field::Text(v) => Value::Text(v.to_string()),
            Field::Null => Value::Null,
        }
    }
}

/// Bulk-append interface, one independent stream per table
pub trait ColumnarSink {
    fn begin_row(&mut self, table: Table) -> Result<(), StoreError>;

    fn append(&mut self, field: Field<'_>) -> Result<(), StoreError>;

    fn end_row(&mut self) -> Result<(), StoreError>;
}

/// Row under construction, validated against the table schema
#[derive(Debug, Default)]
pub struct RowFrame {
    table: Option<Table>,
    values: Vec<Value>,
}

impl RowFrame {
    pub fn begin(&mut self, table: Table) -> Result<(), StoreError> {
        if let Some(open) = self.table {
            return Err(StoreError::Framing(format!(
                "begin_row({}) while a {} row is still open",
                table.name(),
                open.name()
            )));
        }
        self.table = Some(table);
        self.values.clear();
        Ok(())
    }

    pub fn push(&mut self, field: Field<'_>) -> Result<(), StoreError> {
        let table = self
            .table
            .ok_or_else(|| StoreError::Framing("append outside of a row".to_string()))?;
        let columns = table.columns();
        let Some(column) = columns.get(self.values.len()) else {
            return Err(StoreError::Framing(format!(
                "too many fields for {} ({} columns)",
                table.name(),
                columns.len()
            )));
        };
        if !field.matches(column) {
            return Err(StoreError::Column {
                table: table.name(),
                column: column.name,
                message: format!("{field:?} does not fit {}", column.ty.sql()),
            });
        }
        self.values.push(field.to_value());
        Ok(())
    }

    /// Close the row, yielding its table and values in column order
    pub fn end(&mut self) -> Result<(Table, std::vec::Drain<'_, Value>), StoreError> {
        let table = self
            .table
            .take()
            .ok_or_else(|| StoreError::Framing("end_row without begin_row".to_string()))?;
        let expected = table.columns().len();
        if self.values.len() != expected {
            return Err(StoreError::Framing(format!(
                "{} row has {} fields, expected {expected}",
                table.name(),
                self.values.len()
            )));
        }
        Ok((table, self.values.drain(..)))
    }

    pub fn is_open(&self) -> bool {
        self.table.is_some()
    }
}

/// Sink keeping rows in memory, per table
#[derive(Debug, Default)]
pub struct MemorySink {
    frame: RowFrame,
    rows: [Vec<Vec<Value>>; 4],
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: Table) -> &[Vec<Value>] {
        &self.rows[table.index()]
    }

    pub fn row_count(&self, table: Table) -> usize {
        self.rows[table.index()].len()
    }
}

impl ColumnarSink for MemorySink {
    fn begin_row(&mut self, table: Table) -> Result<(), StoreError> {
        self.frame.begin(table)
    }

    fn append(&mut self, field: Field<'_>) -> Result<(), StoreError> {
        self.frame.push(field)
    }

    fn end_row(&mut self) -> Result<(), StoreError> {
        let (table, values) = self.frame.end()?;
        let row: Vec<Value> = values.collect();
        self.rows[table.index()].push(row);
        Ok(())
    }
}
