//! Normalized rows produced by extraction.
//!
//! Each record knows how to write itself through a [`ColumnarSink`] in the
//! declared column order of its table.

use crate::store::{ColumnarSink, Field, Table};
use crate::utils::error::StoreError;

/// One ingested log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub run_id: u32,
    pub name: String,
    /// VM start, milliseconds since the epoch
    pub start_epoch_ms: u64,
    pub args: String,
}

impl RunRecord {
    pub fn write<S: ColumnarSink + ?Sized>(&self, sink: &mut S) -> Result<(), StoreError> {
        sink.begin_row(Table::Run)?;
        sink.append(Field::UInteger(self.run_id))?;
        sink.append(Field::Text(&self.name))?;
        sink.append(Field::UBigInt(self.start_epoch_ms))?;
        sink.append(Field::Text(&self.args))?;
        sink.end_row()
    }
}

/// Compile thread announcement; may repeat within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRecord {
    pub thread_id: u32,
    pub run_id: u32,
    pub name: String,
    pub start_micros: u64,
}

impl ThreadRecord {
    pub fn write<S: ColumnarSink + ?Sized>(&self, sink: &mut S) -> Result<(), StoreError> {
        sink.begin_row(Table::Thread)?;
        sink.append(Field::UInteger(self.thread_id))?;
        sink.append(Field::UInteger(self.run_id))?;
        sink.append(Field::Text(&self.name))?;
        sink.append(Field::UBigInt(self.start_micros))?;
        sink.end_row()
    }
}

/// One compilation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: u32,
    pub class_name: String,
    pub method_name: String,
    pub kind: Option<String>,
    pub level: u8,
    pub run_id: u32,
    /// Failure reason; `None` means the compilation succeeded
    pub failure: Option<String>,
    pub start_micros: u64,
    /// Zero is a legitimate duration, not a marker for "no work"
    pub duration_micros: u32,
    pub native_method_size: u32,
    pub inlined_method_size: u32,
    pub thread_id: u32,
}

impl TaskRecord {
    pub fn end_micros(&self) -> u64 {
        self.start_micros + u64::from(self.duration_micros)
    }

    pub fn write<S: ColumnarSink + ?Sized>(&self, sink: &mut S) -> Result<(), StoreError> {
        sink.begin_row(Table::CompilationTask)?;
        sink.append(Field::UInteger(self.id))?;
        sink.append(Field::Text(&self.class_name))?;
        sink.append(Field::Text(&self.method_name))?;
        sink.append(Field::text_or_null(self.kind.as_deref()))?;
        sink.append(Field::UTinyInt(self.level))?;
        sink.append(Field::UInteger(self.run_id))?;
        sink.append(Field::text_or_null(self.failure.as_deref()))?;
        sink.append(Field::UBigInt(self.start_micros))?;
        sink.append(Field::UInteger(self.duration_micros))?;
        sink.append(Field::UInteger(self.native_method_size))?;
        sink.append(Field::UInteger(self.inlined_method_size))?;
        sink.append(Field::UInteger(self.thread_id))?;
        sink.end_row()
    }
}

/// Code cache usage reported at task completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCacheSample {
    pub run_id: u32,
    pub time_micros: u64,
    pub blobs: u32,
    pub methods: u32,
    pub adapters: u32,
    /// Bytes in use: run capacity minus free space
    pub used: u32,
}

impl CodeCacheSample {
    pub fn write<S: ColumnarSink + ?Sized>(&self, sink: &mut S) -> Result<(), StoreError> {
        sink.begin_row(Table::CodeCacheSample)?;
        sink.append(Field::UInteger(self.run_id))?;
        sink.append(Field::UBigInt(self.time_micros))?;
        sink.append(Field::UInteger(self.blobs))?;
        sink.append(Field::UInteger(self.methods))?;
        sink.append(Field::UInteger(self.adapters))?;
        sink.append(Field::UInteger(self.used))?;
        sink.end_row()
    }
}
