//! DuckDB-backed store: one database file per ingestion session.
//!
//! The file is dropped and recreated when a session starts, all tables are
//! declared before the first row, and every row of the session is appended
//! inside one transaction. A failed session rolls back and removes the file.

use super::schema::Table;
use super::sink::{ColumnarSink, Field, RowFrame};
use crate::utils::error::StoreError;
use duckdb::{appender_params_from_iter, Appender, Connection};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Open analytical store for one session
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Recreate the database file at `path` and declare all tables
    ///
    /// **Public** - called once at session start
    ///
    /// # Errors
    /// * `StoreError::Io` - an existing file cannot be removed
    /// * `StoreError::Database` - the database cannot be opened or initialized
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        remove_database_files(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directories: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Writing to {}", path.display());
        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.create_tables()?;
        Ok(store)
    }

    /// Store without a backing file
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<(), StoreError> {
        for table in Table::ALL {
            self.conn.execute_batch(&table.create_sql())?;
        }
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn begin(&self) -> Result<(), StoreError> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        Ok(())
    }

    /// Appender-backed sink; must be finished before commit
    pub fn sink(&self) -> Result<DuckDbSink<'_>, StoreError> {
        let appenders = Table::ALL
            .iter()
            .map(|table| self.conn.appender(table.name()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DuckDbSink {
            appenders,
            frame: RowFrame::default(),
        })
    }

    /// Commit the session transaction and close the database
    ///
    /// On failure the database is discarded like in [`Store::abort`], so a
    /// failed commit never leaves a file behind.
    pub fn commit(self) -> Result<(), StoreError> {
        if let Err(e) = self.conn.execute_batch("COMMIT") {
            self.abort();
            return Err(e.into());
        }
        let path = self.path.clone();
        self.close().inspect_err(|_| discard_files(path.as_deref()))
    }

    /// Roll back, close and delete the partially written database
    pub fn abort(self) {
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!("Rollback failed: {}", e);
        }
        let path = self.path.clone();
        if let Err(e) = self.close() {
            warn!("Closing database failed: {}", e);
        }
        discard_files(path.as_deref());
    }

    fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Database(e))
    }
}

/// Sink appending through one DuckDB appender per table
pub struct DuckDbSink<'conn> {
    appenders: Vec<Appender<'conn>>,
    frame: RowFrame,
}

impl DuckDbSink<'_> {
    /// Flush all pending rows; no row may be open
    pub fn finish(mut self) -> Result<(), StoreError> {
        if self.frame.is_open() {
            return Err(StoreError::Framing(
                "finish with an unterminated row".to_string(),
            ));
        }
        for appender in &mut self.appenders {
            appender.flush()?;
        }
        Ok(())
    }
}

impl ColumnarSink for DuckDbSink<'_> {
    fn begin_row(&mut self, table: Table) -> Result<(), StoreError> {
        self.frame.begin(table)
    }

    fn append(&mut self, field: Field<'_>) -> Result<(), StoreError> {
        self.frame.push(field)
    }

    fn end_row(&mut self) -> Result<(), StoreError> {
        let (table, values) = self.frame.end()?;
        self.appenders[table.index()].append_row(appender_params_from_iter(values))?;
        Ok(())
    }
}

/// Best-effort removal after a failed session
fn discard_files(path: Option<&Path>) {
    if let Some(path) = path {
        if let Err(e) = remove_database_files(path) {
            warn!("Removing {} failed: {}", path.display(), e);
        }
    }
}

/// Remove a database file and its write-ahead log, if present
///
/// **Private** - internal helper for create and abort
fn remove_database_files(path: &Path) -> Result<(), StoreError> {
    let mut wal = path.as_os_str().to_owned();
    wal.push(".wal");
    for file in [path.to_path_buf(), PathBuf::from(wal)] {
        match std::fs::remove_file(&file) {
            Ok(()) => debug!("Removed {}", file.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
