//! Fixed table schemas of the produced dataset.
//!
//! Column names are lower case so the dashboard can join with `USING (runId)`
//! regardless of identifier casing. Times are microseconds except
//! `runs.start`, which is the VM start epoch in milliseconds.

/// SQL type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    UTinyInt,
    UInteger,
    UBigInt,
    Varchar,
}

impl ColumnType {
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::UTinyInt => "UTINYINT",
            ColumnType::UInteger => "UINTEGER",
            ColumnType::UBigInt => "UBIGINT",
            ColumnType::Varchar => "VARCHAR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
}

const fn required(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty, nullable: false }
}

const fn optional(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty, nullable: true }
}

const RUN_COLUMNS: &[Column] = &[
    required("runid", ColumnType::UInteger),
    required("name", ColumnType::Varchar),
    // milliseconds
    required("start", ColumnType::UBigInt),
    required("args", ColumnType::Varchar),
];

const THREAD_COLUMNS: &[Column] = &[
    required("threadid", ColumnType::UInteger),
    required("runid", ColumnType::UInteger),
    required("name", ColumnType::Varchar),
    required("start", ColumnType::UBigInt),
];

const TASK_COLUMNS: &[Column] = &[
    required("id", ColumnType::UInteger),
    required("class", ColumnType::Varchar),
    required("method", ColumnType::Varchar),
    optional("kind", ColumnType::Varchar),
    optional("level", ColumnType::UTinyInt),
    required("runid", ColumnType::UInteger),
    optional("failure", ColumnType::Varchar),
    required("start", ColumnType::UBigInt),
    required("duration", ColumnType::UInteger),
    optional("nativemethodsize", ColumnType::UInteger),
    optional("inlinedmethodsize", ColumnType::UInteger),
    required("threadid", ColumnType::UInteger),
];

const CODE_CACHE_COLUMNS: &[Column] = &[
    required("runid", ColumnType::UInteger),
    required("time", ColumnType::UBigInt),
    required("blobs", ColumnType::UInteger),
    required("methods", ColumnType::UInteger),
    required("adapters", ColumnType::UInteger),
    required("used", ColumnType::UInteger),
];

/// Logical tables written by ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Run,
    Thread,
    CompilationTask,
    CodeCacheSample,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::CompilationTask,
        Table::Thread,
        Table::Run,
        Table::CodeCacheSample,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Run => "runs",
            Table::Thread => "threads",
            Table::CompilationTask => "tasks",
            Table::CodeCacheSample => "code_cache",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Table::Run => RUN_COLUMNS,
            Table::Thread => THREAD_COLUMNS,
            Table::CompilationTask => TASK_COLUMNS,
            Table::CodeCacheSample => CODE_CACHE_COLUMNS,
        }
    }

    /// Position in [`Table::ALL`], used to index per-table state
    pub fn index(self) -> usize {
        match self {
            Table::CompilationTask => 0,
            Table::Thread => 1,
            Table::Run => 2,
            Table::CodeCacheSample => 3,
        }
    }

    pub fn create_sql(self) -> String {
        let columns: Vec<String> = self
            .columns()
            .iter()
            .map(|column| {
                let mut definition = format!("{} {}", column.name, column.ty.sql());
                if !column.nullable {
                    definition.push_str(" not null");
                }
                definition
            })
            .collect();
        format!("create table {} ({})", self.name(), columns.join(", "))
    }
}
