//! JIT Log Ingest
//!
//! Loads the XML compilation logs written by a JIT-compiling virtual machine
//! into a columnar DuckDB dataset with four tables: runs, compile threads,
//! compilation tasks and code cache samples.
//!
//! This crate provides the core implementation for the
//! `jit-log-ingest` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! jit-log-ingest ingest --logs logs --database log.duckdb --summary
//! jit-log-ingest schema --show
//! ```
//!
//! Library users call [`ingest::run_session`] with an
//! [`utils::config::IngestConfig`].

pub mod commands;
pub mod ingest;
pub mod output;
pub mod parser;
pub mod store;
pub mod utils;
