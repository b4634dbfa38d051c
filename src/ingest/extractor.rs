//! Extraction state machine for one compilation log.
//!
//! Pulls tokens from start to end of the stream and reacts to a closed set of
//! element kinds. Everything else is passed over without materialization:
//! only its open event is seen and traversal continues into its children, so
//! recognized elements nested in containers (`compilation_log`,
//! `vm_arguments`, ...) are still found.
//!
//! Reference: https://wiki.openjdk.org/display/HotSpot/LogCompilation+overview

use super::records::{CodeCacheSample, RunRecord, TaskRecord, ThreadRecord};
use super::run_name::{resolve_run_identity, RunTally};
use crate::parser::{Token, TokenSource, TreeMaterializer, XmlElement};
use crate::store::ColumnarSink;
use crate::utils::config::{DEFAULT_COMPILE_LEVEL, STALE_TASK_FAILURE};
use crate::utils::error::IngestError;
use log::debug;
use std::fmt::Display;
use std::io::BufRead;
use std::str::FromStr;

/// Direct children of `task` that are kept when it is materialized
const TASK_CHILDREN: &[&str] = &["task_done", "failure", "code_cache"];
const VM_VERSION_CHILDREN: &[&str] = &["release"];

/// Element kinds the extractor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `hotspot_log`, carries the VM start time
    VmStart,
    VmVersion,
    Args,
    ThreadStart,
    Task,
    /// Property dump, discarded unparsed
    Properties,
}

impl ElementKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hotspot_log" => Some(ElementKind::VmStart),
            "vm_version" => Some(ElementKind::VmVersion),
            "args" => Some(ElementKind::Args),
            "start_compile_thread" => Some(ElementKind::ThreadStart),
            "task" => Some(ElementKind::Task),
            "properties" => Some(ElementKind::Properties),
            _ => None,
        }
    }
}

/// Per-file extraction counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStats {
    pub run_name: Option<String>,
    pub vm_start_ms: Option<u64>,
    pub threads: u64,
    pub tasks: u64,
    pub failed_tasks: u64,
    pub stale_tasks: u64,
    pub code_cache_samples: u64,
}

/// Convert a `stamp` (fractional seconds since VM start) to microseconds
///
/// The product is rounded to the nearest microsecond, not truncated, so
/// `0.293` is stored as `293000` rather than `292999`.
pub fn seconds_to_micros(stamp: &str) -> Result<i64, IngestError> {
    let seconds: f64 = stamp
        .trim()
        .parse()
        .map_err(|e| IngestError::MalformedInput(format!("stamp '{stamp}': {e}")))?;
    if !seconds.is_finite() {
        return Err(IngestError::MalformedInput(format!(
            "stamp '{stamp}' is not a finite number"
        )));
    }
    Ok((seconds * 1_000_000.0).round() as i64)
}

/// Split `java.lang.String hashCode ()I` into class and the rest
fn split_method(method: &str) -> Result<(&str, &str), IngestError> {
    match method.split_once(' ') {
        Some((class, rest)) if !class.is_empty() => Ok((class, rest)),
        _ => Err(IngestError::InvariantViolation(format!(
            "method '{method}' has no class/method separator"
        ))),
    }
}

fn required<'a>(value: Option<&'a str>, element: &str, attribute: &str) -> Result<&'a str, IngestError> {
    value.ok_or_else(|| IngestError::MissingField(format!("{element}@{attribute}")))
}

fn parse_number<T>(value: &str, element: &str, attribute: &str) -> Result<T, IngestError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e| {
        IngestError::MalformedInput(format!("{element}@{attribute} = '{value}': {e}"))
    })
}

/// Parse a size attribute that must not be negative
fn parse_size(value: &str, element: &str, attribute: &str) -> Result<u32, IngestError> {
    let size: i64 = parse_number(value, element, attribute)?;
    u32::try_from(size).map_err(|_| {
        IngestError::InvariantViolation(format!("{element}@{attribute} = {size} is out of range"))
    })
}

fn non_negative_micros(micros: i64, what: &str) -> Result<u64, IngestError> {
    u64::try_from(micros)
        .map_err(|_| IngestError::InvariantViolation(format!("{what} is negative ({micros} µs)")))
}

/// Task attributes read from the open event, before the body is materialized
struct TaskHeader {
    id: u32,
    class_name: String,
    method_name: String,
    kind: Option<String>,
    level: u8,
    start_micros: i64,
    thread_id: u32,
}

/// State machine over one log file
///
/// Owns its node pool; a new extractor (and pool) is created for every file.
pub struct Extractor<'a, S: ColumnarSink + ?Sized> {
    run_id: u32,
    sink: &'a mut S,
    tally: &'a mut RunTally,
    materializer: TreeMaterializer,
    vm_start_ms: Option<u64>,
    vm_version: Option<String>,
    max_code_cache_size: Option<u64>,
    current_thread: Option<u32>,
    stats: FileStats,
}

impl<'a, S: ColumnarSink + ?Sized> Extractor<'a, S> {
    pub fn new(run_id: u32, sink: &'a mut S, tally: &'a mut RunTally) -> Self {
        Self {
            run_id,
            sink,
            tally,
            materializer: TreeMaterializer::new(),
            vm_start_ms: None,
            vm_version: None,
            max_code_cache_size: None,
            current_thread: None,
            stats: FileStats::default(),
        }
    }

    /// Drive the token source to the end of the stream
    ///
    /// **Public** - main entry point per log file
    ///
    /// # Returns
    /// Counters for the file; rows have been written to the sink
    ///
    /// # Errors
    /// Any of the ingestion error kinds; all are fatal for the session
    pub fn run<R: BufRead>(mut self, source: &mut TokenSource<R>) -> Result<FileStats, IngestError> {
        loop {
            match source.next_token()? {
                Token::Open { .. } => {
                    if let Some(kind) = ElementKind::from_name(source.name()) {
                        self.dispatch(kind, source)?;
                    }
                }
                Token::Text | Token::Close => {}
                Token::Eof => break,
            }
        }

        if self.stats.run_name.is_none() {
            return Err(IngestError::MissingField(
                "args (no run metadata in log)".to_string(),
            ));
        }

        debug!(
            "Run {}: {} threads, {} tasks ({} failed, {} stale), {} code cache samples",
            self.run_id,
            self.stats.threads,
            self.stats.tasks,
            self.stats.failed_tasks,
            self.stats.stale_tasks,
            self.stats.code_cache_samples
        );
        Ok(self.stats)
    }

    fn dispatch<R: BufRead>(&mut self, kind: ElementKind, source: &mut TokenSource<R>) -> Result<(), IngestError> {
        match kind {
            ElementKind::VmStart => {
                if let Some(time) = source.attribute("time_ms") {
                    self.vm_start_ms = Some(parse_number(time, "hotspot_log", "time_ms")?);
                }
                Ok(())
            }
            ElementKind::VmVersion => self.read_vm_version(source),
            ElementKind::Args => self.read_args(source),
            ElementKind::ThreadStart => self.read_thread_start(source),
            ElementKind::Task => self.read_task(source),
            ElementKind::Properties => source.skip_element(),
        }
    }

    fn read_vm_version<R: BufRead>(&mut self, source: &mut TokenSource<R>) -> Result<(), IngestError> {
        let dom = self.materializer.materialize(source, Some(VM_VERSION_CHILDREN))?;
        let release = dom
            .child("release")
            .and_then(|release| release.content.as_deref())
            .ok_or_else(|| IngestError::MissingField("vm_version/release".to_string()))?;
        self.vm_version = Some(release.trim().to_string());
        Ok(())
    }

    fn read_args<R: BufRead>(&mut self, source: &mut TokenSource<R>) -> Result<(), IngestError> {
        if self.stats.run_name.is_some() {
            return Err(IngestError::SequencingError(
                "second args element in one log".to_string(),
            ));
        }

        let args = source.read_element_text()?;
        let version = self.vm_version.as_deref().ok_or_else(|| {
            IngestError::MissingField("vm_version/release before args".to_string())
        })?;
        let start_epoch_ms = self
            .vm_start_ms
            .ok_or_else(|| IngestError::MissingField("hotspot_log@time_ms".to_string()))?;

        let identity = resolve_run_identity(&args, version, self.tally)?;
        debug!("Run {} resolved as '{}'", self.run_id, identity.name);
        self.max_code_cache_size = Some(identity.max_code_cache_size);

        RunRecord {
            run_id: self.run_id,
            name: identity.name.clone(),
            start_epoch_ms,
            args,
        }
        .write(&mut *self.sink)?;

        self.stats.run_name = Some(identity.name);
        self.stats.vm_start_ms = Some(start_epoch_ms);
        Ok(())
    }

    fn read_thread_start<R: BufRead>(&mut self, source: &mut TokenSource<R>) -> Result<(), IngestError> {
        const ELEMENT: &str = "start_compile_thread";
        let name = required(source.attribute("name"), ELEMENT, "name")?;
        let thread_id: u32 = parse_number(required(source.attribute("thread"), ELEMENT, "thread")?, ELEMENT, "thread")?;
        let start = seconds_to_micros(required(source.attribute("stamp"), ELEMENT, "stamp")?)?;

        // re-announcements are kept as they are
        ThreadRecord {
            thread_id,
            run_id: self.run_id,
            name: name.to_string(),
            start_micros: non_negative_micros(start, "thread start")?,
        }
        .write(&mut *self.sink)?;

        self.current_thread = Some(thread_id);
        self.stats.threads += 1;
        Ok(())
    }

    fn read_task_header<R: BufRead>(&self, source: &TokenSource<R>) -> Result<TaskHeader, IngestError> {
        const ELEMENT: &str = "task";
        let id: u32 = parse_number(required(source.attribute("compile_id"), ELEMENT, "compile_id")?, ELEMENT, "compile_id")?;
        let method = required(source.attribute("method"), ELEMENT, "method")?;
        let (class_name, method_name) = split_method(method)?;
        let start_micros = seconds_to_micros(required(source.attribute("stamp"), ELEMENT, "stamp")?)?;
        // tier 4 unless stated otherwise
        let level = match source.attribute("level") {
            Some(level) => parse_number(level, ELEMENT, "level")?,
            None => DEFAULT_COMPILE_LEVEL,
        };
        let thread_id = self.current_thread.ok_or_else(|| {
            IngestError::SequencingError(format!("task {id} before any start_compile_thread"))
        })?;

        Ok(TaskHeader {
            id,
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
            kind: source.attribute("compile_kind").map(str::to_string),
            level,
            start_micros,
            thread_id,
        })
    }

    fn read_task<R: BufRead>(&mut self, source: &mut TokenSource<R>) -> Result<(), IngestError> {
        let header = self.read_task_header(source)?;
        let dom = self.materializer.materialize(source, Some(TASK_CHILDREN))?;
        let done = dom
            .child("task_done")
            .ok_or_else(|| IngestError::MissingField(format!("task {} has no task_done", header.id)))?;

        let mut native_method_size = 0;
        let mut inlined_method_size = 0;
        let failure = if done.attribute("success") == Some("0") {
            let reason = dom
                .child("failure")
                .and_then(|failure| failure.attribute("reason"))
                .ok_or_else(|| {
                    IngestError::MissingField(format!("failure@reason for failed task {}", header.id))
                })?;
            Some(reason.to_string())
        } else {
            // nmsize is the number of instruction bytes produced by the compile
            native_method_size = parse_size(required(done.attribute("nmsize"), "task_done", "nmsize")?, "task_done", "nmsize")?;
            if let Some(inlined) = done.attribute("inlined_bytes") {
                inlined_method_size = parse_size(inlined, "task_done", "inlined_bytes")?;
            }
            None
        };

        let end = seconds_to_micros(required(done.attribute("stamp"), "task_done", "stamp")?)?;
        let duration = end - header.start_micros;
        if duration < 0 {
            return Err(IngestError::InvariantViolation(format!(
                "task {} ends before it starts ({} µs)",
                header.id, duration
            )));
        }
        let duration_micros = u32::try_from(duration).map_err(|_| {
            IngestError::InvariantViolation(format!("task {} duration {duration} µs is out of range", header.id))
        })?;

        let task = TaskRecord {
            id: header.id,
            class_name: header.class_name,
            method_name: header.method_name,
            kind: header.kind,
            level: header.level,
            run_id: self.run_id,
            failure,
            start_micros: non_negative_micros(header.start_micros, "task start")?,
            duration_micros,
            native_method_size,
            inlined_method_size,
            thread_id: header.thread_id,
        };
        task.write(&mut *self.sink)?;

        self.stats.tasks += 1;
        match task.failure.as_deref() {
            Some(STALE_TASK_FAILURE) => {
                self.stats.failed_tasks += 1;
                self.stats.stale_tasks += 1;
            }
            Some(_) => self.stats.failed_tasks += 1,
            None => {}
        }

        if let Some(code_cache) = dom.child("code_cache") {
            let sample = self.code_cache_sample(code_cache, task.end_micros())?;
            sample.write(&mut *self.sink)?;
            self.stats.code_cache_samples += 1;
        }
        Ok(())
    }

    fn code_cache_sample(&self, dom: &XmlElement, time_micros: u64) -> Result<CodeCacheSample, IngestError> {
        const ELEMENT: &str = "code_cache";
        let max = self.max_code_cache_size.ok_or_else(|| {
            IngestError::SequencingError("code_cache sample before the run's args".to_string())
        })?;

        let count = |attribute: &str| -> Result<u32, IngestError> {
            parse_size(required(dom.attribute(attribute), ELEMENT, attribute)?, ELEMENT, attribute)
        };
        let free: i64 = parse_number(
            required(dom.attribute("free_code_cache"), ELEMENT, "free_code_cache")?,
            ELEMENT,
            "free_code_cache",
        )?;

        let used = i64::try_from(max)
            .ok()
            .and_then(|max| max.checked_sub(free))
            .and_then(|used| u32::try_from(used).ok())
            .ok_or_else(|| {
                IngestError::InvariantViolation(format!(
                    "code cache usage {max} - {free} is out of range"
                ))
            })?;

        Ok(CodeCacheSample {
            run_id: self.run_id,
            time_micros,
            blobs: count("total_blobs")?,
            methods: count("nmethods")?,
            adapters: count("adapters")?,
            used,
        })
    }
}

/// Extract one log stream into `sink`
///
/// **Public** - convenience wrapper used by the session
pub fn extract_log<R: BufRead, S: ColumnarSink + ?Sized>(
    run_id: u32,
    input: R,
    sink: &mut S,
    tally: &mut RunTally,
) -> Result<FileStats, IngestError> {
    let mut source = TokenSource::new(input);
    Extractor::new(run_id, sink, tally).run(&mut source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemorySink, Table};
    use duckdb::types::Value;
    use pretty_assertions::assert_eq;

    const HEADER: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<hotspot_log version='160 1' process='4242' time_ms='1700000000000'>
<vm_version>
<name>OpenJDK 64-Bit Server VM</name>
<release>
21.0.1+12-b509.1
</release>
<info>built by jetbrains</info>
</vm_version>
<vm_arguments>
<args>
-XX:+UnlockDiagnosticVMOptions -XX:+LogCompilation -XX:CICompilerCount=2
</args>
<command>com.example.Main</command>
<properties>
java.vm.version=21.0.1+12-b509.1
</properties>
</vm_arguments>
"#;

    fn log(body: &str) -> String {
        format!("{HEADER}<compilation_log thread='22531'>\n{body}\n</compilation_log>\n</hotspot_log>\n")
    }

    fn extract(xml: &str) -> Result<(FileStats, MemorySink), IngestError> {
        let mut sink = MemorySink::new();
        let mut tally = RunTally::new();
        let stats = extract_log(3, xml.as_bytes(), &mut sink, &mut tally)?;
        Ok((stats, sink))
    }

    const THREAD: &str = "<start_compile_thread name='C2 CompilerThread0' thread='22531' process='4242' stamp='0.081'/>";

    #[test]
    fn test_seconds_to_micros() {
        assert_eq!(seconds_to_micros("0.104").unwrap(), 104_000);
        assert_eq!(seconds_to_micros("12.5").unwrap(), 12_500_000);
        assert_eq!(seconds_to_micros("0.293").unwrap(), 293_000);
        assert!(matches!(seconds_to_micros("abc"), Err(IngestError::MalformedInput(_))));
    }

    #[test]
    fn test_split_method() {
        assert_eq!(
            split_method("java.lang.String hashCode ()I").unwrap(),
            ("java.lang.String", "hashCode ()I")
        );
        assert!(split_method("noseparator").is_err());
        assert!(split_method(" leading").is_err());
    }

    #[test]
    fn test_run_and_thread_rows() {
        let (stats, sink) = extract(&log(THREAD)).unwrap();

        assert_eq!(stats.run_name.as_deref(), Some("21.b509 cc2 tc rcs240 (0)"));
        assert_eq!(stats.vm_start_ms, Some(1_700_000_000_000));

        let runs = sink.rows(Table::Run);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0][0], Value::UInt(3));
        assert_eq!(runs[0][2], Value::UBigInt(1_700_000_000_000));

        let threads = sink.rows(Table::Thread);
        assert_eq!(
            threads[0],
            vec![
                Value::UInt(22531),
                Value::UInt(3),
                Value::Text("C2 CompilerThread0".to_string()),
                Value::UBigInt(81_000),
            ]
        );
    }

    #[test]
    fn test_successful_task() {
        let body = format!(
            "{THREAD}\n<task compile_id='12' method='java.lang.String hashCode ()I' bytes='60' count='5000' stamp='0.104'>\n\
             <phase name='parse' stamp='0.104'><parse method='1'/></phase>\n\
             <task_done success='1' nmsize='352' count='5000' inlined_bytes='17' stamp='0.110'/>\n</task>"
        );
        let (stats, sink) = extract(&log(&body)).unwrap();

        assert_eq!(stats.tasks, 1);
        assert_eq!(stats.failed_tasks, 0);
        assert_eq!(
            sink.rows(Table::CompilationTask)[0],
            vec![
                Value::UInt(12),
                Value::Text("java.lang.String".to_string()),
                Value::Text("hashCode ()I".to_string()),
                Value::Null,
                Value::UTinyInt(4),
                Value::UInt(3),
                Value::Null,
                Value::UBigInt(104_000),
                Value::UInt(6_000),
                Value::UInt(352),
                Value::UInt(17),
                Value::UInt(22531),
            ]
        );
        assert_eq!(sink.row_count(Table::CodeCacheSample), 0);
    }

    #[test]
    fn test_failed_task_has_zero_size() {
        let body = format!(
            "{THREAD}\n<task compile_id='40' compile_kind='osr' level='3' method='a.B run ()V' stamp='1.000'>\n\
             <failure reason='stale task' stamp='1.002'/>\n<task_done success='0' nmsize='999' stamp='1.002'/>\n</task>"
        );
        let (stats, sink) = extract(&log(&body)).unwrap();

        assert_eq!(stats.failed_tasks, 1);
        assert_eq!(stats.stale_tasks, 1);
        let row = &sink.rows(Table::CompilationTask)[0];
        assert_eq!(row[3], Value::Text("osr".to_string()));
        assert_eq!(row[4], Value::UTinyInt(3));
        assert_eq!(row[6], Value::Text("stale task".to_string()));
        assert_eq!(row[8], Value::UInt(2_000));
        assert_eq!(row[9], Value::UInt(0));
    }

    #[test]
    fn test_zero_duration_is_kept() {
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='2.5'><task_done success='1' nmsize='10' stamp='2.5'/></task>"
        );
        let (_, sink) = extract(&log(&body)).unwrap();
        assert_eq!(sink.rows(Table::CompilationTask)[0][8], Value::UInt(0));
    }

    #[test]
    fn test_code_cache_sample() {
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'>\
             <task_done success='1' nmsize='10' stamp='0.75'/>\
             <code_cache total_blobs='1200' nmethods='800' adapters='300' free_code_cache='250000000'/></task>"
        );
        let (stats, sink) = extract(&log(&body)).unwrap();

        assert_eq!(stats.code_cache_samples, 1);
        assert_eq!(
            sink.rows(Table::CodeCacheSample)[0],
            vec![
                Value::UInt(3),
                Value::UBigInt(750_000),
                Value::UInt(1200),
                Value::UInt(800),
                Value::UInt(300),
                Value::UInt(240 * 1_048_576 - 250_000_000),
            ]
        );
    }

    #[test]
    fn test_task_uses_most_recent_thread() {
        let body = "<start_compile_thread name='C1 CompilerThread0' thread='7' stamp='0.01'/>\
            <start_compile_thread name='C2 CompilerThread0' thread='9' stamp='0.02'/>\
            <start_compile_thread name='C2 CompilerThread0' thread='9' stamp='0.03'/>\
            <task compile_id='1' method='a.B c ()V' stamp='0.5'><task_done success='1' nmsize='1' stamp='0.6'/></task>";
        let (stats, sink) = extract(&log(body)).unwrap();

        assert_eq!(stats.threads, 3);
        assert_eq!(sink.rows(Table::CompilationTask)[0][11], Value::UInt(9));
    }

    #[test]
    fn test_missing_nmsize_on_success() {
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'><task_done success='1' stamp='0.6'/></task>"
        );
        let err = extract(&log(&body)).unwrap_err();
        assert!(matches!(err, IngestError::MissingField(ref f) if f.contains("nmsize")));
    }

    #[test]
    fn test_failure_without_reason() {
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'><task_done success='0' stamp='0.6'/></task>"
        );
        assert!(matches!(extract(&log(&body)), Err(IngestError::MissingField(_))));
    }

    #[test]
    fn test_negative_duration() {
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'><task_done success='1' nmsize='1' stamp='0.4'/></task>"
        );
        assert!(matches!(extract(&log(&body)), Err(IngestError::InvariantViolation(_))));
    }

    #[test]
    fn test_negative_native_size() {
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'><task_done success='1' nmsize='-1' stamp='0.6'/></task>"
        );
        let err = extract(&log(&body)).unwrap_err();
        assert!(matches!(err, IngestError::InvariantViolation(ref m) if m.contains("nmsize")));
    }

    #[test]
    fn test_negative_inlined_size() {
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'><task_done success='1' nmsize='4' inlined_bytes='-5' stamp='0.6'/></task>"
        );
        let err = extract(&log(&body)).unwrap_err();
        assert!(matches!(err, IngestError::InvariantViolation(ref m) if m.contains("inlined_bytes")));
    }

    #[test]
    fn test_free_code_cache_above_capacity() {
        // capacity is 240 MB for this run
        let body = format!(
            "{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'>\
             <task_done success='1' nmsize='10' stamp='0.75'/>\
             <code_cache total_blobs='1' nmethods='1' adapters='1' free_code_cache='300000000'/></task>"
        );
        assert!(matches!(extract(&log(&body)), Err(IngestError::InvariantViolation(_))));
    }

    #[test]
    fn test_second_args_in_one_log() {
        let body = format!("{THREAD}<vm_arguments><args>-Xmx1g</args></vm_arguments>");
        assert!(matches!(extract(&log(&body)), Err(IngestError::SequencingError(_))));
    }

    #[test]
    fn test_task_before_thread() {
        let body = "<task compile_id='1' method='a.B c ()V' stamp='0.5'><task_done success='1' nmsize='1' stamp='0.6'/></task>";
        assert!(matches!(extract(&log(body)), Err(IngestError::SequencingError(_))));
    }

    #[test]
    fn test_code_cache_before_args() {
        let xml = format!(
            "<hotspot_log time_ms='1'><compilation_log>{THREAD}<task compile_id='1' method='a.B c ()V' stamp='0.5'>\
             <task_done success='1' nmsize='1' stamp='0.6'/>\
             <code_cache total_blobs='1' nmethods='1' adapters='1' free_code_cache='1'/></task></compilation_log></hotspot_log>"
        );
        assert!(matches!(extract(&xml), Err(IngestError::SequencingError(_))));
    }

    #[test]
    fn test_missing_vm_start() {
        let xml = HEADER.replace(" time_ms='1700000000000'", "") + "</hotspot_log>";
        assert!(matches!(
            extract(&xml),
            Err(IngestError::MissingField(ref f)) if f.contains("time_ms")
        ));
    }

    #[test]
    fn test_log_without_args() {
        let xml = "<hotspot_log time_ms='1'><compilation_log/></hotspot_log>";
        assert!(matches!(extract(xml), Err(IngestError::MissingField(_))));
    }

    #[test]
    fn test_element_kind_dispatch() {
        assert_eq!(ElementKind::from_name("task"), Some(ElementKind::Task));
        assert_eq!(ElementKind::from_name("hotspot_log"), Some(ElementKind::VmStart));
        assert_eq!(ElementKind::from_name("task_queued"), None);
    }
}
