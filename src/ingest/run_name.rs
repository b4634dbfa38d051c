//! Run identity: a short, disambiguated label and the code cache capacity.
//!
//! Labels look like `21.b509 cc2 tc rcs240 (0)`: the shortened VM version,
//! compiler count, tiered compilation marker, reserved code cache size in MB
//! and an occurrence index that separates runs with identical flags.

use crate::utils::config::{BYTES_PER_MB, NON_TIERED_CODE_CACHE_MB, TIERED_CODE_CACHE_MB};
use crate::utils::error::IngestError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})[^b]+(b[^.]+).*$").expect("version pattern"));
static COMPILER_COUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-XX:CICompilerCount=(\d+)").expect("compiler count pattern"));
static TIERED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-XX:([-+])TieredCompilation").expect("tiered pattern"));
static CODE_CACHE_SIZE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-XX:ReservedCodeCacheSize=(\d+)m").expect("code cache pattern"));

/// Occurrence counter per base run name
///
/// Lives for one ingestion session, so repeated runs with identical flags
/// get increasing indices and a new session starts again from zero.
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    counts: HashMap<String, u32>,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index for `base`, then advance it
    fn next_index(&mut self, base: &str) -> u32 {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        let index = *count;
        *count += 1;
        index
    }

    /// Number of distinct base names seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Resolved display name and capacity of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentity {
    pub name: String,
    /// Maximum code cache size in bytes
    pub max_code_cache_size: u64,
}

/// Derive the run label and code cache capacity from VM flags
///
/// **Public** - called by the extractor when the `args` element is reached
///
/// # Arguments
/// * `args` - verbatim VM argument string
/// * `version` - trimmed VM release string, e.g. `21.0.1+12-b509.1`
/// * `tally` - session-wide occurrence counter
///
/// # Errors
/// * `IngestError::MissingField` - the version does not have the expected shape
/// * `IngestError::MalformedInput` - a size flag does not fit in 64 bits
pub fn resolve_run_identity(
    args: &str,
    version: &str,
    tally: &mut RunTally,
) -> Result<RunIdentity, IngestError> {
    let parsed = VERSION_PATTERN.captures(version).ok_or_else(|| {
        IngestError::MissingField(format!(
            "VM release '{version}' has no major version and build number"
        ))
    })?;

    // shorten the version to keep labels compact
    let mut name = format!("{}.{}", &parsed[1], &parsed[2]);

    if let Some(count) = COMPILER_COUNT_PATTERN.captures(args) {
        name.push_str(" cc");
        name.push_str(&count[1]);
    }

    let tiered = TIERED_PATTERN
        .captures(args)
        .map_or(true, |toggle| &toggle[1] == "+");
    if tiered {
        name.push_str(" tc");
    }

    let size_mb = match CODE_CACHE_SIZE_PATTERN.captures(args) {
        Some(size) => size[1].parse::<u64>().map_err(|e| {
            IngestError::MalformedInput(format!("ReservedCodeCacheSize '{}': {e}", &size[1]))
        })?,
        None if tiered => TIERED_CODE_CACHE_MB,
        None => NON_TIERED_CODE_CACHE_MB,
    };
    let max_code_cache_size = size_mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
        IngestError::MalformedInput(format!("ReservedCodeCacheSize {size_mb}m overflows"))
    })?;
    name.push_str(&format!(" rcs{size_mb}"));

    let index = tally.next_index(&name);
    name.push_str(&format!(" ({index})"));

    Ok(RunIdentity {
        name,
        max_code_cache_size,
    })
}
