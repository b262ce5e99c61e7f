//! Durable run record
//!
//! One JSON file per run, named `readiness_report_<YYYYmmdd_HHMMSS>.json`,
//! holding the run metadata, every metric report verbatim and the verdict.
//! Writing it is a side effect only: a failure is reported to the caller
//! but the verdict stays valid.

use crate::analyzers::ReportSet;
use crate::error::{ReadinessError, ReadinessResult};
use crate::models::ExternalFacts;
use crate::scoring::ReadinessVerdict;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every record file name
pub const RECORD_PREFIX: &str = "readiness_report_";

/// Metadata about one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub tool: String,
    pub version: String,
    pub root: String,
    pub started_at: DateTime<Local>,
    pub generated_at: DateTime<Local>,
    pub duration_seconds: f64,
}

impl RunInfo {
    pub fn new(
        root: &Path,
        started_at: DateTime<Local>,
        generated_at: DateTime<Local>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            root: root.display().to_string(),
            started_at,
            generated_at,
            duration_seconds,
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_info: RunInfo,
    pub external_facts: ExternalFacts,
    /// Keyed by analyzer
    pub reports: ReportSet,
    pub verdict: ReadinessVerdict,
}

/// `readiness_report_<YYYYmmdd_HHMMSS>.json`
pub fn record_file_name(timestamp: &DateTime<Local>) -> String {
    format!("{}{}.json", RECORD_PREFIX, timestamp.format("%Y%m%d_%H%M%S"))
}

/// Write the record into `dir`, creating the directory if needed.
///
/// Never overwrites: a second run within the same second gets a numeric
/// suffix.
pub fn write_record(dir: &Path, record: &RunRecord) -> ReadinessResult<PathBuf> {
    let io_err = |path: &Path, source: io::Error| ReadinessError::Record {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    let json = serde_json::to_string_pretty(record).map_err(|e| io_err(dir, e.into()))?;

    let base = record_file_name(&record.run_info.started_at);
    let stem = base.trim_end_matches(".json");
    let mut attempt = 0;
    loop {
        let name = if attempt == 0 {
            base.clone()
        } else {
            format!("{}_{}.json", stem, attempt)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(json.as_bytes())
                    .map_err(|e| io_err(&path, e))?;
                debug!("Wrote run record to {}", path.display());
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < 100 => {
                attempt += 1;
            }
            Err(e) => return Err(io_err(&path, e)),
        }
    }
}
