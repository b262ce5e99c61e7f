//! Readiness pipeline
//!
//! Orchestrates a full run:
//! 1. Check the project root (the only fatal precondition)
//! 2. Run the five analyzers concurrently and join their reports
//! 3. Score the reports into a verdict
//! 4. Persist the durable run record (failure does not void the verdict)

use anyhow::Result;
use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::analyzers::{AnalysisContext, AnalyzerEngine, ProgressCallback};
use crate::cache;
use crate::config::ReadinessConfig;
use crate::error::{ReadinessError, ReadinessResult};
use crate::models::ExternalFacts;
use crate::reporters::{write_record, RunInfo, RunRecord};
use crate::scanner::probe::{self, ProbeError};
use crate::scanner::FileScanner;
use crate::scoring::ReadinessScorer;

/// Default number of analyzer worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// Where the durable record goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// Per-project cache directory
    Default,
    Dir(PathBuf),
    Disabled,
}

/// Full readiness pipeline.
pub struct Pipeline {
    config: ReadinessConfig,
    workers: usize,
    external_facts: ExternalFacts,
    record: RecordTarget,
    progress_callback: Option<ProgressCallback>,
}

impl Pipeline {
    /// Create a pipeline for the given configuration.
    pub fn new(config: ReadinessConfig) -> Self {
        Self {
            config,
            workers: DEFAULT_WORKERS,
            external_facts: ExternalFacts::default(),
            record: RecordTarget::Default,
            progress_callback: None,
        }
    }

    /// Set the number of analyzer worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Attach outcomes of the packaging tool, installer compiler and install probe.
    pub fn with_external_facts(mut self, facts: ExternalFacts) -> Self {
        self.external_facts = facts;
        self
    }

    /// Write the run record into `dir` instead of the cache directory.
    pub fn with_record_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.record = RecordTarget::Dir(dir.into());
        self
    }

    /// Do not persist a run record.
    pub fn without_record(mut self) -> Self {
        self.record = RecordTarget::Disabled;
        self
    }

    /// Report analyzer completion.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Run the full pipeline against `root`.
    ///
    /// Fails only when the root is unusable or the configuration is invalid;
    /// every other problem ends up as a warning inside the record.
    pub fn run(self, root: &Path) -> Result<RunOutcome> {
        let started_at = Local::now();
        let start = Instant::now();

        self.config.validate()?;
        let root = check_root(root, self.config.scan.read_timeout())?;
        info!("Analyzing {}", root.display());

        let scanner = FileScanner::new(&root, &self.config.scan);
        let ctx = AnalysisContext::new(&root, &self.config, &scanner);

        let mut engine = AnalyzerEngine::with_default_analyzers(self.workers, &self.config)?;
        if let Some(callback) = self.progress_callback {
            engine = engine.with_progress_callback(callback);
        }
        let reports = engine.run(&ctx)?;

        let verdict = ReadinessScorer::new(&reports).calculate();
        info!(
            "Verdict: {:.1}/100 ({}), {} recommendations",
            verdict.overall_score,
            verdict.tier,
            verdict.recommendations.len()
        );

        let record = RunRecord {
            run_info: RunInfo::new(
                &root,
                started_at,
                Local::now(),
                start.elapsed().as_secs_f64(),
            ),
            external_facts: self.external_facts,
            reports,
            verdict,
        };

        let record_dir = match self.record {
            RecordTarget::Default => Some(cache::get_records_dir(&root)),
            RecordTarget::Dir(dir) => Some(dir),
            RecordTarget::Disabled => None,
        };

        let mut outcome = RunOutcome {
            record,
            record_path: None,
            record_error: None,
        };
        if let Some(dir) = record_dir {
            match write_record(&dir, &outcome.record) {
                Ok(path) => {
                    debug!("Run record saved to {}", path.display());
                    outcome.record_path = Some(path);
                }
                Err(e) => {
                    warn!("{}", e);
                    outcome.record_error = Some(e.to_string());
                }
            }
        }

        Ok(outcome)
    }
}

/// Result of a completed run
#[derive(Debug)]
pub struct RunOutcome {
    pub record: RunRecord,
    /// Where the durable record was written
    pub record_path: Option<PathBuf>,
    /// Why the durable record could not be written
    pub record_error: Option<String>,
}

/// Verify that `root` is an accessible directory and canonicalize it.
pub fn check_root(root: &Path, timeout: std::time::Duration) -> ReadinessResult<PathBuf> {
    let meta = probe::metadata(root, timeout).map_err(|e| match e {
        ProbeError::NotFound => ReadinessError::RootNotFound(root.to_path_buf()),
        ProbeError::Io(source) => ReadinessError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        },
        other => ReadinessError::RootUnreadable {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::TimedOut, other.to_string()),
        },
    })?;

    if !meta.is_dir() {
        return Err(ReadinessError::RootNotDirectory(root.to_path_buf()));
    }

    std::fs::read_dir(root).map_err(|source| ReadinessError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    root.canonicalize()
        .map_err(|source| ReadinessError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_check_root_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_root(&dir.path().join("nope"), TIMEOUT).unwrap_err();
        assert!(matches!(err, ReadinessError::RootNotFound(_)));
    }

    #[test]
    fn test_check_root_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("README.md");
        std::fs::write(&file, "# x\n").unwrap();
        let err = check_root(&file, TIMEOUT).unwrap_err();
        assert!(matches!(err, ReadinessError::RootNotDirectory(_)));
    }

    #[test]
    fn test_run_without_record() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = Pipeline::new(ReadinessConfig::default())
            .with_workers(2)
            .without_record()
            .run(dir.path())
            .unwrap();
        assert!(outcome.record_path.is_none());
        assert!(outcome.record_error.is_none());
        assert_eq!(outcome.record.verdict.dimensions.len(), 6);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ReadinessConfig::default();
        config.version = 9;
        let err = Pipeline::new(config).without_record().run(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReadinessError>(),
            Some(ReadinessError::Config(_))
        ));
    }

    #[test]
    fn test_record_failure_keeps_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not dir").unwrap();

        let outcome = Pipeline::new(ReadinessConfig::default())
            .with_record_dir(blocker.join("reports"))
            .run(dir.path())
            .unwrap();
        assert!(outcome.record_path.is_none());
        assert!(outcome.record_error.is_some());
        assert_eq!(outcome.record.verdict.dimensions.len(), 6);
    }
}
