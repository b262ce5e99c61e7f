//! Analyzers and the engine that runs them
//!
//! Each analyzer inspects one facet of the project and returns an immutable
//! metric report. Analyzers never see each other's output, so the engine can
//! run all of them concurrently:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     AnalyzerEngine                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  1. Register analyzers                                   │
//! │  2. Run all of them on a rayon pool                      │
//! │  3. Join: wait for every report                          │
//! │  4. Assemble the ReportSet consumed by scoring           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Recoverable problems (unreadable files, malformed source units) are
//! attached to the report as warnings and never escape an analyzer.

pub mod build;
pub mod documentation;
pub mod source;
pub mod structure;
pub mod test_inventory;

pub use build::{BuildAnalyzer, BuildMetrics, Executable};
pub use documentation::{
    completeness_score, DocumentInfo, DocumentationAnalyzer, DocumentationMetrics, NoteCount,
};
pub use source::{top_imports, LargeFile, SourceAnalyzer, SourceMetrics};
pub use structure::{DirectoryInfo, StructureAnalyzer, StructureMetrics};
pub use test_inventory::{TestCategory, TestFile, TestInventoryAnalyzer, TestMetrics};

use crate::config::ReadinessConfig;
use crate::error::{ReadinessError, ReadinessResult};
use crate::models::AnalysisWarning;
use crate::scanner::FileScanner;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Progress callback: (analyzer name, completed, total)
pub type ProgressCallback = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Identity of an analyzer, also the key of its report in the run record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    Structure,
    Source,
    Documentation,
    Build,
    Tests,
}

impl AnalyzerKind {
    pub const ALL: [AnalyzerKind; 5] = [
        AnalyzerKind::Structure,
        AnalyzerKind::Source,
        AnalyzerKind::Documentation,
        AnalyzerKind::Build,
        AnalyzerKind::Tests,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerKind::Structure => "structure",
            AnalyzerKind::Source => "source",
            AnalyzerKind::Documentation => "documentation",
            AnalyzerKind::Build => "build",
            AnalyzerKind::Tests => "tests",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only inputs shared by every analyzer in a run
pub struct AnalysisContext<'a> {
    pub root: &'a Path,
    pub config: &'a ReadinessConfig,
    pub scanner: &'a FileScanner,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(root: &'a Path, config: &'a ReadinessConfig, scanner: &'a FileScanner) -> Self {
        Self {
            root,
            config,
            scanner,
        }
    }
}

/// Trait for all analyzers
///
/// An analyzer must be a pure function of the project tree and the
/// configuration: running it twice on an unchanged tree yields an equal
/// report.
pub trait Analyzer: Send + Sync {
    /// Which report this analyzer produces
    fn kind(&self) -> AnalyzerKind;

    /// Human-readable description of what this analyzer measures
    fn description(&self) -> &'static str;

    /// Collect the metrics for this facet
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> MetricReport;
}

/// Metrics of one analyzer plus the warnings collected while producing them
///
/// `metrics` is a typed struct, so every declared metric is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<M> {
    pub analyzer: AnalyzerKind,
    pub metrics: M,
    pub warnings: Vec<AnalysisWarning>,
}

impl<M> Report<M> {
    pub fn new(analyzer: AnalyzerKind, metrics: M, warnings: Vec<AnalysisWarning>) -> Self {
        Self {
            analyzer,
            metrics,
            warnings,
        }
    }
}

/// A report produced by any analyzer
#[derive(Debug, Clone, PartialEq)]
pub enum MetricReport {
    Structure(Report<StructureMetrics>),
    Source(Report<SourceMetrics>),
    Documentation(Report<DocumentationMetrics>),
    Build(Report<BuildMetrics>),
    Tests(Report<TestMetrics>),
}

impl MetricReport {
    pub fn kind(&self) -> AnalyzerKind {
        match self {
            MetricReport::Structure(_) => AnalyzerKind::Structure,
            MetricReport::Source(_) => AnalyzerKind::Source,
            MetricReport::Documentation(_) => AnalyzerKind::Documentation,
            MetricReport::Build(_) => AnalyzerKind::Build,
            MetricReport::Tests(_) => AnalyzerKind::Tests,
        }
    }

    pub fn warnings(&self) -> &[AnalysisWarning] {
        match self {
            MetricReport::Structure(r) => &r.warnings,
            MetricReport::Source(r) => &r.warnings,
            MetricReport::Documentation(r) => &r.warnings,
            MetricReport::Build(r) => &r.warnings,
            MetricReport::Tests(r) => &r.warnings,
        }
    }
}

/// All five reports of a run, available only after the join barrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSet {
    pub structure: Report<StructureMetrics>,
    pub source: Report<SourceMetrics>,
    pub documentation: Report<DocumentationMetrics>,
    pub build: Report<BuildMetrics>,
    pub tests: Report<TestMetrics>,
}

impl ReportSet {
    /// Assemble from individual reports; every analyzer must be represented
    pub fn from_reports(reports: Vec<MetricReport>) -> ReadinessResult<Self> {
        let mut structure = None;
        let mut source = None;
        let mut documentation = None;
        let mut build = None;
        let mut tests = None;

        for report in reports {
            match report {
                MetricReport::Structure(r) => structure = Some(r),
                MetricReport::Source(r) => source = Some(r),
                MetricReport::Documentation(r) => documentation = Some(r),
                MetricReport::Build(r) => build = Some(r),
                MetricReport::Tests(r) => tests = Some(r),
            }
        }

        Ok(Self {
            structure: structure.ok_or(ReadinessError::MissingReport("structure"))?,
            source: source.ok_or(ReadinessError::MissingReport("source"))?,
            documentation: documentation.ok_or(ReadinessError::MissingReport("documentation"))?,
            build: build.ok_or(ReadinessError::MissingReport("build"))?,
            tests: tests.ok_or(ReadinessError::MissingReport("tests"))?,
        })
    }

    /// Every warning of every report, in analyzer order
    pub fn warnings(&self) -> impl Iterator<Item = &AnalysisWarning> {
        self.structure
            .warnings
            .iter()
            .chain(&self.source.warnings)
            .chain(&self.documentation.warnings)
            .chain(&self.build.warnings)
            .chain(&self.tests.warnings)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

/// Runs registered analyzers concurrently and joins their reports
pub struct AnalyzerEngine {
    analyzers: Vec<Arc<dyn Analyzer>>,
    /// Number of worker threads for parallel execution
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl AnalyzerEngine {
    /// Create an empty engine
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers
        };

        Self {
            analyzers: Vec::new(),
            workers: actual_workers,
            progress_callback: None,
        }
    }

    /// Engine with the five standard analyzers registered
    pub fn with_default_analyzers(workers: usize, config: &ReadinessConfig) -> ReadinessResult<Self> {
        let mut engine = Self::new(workers);
        engine.register(Arc::new(StructureAnalyzer));
        engine.register(Arc::new(SourceAnalyzer));
        engine.register(Arc::new(DocumentationAnalyzer));
        engine.register(Arc::new(BuildAnalyzer));
        engine.register(Arc::new(TestInventoryAnalyzer::new(&config.tests)?));
        Ok(engine)
    }

    /// Set a progress callback
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) {
        debug!("Registered analyzer: {}", analyzer.kind());
        self.analyzers.push(analyzer);
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn analyzer_count(&self) -> usize {
        self.analyzers.len()
    }

    /// Run every analyzer and wait for all of them
    pub fn run(&self, ctx: &AnalysisContext<'_>) -> anyhow::Result<ReportSet> {
        let start = Instant::now();
        info!(
            "Starting analysis with {} analyzers on {} workers",
            self.analyzers.len(),
            self.workers
        );

        let completed = AtomicUsize::new(0);
        let total = self.analyzers.len();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let reports: Vec<MetricReport> = pool.install(|| {
            self.analyzers
                .par_iter()
                .map(|analyzer| {
                    let analyzer_start = Instant::now();
                    let report = analyzer.analyze(ctx);
                    debug!(
                        "Analyzer {} finished in {:?} with {} warnings",
                        analyzer.kind(),
                        analyzer_start.elapsed(),
                        report.warnings().len()
                    );

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(analyzer.kind().name(), done, total);
                    }

                    report
                })
                .collect()
        });

        let set = ReportSet::from_reports(reports)?;
        info!(
            "Analysis complete in {:?}: {} warnings",
            start.elapsed(),
            set.warning_count()
        );
        Ok(set)
    }
}

impl Default for AnalyzerEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn empty_project() -> (tempfile::TempDir, ReadinessConfig) {
        (tempfile::tempdir().unwrap(), ReadinessConfig::default())
    }

    #[test]
    fn test_missing_report_is_an_error() {
        let (dir, config) = empty_project();
        let scanner = FileScanner::new(dir.path(), &config.scan);
        let ctx = AnalysisContext::new(dir.path(), &config, &scanner);

        let reports = vec![StructureAnalyzer.analyze(&ctx), SourceAnalyzer.analyze(&ctx)];
        let err = ReportSet::from_reports(reports).unwrap_err();
        assert!(matches!(err, ReadinessError::MissingReport("documentation")));
    }

    #[test]
    fn test_engine_runs_all_analyzers_and_reports_progress() {
        let (dir, config) = empty_project();
        let scanner = FileScanner::new(dir.path(), &config.scan);
        let ctx = AnalysisContext::new(dir.path(), &config, &scanner);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);
        let engine = AnalyzerEngine::with_default_analyzers(2, &config)
            .unwrap()
            .with_progress_callback(Box::new(move |name, done, total| {
                seen_cb.lock().unwrap().push((name.to_string(), done, total));
            }));
        assert_eq!(engine.analyzer_count(), 5);
        assert_eq!(engine.workers(), 2);

        let set = engine.run(&ctx).unwrap();
        assert_eq!(set.structure.analyzer, AnalyzerKind::Structure);
        assert_eq!(set.tests.analyzer, AnalyzerKind::Tests);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        let mut dones: Vec<usize> = seen.iter().map(|(_, done, _)| *done).collect();
        dones.sort();
        assert_eq!(dones, vec![1, 2, 3, 4, 5]);
        assert!(seen.iter().all(|(_, _, total)| *total == 5));
    }

    #[test]
    fn test_report_set_serializes_keyed_by_analyzer() {
        let (dir, config) = empty_project();
        let scanner = FileScanner::new(dir.path(), &config.scan);
        let ctx = AnalysisContext::new(dir.path(), &config, &scanner);
        let set = AnalyzerEngine::with_default_analyzers(1, &config)
            .unwrap()
            .run(&ctx)
            .unwrap();

        let value = serde_json::to_value(&set).unwrap();
        for kind in AnalyzerKind::ALL {
            assert_eq!(value[kind.name()]["analyzer"], kind.name());
        }
    }
}
