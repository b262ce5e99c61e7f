//! Structure analyzer
//!
//! Pure fact collection: which key directories exist and how many source
//! units and lines each holds, and which critical files are present.

use super::{AnalysisContext, Analyzer, AnalyzerKind, MetricReport, Report};
use crate::models::{count_existing, FileFacts};
use crate::scanner::{probe, ReadMode};
use serde::{Deserialize, Serialize};

/// Facts about one key directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryInfo {
    pub name: String,
    pub exists: bool,
    pub file_count: usize,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureMetrics {
    /// Source units summed over existing key directories
    pub total_files: usize,
    pub total_lines: usize,
    pub directories: Vec<DirectoryInfo>,
    pub critical_files: Vec<FileFacts>,
}

impl StructureMetrics {
    pub fn critical_files_present(&self) -> usize {
        count_existing(&self.critical_files)
    }

    pub fn directories_present(&self) -> usize {
        self.directories.iter().filter(|d| d.exists).count()
    }
}

pub struct StructureAnalyzer;

impl Analyzer for StructureAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Structure
    }

    fn description(&self) -> &'static str {
        "Checks key directories and critical files"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> MetricReport {
        let structure = &ctx.config.structure;
        let scans = ctx.scanner.scan(
            &structure.key_directories,
            &ctx.config.sources.extension,
            ReadMode::CountLines,
        );

        let mut warnings = Vec::new();
        let directories: Vec<DirectoryInfo> = scans
            .iter()
            .map(|scan| {
                warnings.extend(scan.all_warnings());
                DirectoryInfo {
                    name: scan.name.clone(),
                    exists: scan.exists,
                    file_count: scan.files.len(),
                    line_count: scan.line_count(),
                }
            })
            .collect();

        let critical_files = structure
            .critical_files
            .iter()
            .map(|path| {
                let (facts, warning) = probe::file_facts(ctx.root, path, ctx.scanner.timeout());
                warnings.extend(warning);
                facts
            })
            .collect();

        let metrics = StructureMetrics {
            total_files: directories.iter().map(|d| d.file_count).sum(),
            total_lines: directories.iter().map(|d| d.line_count).sum(),
            directories,
            critical_files,
        };

        MetricReport::Structure(Report::new(AnalyzerKind::Structure, metrics, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadinessConfig;
    use crate::scanner::FileScanner;
    use std::fs;

    fn run(root: &std::path::Path, config: &ReadinessConfig) -> Report<StructureMetrics> {
        let scanner = FileScanner::new(root, &config.scan);
        let ctx = AnalysisContext::new(root, config, &scanner);
        match StructureAnalyzer.analyze(&ctx) {
            MetricReport::Structure(report) => report,
            other => panic!("unexpected report {:?}", other.kind()),
        }
    }

    #[test]
    fn test_empty_project_reports_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReadinessConfig::default();
        let report = run(dir.path(), &config);

        assert_eq!(report.metrics.directories.len(), 7);
        assert_eq!(report.metrics.critical_files.len(), 6);
        assert_eq!(report.metrics.total_files, 0);
        assert_eq!(report.metrics.total_lines, 0);
        assert_eq!(report.metrics.critical_files_present(), 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_counts_directories_and_critical_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/ui")).unwrap();
        fs::create_dir_all(dir.path().join("tests")).unwrap();
        fs::write(dir.path().join("src/main.py"), "import sys\n\nsys.exit(0)\n").unwrap();
        fs::write(dir.path().join("src/ui/window.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("tests/test_a.py"), "def test():\n    pass\n").unwrap();
        fs::write(dir.path().join("README.md"), "# Mail\n").unwrap();

        let config = ReadinessConfig::default();
        let report = run(dir.path(), &config);
        let m = &report.metrics;

        let src = &m.directories[0];
        assert_eq!(src.name, "src");
        assert!(src.exists);
        assert_eq!(src.file_count, 2);
        assert_eq!(src.line_count, 4);

        let tests = &m.directories[1];
        assert_eq!((tests.file_count, tests.line_count), (1, 2));
        assert!(!m.directories[2].exists);
        assert_eq!(m.directories_present(), 2);

        assert_eq!(m.total_files, 3);
        assert_eq!(m.total_lines, 6);

        // src/main.py and README.md
        assert_eq!(m.critical_files_present(), 2);
        let readme = m.critical_files.iter().find(|f| f.path == "README.md").unwrap();
        assert_eq!(readme.size_bytes, 7);
    }
}
