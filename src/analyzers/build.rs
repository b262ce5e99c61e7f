//! Build-artifact analyzer
//!
//! Presence and size of packaging outputs, the packaging spec, the installer
//! script, build and test automation scripts, and the files that ship next
//! to the executable. No scoring happens here.

use super::{AnalysisContext, Analyzer, AnalyzerKind, MetricReport, Report};
use crate::models::{count_existing, AnalysisWarning, FileFacts};
use crate::scanner::probe::{self, ProbeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A packaged executable found in the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executable {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildMetrics {
    pub output_dir: String,
    pub output_dir_exists: bool,
    /// Sorted by name
    pub executables: Vec<Executable>,
    pub packaging_spec: FileFacts,
    pub installer_script: FileFacts,
    pub build_scripts: Vec<FileFacts>,
    pub test_scripts: Vec<FileFacts>,
    pub distribution_files: Vec<FileFacts>,
}

impl BuildMetrics {
    /// Packaging spec, build scripts, then the installer script
    pub fn required_build_files(&self) -> impl Iterator<Item = &FileFacts> {
        std::iter::once(&self.packaging_spec)
            .chain(&self.build_scripts)
            .chain(std::iter::once(&self.installer_script))
    }

    pub fn build_files_present(&self) -> usize {
        count_existing(self.required_build_files())
    }

    pub fn build_files_total(&self) -> usize {
        self.required_build_files().count()
    }

    pub fn distribution_files_present(&self) -> usize {
        count_existing(&self.distribution_files)
    }

    pub fn has_executable(&self) -> bool {
        !self.executables.is_empty()
    }
}

pub struct BuildAnalyzer;

impl Analyzer for BuildAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Build
    }

    fn description(&self) -> &'static str {
        "Checks packaging outputs and build scripts"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> MetricReport {
        let build = &ctx.config.build;
        let timeout = ctx.scanner.timeout();
        let mut warnings = Vec::new();

        let mut facts = |path: &str| {
            let (facts, warning) = probe::file_facts(ctx.root, path, timeout);
            warnings.extend(warning);
            facts
        };

        let packaging_spec = facts(build.packaging_spec.as_str());
        let installer_script = facts(build.installer_script.as_str());
        let build_scripts = build.build_scripts.iter().map(|p| facts(p.as_str())).collect();
        let test_scripts = build.test_scripts.iter().map(|p| facts(p.as_str())).collect();
        let distribution_files = build.distribution_files.iter().map(|p| facts(p.as_str())).collect();

        let (output_dir_exists, executables) =
            find_executables(ctx.root, &build.output_dir, timeout, &mut warnings);

        let metrics = BuildMetrics {
            output_dir: build.output_dir.clone(),
            output_dir_exists,
            executables,
            packaging_spec,
            installer_script,
            build_scripts,
            test_scripts,
            distribution_files,
        };

        MetricReport::Build(Report::new(AnalyzerKind::Build, metrics, warnings))
    }
}

/// Regular files directly inside the output directory
fn find_executables(
    root: &Path,
    output_dir: &str,
    timeout: Duration,
    warnings: &mut Vec<AnalysisWarning>,
) -> (bool, Vec<Executable>) {
    match probe::list_files(&root.join(output_dir), timeout) {
        Ok(files) => {
            let executables = files
                .into_iter()
                .map(|(name, size_bytes)| Executable {
                    path: format!("{}/{}", output_dir.trim_end_matches('/'), name),
                    name,
                    size_bytes,
                })
                .collect();
            (true, executables)
        }
        Err(ProbeError::NotFound) => (false, Vec::new()),
        Err(e) => {
            warnings.extend(e.to_warning(output_dir));
            (false, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadinessConfig;
    use crate::scanner::FileScanner;
    use std::fs;

    fn run(root: &Path) -> Report<BuildMetrics> {
        let config = ReadinessConfig::default();
        let scanner = FileScanner::new(root, &config.scan);
        let ctx = AnalysisContext::new(root, &config, &scanner);
        match BuildAnalyzer.analyze(&ctx) {
            MetricReport::Build(report) => report,
            other => panic!("unexpected report {:?}", other.kind()),
        }
    }

    #[test]
    fn test_nothing_built() {
        let dir = tempfile::tempdir().unwrap();
        let report = run(dir.path());
        let m = &report.metrics;

        assert!(!m.output_dir_exists);
        assert!(!m.has_executable());
        assert_eq!(m.build_files_total(), 5);
        assert_eq!(m.build_files_present(), 0);
        assert_eq!(m.test_scripts.len(), 3);
        assert_eq!(m.distribution_files_present(), 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_build_outputs_and_scripts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dist/MailApp")).unwrap();
        fs::create_dir_all(dir.path().join("installer")).unwrap();
        fs::write(dir.path().join("dist/MailApp.exe"), vec![0u8; 1024]).unwrap();
        fs::write(dir.path().join("dist/MailApp/internal.dll"), "x").unwrap();
        fs::write(dir.path().join("app.spec"), "a = Analysis()\n").unwrap();
        fs::write(dir.path().join("build_exe.py"), "print('build')\n").unwrap();
        fs::write(dir.path().join("installer/installer.iss"), "[Setup]\n").unwrap();
        fs::write(dir.path().join("README.md"), "# Mail\n").unwrap();

        let report = run(dir.path());
        let m = &report.metrics;

        assert!(m.output_dir_exists);
        assert_eq!(
            m.executables,
            vec![Executable {
                name: "MailApp.exe".into(),
                path: "dist/MailApp.exe".into(),
                size_bytes: 1024,
            }]
        );
        assert_eq!(m.build_files_present(), 3);
        let order: Vec<&str> = m.required_build_files().map(|f| f.path.as_str()).collect();
        assert_eq!(order[0], "app.spec");
        assert_eq!(order[4], "installer/installer.iss");
        assert_eq!(m.distribution_files_present(), 1);
    }
}
