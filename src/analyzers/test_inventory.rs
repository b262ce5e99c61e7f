//! Test-inventory analyzer
//!
//! Finds test files anywhere in the project by name, sorts them into
//! categories and estimates coverage as a structural proxy:
//!
//! ```text
//! ratio    = round2(test_files / source_units)
//! coverage = min(ratio × 100, 100)
//! ```
//!
//! Both counts are taken over the whole tree. The estimate says nothing about
//! which code the tests actually exercise.

use super::{AnalysisContext, Analyzer, AnalyzerKind, MetricReport, Report};
use crate::config::TestConfig;
use crate::error::ReadinessResult;
use crate::models::{dedup_warnings, round_to};
use crate::scanner::ReadMode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFile {
    pub path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCategory {
    pub name: String,
    pub present: bool,
    pub files: Vec<TestFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMetrics {
    pub total_test_files: usize,
    pub source_units: usize,
    /// Declared categories in precedence order, then `other`
    pub categories: Vec<TestCategory>,
    /// Categories that count toward the test-coverage dimension
    pub scored_categories: Vec<String>,
    /// Two decimals; 0 when there are no source units
    pub test_to_source_ratio: f64,
    /// Percentage capped at 100
    pub estimated_coverage: f64,
}

impl TestMetrics {
    pub fn category(&self, name: &str) -> Option<&TestCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.category(name).is_some_and(|c| c.present)
    }

    pub fn scored_present(&self) -> usize {
        self.scored_categories
            .iter()
            .filter(|name| self.is_present(name))
            .count()
    }
}

pub struct TestInventoryAnalyzer {
    patterns: Vec<Regex>,
}

impl TestInventoryAnalyzer {
    pub fn new(config: &TestConfig) -> ReadinessResult<Self> {
        Ok(Self {
            patterns: config.compiled_patterns()?,
        })
    }

    pub fn is_test_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.patterns.iter().any(|p| p.is_match(name)))
    }
}

impl Analyzer for TestInventoryAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Tests
    }

    fn description(&self) -> &'static str {
        "Classifies test files and estimates coverage"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> MetricReport {
        let tests = &ctx.config.tests;

        let test_scan = ctx
            .scanner
            .scan_matching(".", ReadMode::MetadataOnly, |path| self.is_test_file(path));
        let source_scan =
            ctx.scanner
                .scan_dir(".", &ctx.config.sources.extension, ReadMode::MetadataOnly);

        let mut warnings = test_scan.all_warnings();
        warnings.extend(source_scan.all_warnings());
        // Both scans walk the whole tree, so walk errors show up twice
        dedup_warnings(&mut warnings);

        let mut categories: Vec<TestCategory> = tests
            .category_names()
            .into_iter()
            .map(|name| TestCategory {
                name: name.to_string(),
                present: false,
                files: Vec::new(),
            })
            .collect();

        for record in test_scan.records() {
            let file_name = record.path.rsplit('/').next().unwrap_or(&record.path);
            let category = tests.categorize(file_name);
            if let Some(slot) = categories.iter_mut().find(|c| c.name == category) {
                slot.present = true;
                slot.files.push(TestFile {
                    path: record.path.clone(),
                    size_bytes: record.size_bytes,
                });
            }
        }

        let total_test_files = test_scan.files.len();
        let source_units = source_scan.files.len();
        let test_to_source_ratio = if source_units > 0 {
            round_to(total_test_files as f64 / source_units as f64, 2)
        } else {
            0.0
        };

        let metrics = TestMetrics {
            total_test_files,
            source_units,
            categories,
            scored_categories: tests.scored_categories.clone(),
            test_to_source_ratio,
            estimated_coverage: round_to((test_to_source_ratio * 100.0).min(100.0), 1),
        };

        MetricReport::Tests(Report::new(AnalyzerKind::Tests, metrics, warnings))
    }
}
