//! Source analyzer
//!
//! Parses every source unit into a [`SymbolModel`] and aggregates definition
//! counts, docstring coverage, the import tally and size statistics.
//!
//! A unit that cannot be read or parsed still counts as a unit: it adds its
//! lines (if readable) but no definitions or imports, and leaves a warning.

use super::{AnalysisContext, Analyzer, AnalyzerKind, MetricReport, Report};
use crate::error::ParseError;
use crate::models::{
    dedup_warnings, round_to, AnalysisWarning, DefinitionKind, ImportCount, SymbolModel,
    WarningKind,
};
use crate::parsers;
use crate::scanner::{ReadMode, ScannedFile};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// A unit above the large-file threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFile {
    pub path: String,
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetrics {
    pub total_units: usize,
    pub total_lines: usize,
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_definitions: usize,
    pub documented_definitions: usize,
    /// Percentage, one decimal; 0 when there are no definitions
    pub docstring_coverage: f64,
    /// Lines per unit, one decimal; 0 when there are no units
    pub average_file_size: f64,
    pub large_file_threshold: usize,
    /// Sorted by path
    pub large_files: Vec<LargeFile>,
    /// Descending count, ties in first-seen order
    pub top_imports: Vec<ImportCount>,
    pub parse_failures: usize,
}

pub struct SourceAnalyzer;

impl Analyzer for SourceAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Source
    }

    fn description(&self) -> &'static str {
        "Parses source units for definitions, docstrings and imports"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> MetricReport {
        let sources = &ctx.config.sources;
        let scans = ctx
            .scanner
            .scan(&sources.roots, &sources.extension, ReadMode::KeepText);

        let mut warnings = Vec::new();
        // Overlapping roots must not count a unit twice
        let mut units: BTreeMap<String, ScannedFile> = BTreeMap::new();
        for scan in scans {
            warnings.extend(scan.warnings);
            for file in scan.files {
                units.entry(file.record.path.clone()).or_insert(file);
            }
        }
        warnings.extend(units.values().filter_map(|u| u.record.warning.clone()));
        dedup_warnings(&mut warnings);

        let units: Vec<ScannedFile> = units.into_values().collect();
        let parsed: Vec<Option<Result<SymbolModel, ParseError>>> = units
            .par_iter()
            .map(|unit| {
                unit.text
                    .as_deref()
                    .map(|text| parsers::parse_unit(&sources.extension, text))
            })
            .collect();

        let mut merged = SymbolModel::new();
        let mut parse_failures = 0;
        for (unit, result) in units.iter().zip(parsed) {
            match result {
                Some(Ok(model)) => merge_into(&mut merged, model),
                Some(Err(e)) => {
                    warn!("Failed to parse {}: {}", unit.record.path, e);
                    parse_failures += 1;
                    warnings.push(AnalysisWarning::for_path(
                        WarningKind::Syntax,
                        &unit.record.path,
                        e.to_string(),
                    ));
                }
                // Unreadable: warning already attached by the scanner
                None => {}
            }
        }

        let total_units = units.len();
        let total_lines: usize = units.iter().map(|u| u.record.line_count).sum();
        let total_definitions = merged.definitions.len();
        let documented_definitions = merged.documented_count();

        let docstring_coverage = if total_definitions > 0 {
            round_to(documented_definitions as f64 / total_definitions as f64 * 100.0, 1)
        } else {
            0.0
        };
        let average_file_size = if total_units > 0 {
            round_to(total_lines as f64 / total_units as f64, 1)
        } else {
            0.0
        };

        let large_files = units
            .iter()
            .filter(|u| u.record.line_count > sources.large_file_threshold)
            .map(|u| LargeFile {
                path: u.record.path.clone(),
                lines: u.record.line_count,
            })
            .collect();

        let metrics = SourceMetrics {
            total_units,
            total_lines,
            total_functions: merged.count(DefinitionKind::Function),
            total_classes: merged.count(DefinitionKind::Class),
            total_definitions,
            documented_definitions,
            docstring_coverage,
            average_file_size,
            large_file_threshold: sources.large_file_threshold,
            large_files,
            top_imports: top_imports(merged.imports, sources.top_imports),
            parse_failures,
        };

        MetricReport::Source(Report::new(AnalyzerKind::Source, metrics, warnings))
    }
}

fn merge_into(total: &mut SymbolModel, unit: SymbolModel) {
    total.definitions.extend(unit.definitions);
    for import in unit.imports {
        match total.imports.iter_mut().find(|i| i.module == import.module) {
            Some(existing) => existing.count += import.count,
            None => total.imports.push(import),
        }
    }
}

/// Keep the `limit` most frequent imports.
///
/// `tally` must be in first-seen order; the stable sort keeps that order
/// among equal counts.
pub fn top_imports(mut tally: Vec<ImportCount>, limit: usize) -> Vec<ImportCount> {
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(limit);
    tally
}
