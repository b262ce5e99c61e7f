//! Documentation analyzer
//!
//! Records presence and size of the configured documents and computes the
//! completeness score:
//!
//! ```text
//! completeness = min(100, required_present / required_total × 100
//!                       + optional_present / optional_total × 50)
//! ```
//!
//! Required documents weigh twice as much as optional ones. A term over an
//! empty document list contributes 0.

use super::{AnalysisContext, Analyzer, AnalyzerKind, MetricReport, Report};
use crate::config::DocumentSpec;
use crate::models::{round_to, AnalysisWarning};
use crate::scanner::{probe, ReadMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Facts about one configured document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,
    pub path: String,
    pub required: bool,
    pub exists: bool,
    pub size_bytes: u64,
    pub lines: usize,
    pub char_count: usize,
}

/// Markdown notes found in one note directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCount {
    pub name: String,
    pub path: String,
    pub exists: bool,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationMetrics {
    /// Required documents first, then optional, each in configured order
    pub documents: Vec<DocumentInfo>,
    pub required_present: usize,
    pub required_total: usize,
    pub optional_present: usize,
    pub optional_total: usize,
    /// 0–100, one decimal
    pub completeness_score: f64,
    pub total_size_bytes: u64,
    pub notes: Vec<NoteCount>,
}

pub struct DocumentationAnalyzer;

impl Analyzer for DocumentationAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Documentation
    }

    fn description(&self) -> &'static str {
        "Checks required and optional documents"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> MetricReport {
        let docs = &ctx.config.documentation;
        let timeout = ctx.scanner.timeout();
        let mut warnings = Vec::new();

        let mut documents = Vec::with_capacity(docs.required.len() + docs.optional.len());
        for spec in &docs.required {
            documents.push(inspect_document(ctx.root, spec, true, timeout, &mut warnings));
        }
        for spec in &docs.optional {
            documents.push(inspect_document(ctx.root, spec, false, timeout, &mut warnings));
        }

        let notes = docs
            .notes
            .iter()
            .map(|note| {
                let scan = ctx.scanner.scan_dir(&note.path, "md", ReadMode::MetadataOnly);
                warnings.extend(scan.all_warnings());
                NoteCount {
                    name: note.name.clone(),
                    path: note.path.clone(),
                    exists: scan.exists,
                    count: scan.files.len(),
                }
            })
            .collect();

        let present = |required: bool| {
            documents
                .iter()
                .filter(|d| d.required == required && d.exists)
                .count()
        };
        let required_present = present(true);
        let optional_present = present(false);

        let metrics = DocumentationMetrics {
            required_present,
            required_total: docs.required.len(),
            optional_present,
            optional_total: docs.optional.len(),
            completeness_score: completeness_score(
                required_present,
                docs.required.len(),
                optional_present,
                docs.optional.len(),
            ),
            total_size_bytes: documents.iter().map(|d| d.size_bytes).sum(),
            documents,
            notes,
        };

        MetricReport::Documentation(Report::new(AnalyzerKind::Documentation, metrics, warnings))
    }
}

fn inspect_document(
    root: &Path,
    spec: &DocumentSpec,
    required: bool,
    timeout: Duration,
    warnings: &mut Vec<AnalysisWarning>,
) -> DocumentInfo {
    let (facts, warning) = probe::file_facts(root, &spec.path, timeout);
    warnings.extend(warning);

    let mut info = DocumentInfo {
        name: spec.name.clone(),
        path: spec.path.clone(),
        required,
        exists: facts.exists,
        size_bytes: facts.size_bytes,
        lines: 0,
        char_count: 0,
    };

    if facts.exists {
        // Documents are prose: tolerate stray bytes rather than dropping the count
        match probe::read_text_lossy(&root.join(&spec.path), timeout) {
            Ok(text) => {
                info.lines = probe::count_lines(&text);
                info.char_count = text.chars().count();
            }
            Err(e) => warnings.extend(e.to_warning(&spec.path)),
        }
    }

    info
}

/// Completeness score for the given document counts, capped at 100
pub fn completeness_score(
    required_present: usize,
    required_total: usize,
    optional_present: usize,
    optional_total: usize,
) -> f64 {
    let term = |present: usize, total: usize, weight: f64| {
        if total == 0 {
            0.0
        } else {
            present as f64 / total as f64 * weight
        }
    };
    let raw = term(required_present, required_total, 100.0)
        + term(optional_present, optional_total, 50.0);
    round_to(raw.min(100.0), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadinessConfig;
    use crate::scanner::FileScanner;
    use std::fs;

    fn run(root: &Path, config: &ReadinessConfig) -> Report<DocumentationMetrics> {
        let scanner = FileScanner::new(root, &config.scan);
        let ctx = AnalysisContext::new(root, config, &scanner);
        match DocumentationAnalyzer.analyze(&ctx) {
            MetricReport::Documentation(report) => report,
            other => panic!("unexpected report {:?}", other.kind()),
        }
    }

    #[test]
    fn test_completeness_formula() {
        assert_eq!(completeness_score(0, 3, 0, 3), 0.0);
        assert_eq!(completeness_score(3, 3, 0, 3), 100.0);
        assert_eq!(completeness_score(2, 3, 0, 3), 66.7);
        assert_eq!(completeness_score(2, 3, 1, 3), 83.3);
        assert_eq!(completeness_score(0, 3, 3, 3), 50.0);
        // Capped
        assert_eq!(completeness_score(3, 3, 3, 3), 100.0);
        assert_eq!(completeness_score(3, 3, 1, 3), 100.0);
        // Empty lists contribute nothing
        assert_eq!(completeness_score(0, 0, 0, 0), 0.0);
        assert_eq!(completeness_score(0, 0, 2, 2), 50.0);
    }

    #[test]
    fn test_completeness_is_monotonic() {
        for req_total in 0..=4 {
            for opt_total in 0..=4 {
                for req in 0..=req_total {
                    for opt in 0..=opt_total {
                        let score = completeness_score(req, req_total, opt, opt_total);
                        assert!((0.0..=100.0).contains(&score));
                        if req < req_total {
                            assert!(completeness_score(req + 1, req_total, opt, opt_total) >= score);
                        }
                        if opt < opt_total {
                            assert!(completeness_score(req, req_total, opt + 1, opt_total) >= score);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_documents_and_notes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "# Mail\n\nA mail client.\n").unwrap();
        fs::write(dir.path().join("LICENSE"), "MIT\n").unwrap();
        fs::create_dir_all(dir.path().join("docs/note/development")).unwrap();
        fs::write(dir.path().join("docs/note/development/2024-01.md"), "notes\n").unwrap();
        fs::write(dir.path().join("docs/note/development/2024-02.md"), "notes\n").unwrap();
        fs::write(dir.path().join("docs/note/development/draft.txt"), "x\n").unwrap();

        let report = run(dir.path(), &ReadinessConfig::default());
        let m = &report.metrics;

        assert_eq!(m.documents.len(), 6);
        assert_eq!((m.required_present, m.required_total), (2, 3));
        assert_eq!((m.optional_present, m.optional_total), (0, 3));
        assert_eq!(m.completeness_score, 66.7);

        let readme = &m.documents[0];
        assert!(readme.required && readme.exists);
        assert_eq!(readme.lines, 3);
        assert_eq!(readme.char_count, 23);
        assert_eq!(m.total_size_bytes, 23 + 4);

        assert_eq!(m.notes[0].name, "development");
        assert_eq!(m.notes[0].count, 2);
        assert!(!m.notes[1].exists);
        assert_eq!(m.notes[1].count, 0);
        assert!(report.warnings.is_empty());
    }
}
