//! Core data models for shipready
//!
//! These models are shared by the scanner, the parser and the analyzers.
//! All of them are plain values: created once during a run and never mutated
//! after they have been handed to another component.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root, always `/`-separated
    pub path: String,
    pub size_bytes: u64,
    /// Line count; zero when the file could not be read or decoded
    pub line_count: usize,
    pub modified: Option<DateTime<Utc>>,
    /// Soft failure attached to this file's slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<AnalysisWarning>,
}

/// Kind of a source-level definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Function,
    Class,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionKind::Function => write!(f, "function"),
            DefinitionKind::Class => write!(f, "class"),
        }
    }
}

/// A function or class definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub name: String,
    pub line: u32,
    pub documented: bool,
}

/// Reference count for one imported module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCount {
    pub module: String,
    pub count: usize,
}

/// Structural model of a single source unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolModel {
    /// Definitions in source order (pre-order, outer before inner)
    pub definitions: Vec<Definition>,
    /// Imported modules in order of first appearance
    pub imports: Vec<ImportCount>,
}

impl SymbolModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one reference to `module`
    pub fn add_import(&mut self, module: impl Into<String>) {
        let module = module.into();
        match self.imports.iter_mut().find(|i| i.module == module) {
            Some(existing) => existing.count += 1,
            None => self.imports.push(ImportCount { module, count: 1 }),
        }
    }

    pub fn import_count(&self, module: &str) -> usize {
        self.imports
            .iter()
            .find(|i| i.module == module)
            .map_or(0, |i| i.count)
    }

    pub fn count(&self, kind: DefinitionKind) -> usize {
        self.definitions.iter().filter(|d| d.kind == kind).count()
    }

    pub fn documented_count(&self) -> usize {
        self.definitions.iter().filter(|d| d.documented).count()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.imports.is_empty()
    }
}

/// Category of a recoverable, per-unit problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Permission or I/O failure reading a file or directory
    Unreadable,
    /// A bounded probe did not answer in time
    Timeout,
    /// File content is not valid UTF-8
    Encoding,
    /// Source unit has malformed syntax
    Syntax,
    /// A symlink led back to an already visited location
    SymlinkLoop,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::Unreadable => "unreadable",
            WarningKind::Timeout => "timeout",
            WarningKind::Encoding => "encoding",
            WarningKind::Syntax => "syntax",
            WarningKind::SymlinkLoop => "symlink_loop",
        };
        f.write_str(s)
    }
}

/// A recoverable problem attached to a metric report
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub kind: WarningKind,
    /// Project-relative path of the affected file, if any
    pub path: Option<String>,
    pub message: String,
}

impl AnalysisWarning {
    pub fn new(kind: WarningKind, path: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    pub fn for_path(kind: WarningKind, path: &str, message: impl Into<String>) -> Self {
        Self::new(kind, Some(path.to_string()), message)
    }
}

/// Drop repeated warnings, keeping the first occurrence of each
pub fn dedup_warnings(warnings: &mut Vec<AnalysisWarning>) {
    let mut seen = FxHashSet::default();
    warnings.retain(|w| seen.insert(w.clone()));
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}: {}", self.kind, path, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Presence and size of one expected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFacts {
    pub path: String,
    pub exists: bool,
    pub size_bytes: u64,
}

impl FileFacts {
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exists: false,
            size_bytes: 0,
        }
    }
}

/// Outcomes of external tools, supplied by the caller.
///
/// `None` means unknown. These are recorded next to the verdict and never
/// change a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFacts {
    /// The packaging tool produced its executable
    pub packaging_ok: Option<bool>,
    /// The installer compiler produced its installer
    pub installer_ok: Option<bool>,
    /// The installation-state probe passed
    pub install_probe_ok: Option<bool>,
}

impl ExternalFacts {
    pub fn is_empty(&self) -> bool {
        self.packaging_ok.is_none() && self.installer_ok.is_none() && self.install_probe_ok.is_none()
    }
}

/// Count how many of the given facts refer to existing files
pub fn count_existing<'a>(facts: impl IntoIterator<Item = &'a FileFacts>) -> usize {
    facts.into_iter().filter(|f| f.exists).count()
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_import_counts_and_keeps_first_seen_order() {
        let mut model = SymbolModel::new();
        model.add_import("os");
        model.add_import("sys");
        model.add_import("os");

        assert_eq!(model.import_count("os"), 2);
        assert_eq!(model.import_count("sys"), 1);
        assert_eq!(model.import_count("json"), 0);
        assert_eq!(model.imports[0].module, "os");
        assert_eq!(model.imports[1].module, "sys");
    }

    #[test]
    fn test_documented_never_exceeds_definitions() {
        let model = SymbolModel {
            definitions: vec![
                Definition {
                    kind: DefinitionKind::Class,
                    name: "Mailer".into(),
                    line: 1,
                    documented: true,
                },
                Definition {
                    kind: DefinitionKind::Function,
                    name: "send".into(),
                    line: 3,
                    documented: false,
                },
            ],
            imports: vec![],
        };
        assert_eq!(model.count(DefinitionKind::Class), 1);
        assert_eq!(model.count(DefinitionKind::Function), 1);
        assert_eq!(model.documented_count(), 1);
        assert!(model.documented_count() <= model.definitions.len());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(66.666_666, 1), 66.7);
        assert_eq!(round_to(0.333_33, 2), 0.33);
        assert_eq!(round_to(100.0, 1), 100.0);
    }

    #[test]
    fn test_dedup_warnings_ignores_adjacency() {
        let a = AnalysisWarning::for_path(WarningKind::Unreadable, "a_link", "not found");
        let b = AnalysisWarning::for_path(WarningKind::Unreadable, "b_link", "not found");
        let mut warnings = vec![a.clone(), b.clone(), a.clone(), b.clone()];
        dedup_warnings(&mut warnings);
        assert_eq!(warnings, vec![a, b]);
    }

    #[test]
    fn test_warning_display() {
        let w = AnalysisWarning::for_path(WarningKind::Syntax, "src/bad.py", "syntax error");
        assert_eq!(w.to_string(), "[syntax] src/bad.py: syntax error");
    }
}
