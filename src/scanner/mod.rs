//! File-system scanner
//!
//! Walks target subdirectories of a project root and produces one
//! [`FileRecord`] per matching file. The scan is best-effort: a file that
//! cannot be read keeps its slot with a warning attached, and symlinks that
//! lead back to an already visited real path are skipped.
//!
//! Output order is lexicographic by relative path, independent of the order
//! in which the filesystem returns directory entries.

pub mod probe;

use crate::config::{ExcludeMatcher, ScanConfig};
use crate::models::{dedup_warnings, AnalysisWarning, FileRecord, WarningKind};
use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// A scanned file, optionally with its decoded content
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub record: FileRecord,
    /// UTF-8 content, present only when requested and decodable
    pub text: Option<String>,
}

/// Result of scanning one target subdirectory
#[derive(Debug, Clone, Default)]
pub struct DirectoryScan {
    /// Subdirectory name as given by the caller
    pub name: String,
    pub exists: bool,
    /// Sorted by relative path
    pub files: Vec<ScannedFile>,
    /// Walk-level problems (unreadable directories, symlink loops)
    pub warnings: Vec<AnalysisWarning>,
}

impl DirectoryScan {
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().map(|f| &f.record)
    }

    pub fn line_count(&self) -> usize {
        self.records().map(|r| r.line_count).sum()
    }

    /// Walk warnings plus the per-file warnings
    pub fn all_warnings(&self) -> Vec<AnalysisWarning> {
        let mut all = self.warnings.clone();
        all.extend(self.records().filter_map(|r| r.warning.clone()));
        all
    }
}

/// What the scanner should do with each matching file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Metadata only, no line count
    MetadataOnly,
    /// Read and count lines, then drop the content
    CountLines,
    /// Read, count lines and keep the content
    KeepText,
}

/// Recursive, symlink-cycle-safe file scanner
pub struct FileScanner {
    root: PathBuf,
    excludes: ExcludeMatcher,
    follow_symlinks: bool,
    timeout: Duration,
}

impl FileScanner {
    /// Invalid exclude patterns are rejected by config validation; here
    /// they only disable exclusion.
    pub fn new(root: &Path, config: &ScanConfig) -> Self {
        let excludes = config.exclude_matcher().unwrap_or_else(|e| {
            warn!("Ignoring exclude patterns: {}", e);
            ExcludeMatcher::empty()
        });
        Self {
            root: root.to_path_buf(),
            excludes,
            follow_symlinks: config.follow_symlinks,
            timeout: config.read_timeout(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Scan several disjoint subdirectories in parallel.
    ///
    /// Results keep the order of `subdirs`.
    pub fn scan(&self, subdirs: &[String], extension: &str, mode: ReadMode) -> Vec<DirectoryScan> {
        subdirs
            .par_iter()
            .map(|dir| self.scan_dir(dir, extension, mode))
            .collect()
    }

    /// Scan one subdirectory for files with the given extension
    pub fn scan_dir(&self, subdir: &str, extension: &str, mode: ReadMode) -> DirectoryScan {
        self.scan_matching(subdir, mode, |path| has_extension(path, extension))
    }

    /// Scan one subdirectory for files accepted by `accept`
    pub fn scan_matching<F>(&self, subdir: &str, mode: ReadMode, accept: F) -> DirectoryScan
    where
        F: Fn(&Path) -> bool + Sync,
    {
        let dir_path = if subdir == "." || subdir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(subdir)
        };

        let exists = match probe::metadata(&dir_path, self.timeout) {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                let mut scan = DirectoryScan {
                    name: subdir.to_string(),
                    ..Default::default()
                };
                if let Some(w) = e.to_warning(subdir) {
                    scan.warnings.push(w);
                }
                return scan;
            }
        };
        if !exists {
            return DirectoryScan {
                name: subdir.to_string(),
                ..Default::default()
            };
        }

        let (candidates, mut warnings) = self.walk(&dir_path, &accept);

        let mut files: Vec<ScannedFile> = candidates
            .par_iter()
            .map(|(rel, abs)| self.record_file(rel, abs, mode))
            .collect();
        files.sort_by(|a, b| a.record.path.cmp(&b.record.path));
        warnings.sort_by(|a, b| a.path.cmp(&b.path));
        dedup_warnings(&mut warnings);

        debug!("Scanned {}: {} files", subdir, files.len());

        DirectoryScan {
            name: subdir.to_string(),
            exists: true,
            files,
            warnings,
        }
    }

    /// Walk `dir`, returning (relative, absolute) paths of accepted files
    fn walk<F>(&self, dir: &Path, accept: &F) -> (Vec<(String, PathBuf)>, Vec<AnalysisWarning>)
    where
        F: Fn(&Path) -> bool + Sync,
    {
        let visited: Arc<Mutex<FxHashSet<PathBuf>>> = Arc::new(Mutex::new(FxHashSet::default()));
        let skipped: Arc<Mutex<Vec<AnalysisWarning>>> = Arc::new(Mutex::new(Vec::new()));

        if let Ok(real) = dir.canonicalize() {
            if let Ok(mut seen) = visited.lock() {
                seen.insert(real);
            }
        }

        let mut builder = WalkBuilder::new(dir);
        builder
            .standard_filters(false)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name(|a, b| a.cmp(b));

        let root = self.root.clone();
        let root_real = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        let excludes = self.excludes.clone();
        let filter_visited = Arc::clone(&visited);
        let filter_skipped = Arc::clone(&skipped);
        builder.filter_entry(move |entry| {
            let rel = relative_path(&root, entry.path());
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if excludes.is_excluded(&rel, is_dir) {
                return false;
            }

            if !is_dir && !entry.path_is_symlink() {
                return true;
            }

            // Directories and links are deduplicated by their real path
            let Ok(real) = entry.path().canonicalize() else {
                return true;
            };
            let first_visit = filter_visited
                .lock()
                .map(|mut seen| seen.insert(real.clone()))
                .unwrap_or(true);
            if !first_visit {
                if let Ok(mut skipped) = filter_skipped.lock() {
                    let target = real
                        .strip_prefix(&root_real)
                        .map(|p| relative_path(Path::new(""), p))
                        .unwrap_or_else(|_| real.display().to_string());
                    skipped.push(AnalysisWarning::for_path(
                        WarningKind::SymlinkLoop,
                        &rel,
                        format!("already visited as {}", target),
                    ));
                }
            }
            first_visit
        });

        let mut files = Vec::new();
        let mut warnings = Vec::new();

        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping during scan of {}: {}", dir.display(), err);
                    warnings.push(self.walk_warning(&err));
                    continue;
                }
            };

            let path = entry.path();
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if !is_file || !accept(path) {
                continue;
            }
            files.push((relative_path(&self.root, path), path.to_path_buf()));
        }

        if let Ok(mut skipped) = skipped.lock() {
            warnings.append(&mut skipped);
        }

        (files, warnings)
    }

    /// Warning for a walk error, with the offending path made relative.
    ///
    /// The walker's I/O errors embed the absolute path in their text, so only
    /// the error kind is kept.
    fn walk_warning(&self, err: &ignore::Error) -> AnalysisWarning {
        match err {
            ignore::Error::WithPath { path, err } => {
                let mut warning = self.walk_warning(err);
                warning.path = Some(relative_path(&self.root, path));
                warning
            }
            ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
                self.walk_warning(err)
            }
            ignore::Error::Loop { ancestor, child } => AnalysisWarning::for_path(
                WarningKind::SymlinkLoop,
                &relative_path(&self.root, child),
                format!("loops back to {}", relative_path(&self.root, ancestor)),
            ),
            ignore::Error::Io(io) => {
                AnalysisWarning::new(WarningKind::Unreadable, None, io.kind().to_string())
            }
            other => AnalysisWarning::new(WarningKind::Unreadable, None, other.to_string()),
        }
    }

    /// Build the record for one file, never failing
    fn record_file(&self, rel: &str, abs: &Path, mode: ReadMode) -> ScannedFile {
        let mut warning = None;

        let (size_bytes, modified) = match probe::metadata(abs, self.timeout) {
            Ok(meta) => (
                meta.len(),
                meta.modified().ok().map(DateTime::<Utc>::from),
            ),
            Err(e) => {
                warning = e.to_warning(rel);
                (0, None)
            }
        };

        let mut line_count = 0;
        let mut text = None;
        if mode != ReadMode::MetadataOnly && warning.is_none() {
            match probe::read_text(abs, self.timeout) {
                Ok(content) => {
                    line_count = probe::count_lines(&content);
                    if mode == ReadMode::KeepText {
                        text = Some(content);
                    }
                }
                Err(e) => {
                    warn!("Could not read {}: {}", rel, e);
                    warning = e.to_warning(rel);
                }
            }
        }

        ScannedFile {
            record: FileRecord {
                path: rel.to_string(),
                size_bytes,
                line_count,
                modified,
                warning,
            },
            text,
        }
    }
}

/// `/`-separated path of `path` relative to `root`
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension)
}
