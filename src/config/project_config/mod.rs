//! Project-level configuration support
//!
//! Loads per-project configuration from `shipready.toml` or `.shipreadyrc.json`
//! in the project root. Every section is optional; missing sections fall back
//! to the layout of a PyInstaller + Inno Setup desktop application.
//!
//! # Configuration Format
//!
//! ```toml
//! # shipready.toml
//! version = 1
//!
//! [scan]
//! read_timeout_ms = 5000
//! exclude = ["/generated/", "fixtures/"]
//!
//! [structure]
//! key_directories = ["src", "tests", "docs"]
//! critical_files = ["src/main.py", "README.md", "LICENSE"]
//!
//! [sources]
//! extension = "py"
//! large_file_threshold = 200
//!
//! [[documentation.required]]
//! name = "README.md"
//! path = "README.md"
//!
//! [build]
//! output_dir = "dist"
//! packaging_spec = "app.spec"
//!
//! [tests]
//! scored_categories = ["integration", "build", "installer"]
//!
//! [[tests.categories]]
//! name = "integration"
//! keywords = ["integration"]
//! ```

use crate::error::ReadinessError;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Current configuration schema version
pub const CONFIG_VERSION: u32 = 1;

/// Config files searched in the project root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["shipready.toml", ".shipreadyrc.json"];

/// Category assigned to test files that match no configured category
pub const OTHER_TEST_CATEGORY: &str = "other";

/// Built-in exclusion patterns for tool and environment directories.
/// These are applied automatically unless `skip_default_excludes = true`.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    ".git/",
    "__pycache__/",
    ".venv/",
    "venv/",
    ".tox/",
    "node_modules/",
    "site-packages/",
];

/// Full analysis configuration, passed into the engine at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Schema version of this configuration
    pub version: u32,
    pub scan: ScanConfig,
    pub structure: StructureConfig,
    pub sources: SourceConfig,
    pub documentation: DocumentationConfig,
    pub build: BuildConfig,
    pub tests: TestConfig,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            scan: ScanConfig::default(),
            structure: StructureConfig::default(),
            sources: SourceConfig::default(),
            documentation: DocumentationConfig::default(),
            build: BuildConfig::default(),
            tests: TestConfig::default(),
        }
    }
}

/// Directory walking behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Upper bound for any single file read or metadata probe
    pub read_timeout_ms: u64,

    /// Follow symbolic links while walking (cycles are always skipped)
    pub follow_symlinks: bool,

    /// If true, disable built-in default exclusion patterns
    pub skip_default_excludes: bool,

    /// Gitignore-style patterns to exclude from scanning
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 5_000,
            follow_symlinks: true,
            skip_default_excludes: false,
            exclude: Vec::new(),
        }
    }
}

impl ScanConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Returns effective exclusion patterns (defaults + user patterns).
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut patterns = Vec::new();

        if !self.skip_default_excludes {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()));
        }

        for p in &self.exclude {
            if !patterns.contains(p) {
                patterns.push(p.clone());
            }
        }

        patterns
    }

    /// Compile the effective patterns into one gitignore matcher.
    ///
    /// Paths are matched relative to the project root, so `/generated/` only
    /// excludes the top-level directory while `generated/` excludes it at any
    /// depth. A `!pattern` re-includes what an earlier pattern excluded.
    pub fn exclude_matcher(&self) -> Result<ExcludeMatcher, ReadinessError> {
        let mut builder = GitignoreBuilder::new(".");
        for pattern in self.effective_excludes() {
            builder.add_line(None, &pattern).map_err(|e| {
                ReadinessError::Config(format!("invalid scan.exclude pattern '{}': {}", pattern, e))
            })?;
        }
        let inner = builder
            .build()
            .map_err(|e| ReadinessError::Config(format!("invalid scan.exclude patterns: {}", e)))?;
        Ok(ExcludeMatcher { inner })
    }
}

/// Compiled `[scan].exclude` patterns
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    inner: Gitignore,
}

impl ExcludeMatcher {
    /// Matches nothing
    pub fn empty() -> Self {
        Self {
            inner: Gitignore::empty(),
        }
    }

    /// `rel_path` is `/`-separated and relative to the project root.
    /// A path inside an excluded directory is excluded too.
    pub fn is_excluded(&self, rel_path: &str, is_dir: bool) -> bool {
        if rel_path.is_empty() {
            return false;
        }
        self.inner
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }
}

/// Expected directory layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Top-level directories whose source units are counted
    pub key_directories: Vec<String>,

    /// Files the project cannot ship without (literal relative paths)
    pub critical_files: Vec<String>,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            key_directories: strings(&[
                "src",
                "tests",
                "docs",
                "resources",
                "installer",
                "build_config",
                "quality_assurance",
            ]),
            critical_files: strings(&[
                "src/main.py",
                "config.yaml",
                "README.md",
                "LICENSE",
                "app.spec",
                "requirements.txt",
            ]),
        }
    }
}

/// Source unit discovery and code-quality knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File extension of a source unit (without the dot)
    pub extension: String,

    /// Directories scanned for source units ("." is the whole project)
    pub roots: Vec<String>,

    /// Units with more lines than this are listed as large files
    pub large_file_threshold: usize,

    /// How many imported modules to keep in the tally
    pub top_imports: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            roots: strings(&["."]),
            large_file_threshold: 200,
            top_imports: 10,
        }
    }
}

/// A named document at a fixed relative path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub name: String,
    pub path: String,
}

impl DocumentSpec {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

/// A directory of Markdown notes that is counted, not scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDirSpec {
    pub name: String,
    pub path: String,
}

/// Documents checked by the documentation analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    /// Contribute up to 100 points to completeness
    pub required: Vec<DocumentSpec>,

    /// Contribute up to 50 additional points, total capped at 100
    pub optional: Vec<DocumentSpec>,

    /// Note directories counted for the report
    pub notes: Vec<NoteDirSpec>,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            required: vec![
                DocumentSpec::new("README.md", "README.md"),
                DocumentSpec::new("LICENSE", "LICENSE"),
                DocumentSpec::new("config.yaml", "config.yaml"),
            ],
            optional: vec![
                DocumentSpec::new("requirements.txt", "requirements.txt"),
                DocumentSpec::new("build_instructions.md", "docs/build_instructions.md"),
                DocumentSpec::new("installer_README.md", "installer/README.md"),
            ],
            notes: vec![
                NoteDirSpec {
                    name: "development".to_string(),
                    path: "docs/note/development".to_string(),
                },
                NoteDirSpec {
                    name: "blog".to_string(),
                    path: "docs/note/blog".to_string(),
                },
            ],
        }
    }
}

/// Packaging outputs and automation scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory the packaging tool writes executables into
    pub output_dir: String,

    /// Script configuration file of the packaging tool
    pub packaging_spec: String,

    /// Installer compiler script
    pub installer_script: String,

    pub build_scripts: Vec<String>,

    pub test_scripts: Vec<String>,

    /// Files that must ship next to the executable
    pub distribution_files: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: "dist".to_string(),
            packaging_spec: "app.spec".to_string(),
            installer_script: "installer/installer.iss".to_string(),
            build_scripts: strings(&["build_simple.py", "build_exe.py", "installer/build_installer.py"]),
            test_scripts: strings(&[
                "test_executable.py",
                "installer/test_installer.py",
                "tests/test_integration.py",
            ]),
            distribution_files: strings(&["README.md", "LICENSE", "config.yaml"]),
        }
    }
}

impl BuildConfig {
    /// Files counted by the build-system dimension
    pub fn required_build_files(&self) -> Vec<&str> {
        let mut files = vec![self.packaging_spec.as_str()];
        files.extend(self.build_scripts.iter().map(String::as_str));
        files.push(self.installer_script.as_str());
        files
    }
}

/// A test category matched by substring on the file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCategorySpec {
    pub name: String,
    pub keywords: Vec<String>,
}

impl TestCategorySpec {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: strings(keywords),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.keywords.iter().any(|k| file_name.contains(k.as_str()))
    }
}

/// Test-file naming convention and categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Regexes matched against the file name; any match makes a test file
    pub name_patterns: Vec<String>,

    /// Categories that count toward the test-coverage dimension
    pub scored_categories: Vec<String>,

    /// Ordered: the first matching category wins
    pub categories: Vec<TestCategorySpec>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            name_patterns: strings(&[r"^test_.*\.py$", r"^.*_test\.py$"]),
            scored_categories: strings(&["integration", "build", "installer"]),
            categories: vec![
                TestCategorySpec::new("integration", &["integration"]),
                TestCategorySpec::new("unit", &["unit"]),
                TestCategorySpec::new("build", &["executable", "build"]),
                TestCategorySpec::new("installer", &["installer"]),
            ],
        }
    }
}

impl TestConfig {
    /// Compile the name patterns
    pub fn compiled_patterns(&self) -> Result<Vec<Regex>, ReadinessError> {
        self.name_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    ReadinessError::Config(format!("invalid test name pattern '{}': {}", p, e))
                })
            })
            .collect()
    }

    /// Category of a test file; first match in declaration order wins
    pub fn categorize(&self, file_name: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.matches(file_name))
            .map_or(OTHER_TEST_CATEGORY, |c| c.name.as_str())
    }

    /// All category names, declared ones first, then `other`
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
        if !names.contains(&OTHER_TEST_CATEGORY) {
            names.push(OTHER_TEST_CATEGORY);
        }
        names
    }
}

impl ReadinessConfig {
    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<(), ReadinessError> {
        if self.version != CONFIG_VERSION {
            return Err(ReadinessError::Config(format!(
                "unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }
        if self.scan.read_timeout_ms == 0 {
            return Err(ReadinessError::Config(
                "scan.read_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.sources.extension.is_empty() || self.sources.extension.starts_with('.') {
            return Err(ReadinessError::Config(format!(
                "sources.extension must be a bare extension like \"py\", got \"{}\"",
                self.sources.extension
            )));
        }
        if !crate::parsers::supported_extensions().contains(&self.sources.extension.as_str()) {
            return Err(ReadinessError::Config(format!(
                "sources.extension \"{}\" has no parser (supported: {})",
                self.sources.extension,
                crate::parsers::supported_extensions().join(", ")
            )));
        }
        self.scan.exclude_matcher()?;
        self.tests.compiled_patterns()?;

        let known = self.tests.category_names();
        for scored in &self.tests.scored_categories {
            if !known.contains(&scored.as_str()) {
                return Err(ReadinessError::Config(format!(
                    "tests.scored_categories references unknown category '{}'",
                    scored
                )));
            }
        }
        Ok(())
    }

    /// Render as TOML (used by `shipready init` and `shipready config`)
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load project configuration from the project root.
///
/// Searches for configuration files in this order:
/// 1. `shipready.toml`
/// 2. `.shipreadyrc.json`
///
/// Returns default configuration if no usable config file is found.
pub fn load_project_config(root: &Path) -> ReadinessConfig {
    for name in CONFIG_FILE_NAMES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ReadinessConfig::default()
}

/// Load configuration from an explicit file (format chosen by extension)
pub fn load_config_file(path: &Path) -> anyhow::Result<ReadinessConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config: ReadinessConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
