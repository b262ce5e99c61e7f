//! Configuration module for shipready
//!
//! This module handles:
//! - Project-level configuration (shipready.toml / .shipreadyrc.json)
//! - The expected project layout (directories, critical files, documents)
//! - Build artifact names and test-name categories
//! - Scan behavior (exclusions, read timeout)

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, BuildConfig, DocumentSpec, DocumentationConfig,
    ExcludeMatcher, NoteDirSpec, ReadinessConfig, ScanConfig, SourceConfig, StructureConfig,
    TestCategorySpec, TestConfig, CONFIG_FILE_NAMES, CONFIG_VERSION, DEFAULT_EXCLUDE_PATTERNS,
    OTHER_TEST_CATEGORY,
};
