//! Cache path utilities - run records live in ~/.cache/shipready/<project-hash>/
//! so that analysis never writes into the inspected project.

use std::path::{Path, PathBuf};

const CACHE_NAMESPACE: &str = "shipready";

/// Per-project cache directory: `<user cache>/shipready/<name>-<hash>`.
///
/// `dirs::cache_dir` resolves to `~/.cache` (or `$XDG_CACHE_HOME`) on Linux,
/// `~/Library/Caches` on macOS and `%LOCALAPPDATA%` on Windows.
pub fn get_cache_dir(project_path: &Path) -> PathBuf {
    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(CACHE_NAMESPACE).join(hash_path(project_path))
}

/// Default directory for durable run records of a project.
pub fn get_records_dir(project_path: &Path) -> PathBuf {
    get_cache_dir(project_path).join("reports")
}

/// Readable, collision-resistant directory name for a project path
fn hash_path(path: &Path) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let path_str = canonical.to_string_lossy();

    let mut hasher = DefaultHasher::new();
    path_str.hash(&mut hasher);
    let hash = hasher.finish();

    // file_name of the canonical path, so "." still gives the project name
    let project_name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(20)
        .collect::<String>();

    format!("{}-{:012x}", project_name, hash)
}
