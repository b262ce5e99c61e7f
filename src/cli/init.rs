//! Init command - write a default shipready.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::{ReadinessConfig, CONFIG_FILE_NAMES};

const HEADER: &str = "\
# shipready configuration
#
# Every section is optional. Removed keys fall back to the defaults below.
# Patterns in [scan].exclude use .gitignore syntax, relative to this file.
# Test name patterns in [tests].name_patterns are regular expressions.

";

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    let project = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !project.is_dir() {
        anyhow::bail!("Path is not a directory: {}", project.display());
    }

    let config_path = project.join(CONFIG_FILE_NAMES[0]);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let body = ReadinessConfig::default().to_toml()?;
    std::fs::write(&config_path, format!("{}{}", HEADER, body))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_file;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();

        let path = dir.path().join("shipready.toml");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# shipready configuration"));

        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded, ReadinessConfig::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipready.toml");
        std::fs::write(&path, "version = 1\n").unwrap();

        assert!(run(dir.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "version = 1\n");

        run(dir.path(), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[scan]"));
    }
}
