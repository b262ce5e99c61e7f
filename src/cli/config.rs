//! Config command - show the effective configuration

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{load_config_file, load_project_config, CONFIG_FILE_NAMES};

/// Run the config command
pub fn run(path: &Path, explicit: Option<&Path>) -> Result<()> {
    let (config, source) = match explicit {
        Some(file) => (
            load_config_file(file)
                .with_context(|| format!("Failed to load config from {}", file.display()))?,
            file.display().to_string(),
        ),
        None => {
            let found = CONFIG_FILE_NAMES
                .iter()
                .map(|name| path.join(name))
                .find(|p| p.exists())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in defaults".to_string());
            (load_project_config(path), found)
        }
    };

    println!("# source: {}", source);
    print!("{}", config.to_toml()?);
    Ok(())
}
