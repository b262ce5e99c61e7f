//! Output reporters for shipready runs
//!
//! Supports multiple output formats for the summary:
//! - `text` - Terminal output with colors
//! - `json` - The full run record, machine-readable
//! - `markdown` - GitHub-flavored Markdown
//!
//! Independently of the summary, [`record`] persists the durable run record.

mod json;
mod markdown;
pub mod record;
mod text;

pub use record::{record_file_name, write_record, RunInfo, RunRecord};

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render a run record in the specified format
pub fn report(record: &RunRecord, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(record, fmt)
}

/// Render a run record using an OutputFormat enum
pub fn report_with_format(record: &RunRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(record),
        OutputFormat::Json => json::render(record),
        OutputFormat::Markdown => markdown::render(record),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}
