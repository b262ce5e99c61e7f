//! Analyze command - run the pipeline and print the verdict

use anyhow::{Context, Result};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::AnalyzeArgs;
use crate::config::{load_config_file, load_project_config};
use crate::models::ExternalFacts;
use crate::pipeline::Pipeline;
use crate::reporters::{self, OutputFormat};

/// Summary file name used when `--output` points at a directory
const SUMMARY_STEM: &str = "readiness_summary";

/// Create spinner progress style
fn create_spinner_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")?)
}

/// Run the analyze command
pub fn run(path: &Path, args: &AnalyzeArgs, workers: usize) -> Result<()> {
    let format: OutputFormat = args.format.parse()?;

    let config = match &args.config {
        Some(file) => load_config_file(file)
            .with_context(|| format!("Failed to load config from {}", file.display()))?,
        None => load_project_config(path),
    };

    let facts = ExternalFacts {
        packaging_ok: args.packaging_ok,
        installer_ok: args.installer_ok,
        install_probe_ok: args.install_probe_ok,
    };

    let mut pipeline = Pipeline::new(config)
        .with_workers(workers)
        .with_external_facts(facts);
    if args.no_record {
        pipeline = pipeline.without_record();
    } else if let Some(dir) = &args.record_dir {
        pipeline = pipeline.with_record_dir(dir);
    }

    let spinner = if args.quiet || !Term::stderr().is_term() {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(create_spinner_style()?);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message("Running analyzers...");
        Some(bar)
    };
    if let Some(bar) = &spinner {
        let bar = bar.clone();
        pipeline = pipeline.with_progress_callback(Box::new(move |name: &str, done: usize, total: usize| {
            bar.set_message(format!("Analyzed {} ({}/{})", name, done, total));
        }));
    }

    let result = pipeline.run(path);
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }
    let outcome = result.with_context(|| format!("Analysis of {} failed", path.display()))?;

    let output = reporters::report_with_format(&outcome.record, format)?;

    if let Some(out) = &args.output {
        let out_path = summary_path(out, format);
        std::fs::write(&out_path, console::strip_ansi_codes(&output).as_ref())
            .with_context(|| format!("Failed to write summary to {}", out_path.display()))?;
        if !args.quiet {
            eprintln!(
                "{}Summary written to: {}",
                style("📄 ").bold(),
                style(out_path.display()).cyan()
            );
        }
    } else if format == OutputFormat::Text && Term::stdout().is_term() {
        println!("{}", output);
    } else {
        println!("{}", console::strip_ansi_codes(&output));
    }

    if !args.quiet {
        if let Some(record_path) = &outcome.record_path {
            eprintln!(
                "{}Run record saved to: {}",
                style("✓ ").green(),
                style(record_path.display()).dim()
            );
        }
        if let Some(err) = &outcome.record_error {
            eprintln!("{}{}", style("⚠️  ").yellow(), err);
        }
    }

    Ok(())
}

/// Resolve `--output`: a directory gets a default summary file name
fn summary_path(out: &Path, format: OutputFormat) -> PathBuf {
    if out.is_dir() {
        out.join(format!(
            "{}.{}",
            SUMMARY_STEM,
            reporters::file_extension(format)
        ))
    } else {
        out.to_path_buf()
    }
}
