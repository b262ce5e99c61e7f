//! CLI command definitions and handlers

mod analyze;
mod config;
mod init;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::DEFAULT_WORKERS;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// shipready - release-readiness scoring
///
/// Nothing is executed and nothing in the project is modified.
#[derive(Parser, Debug)]
#[command(name = "shipready")]
#[command(
    version,
    about = "Release-readiness scoring for Python desktop projects",
    long_about = "shipready inspects a project directory with five read-only analyzers \
(structure, source, documentation, build artifacts, tests), scores six readiness \
dimensions and prints a tiered verdict with recommendations.\n\n\
Run without a subcommand to analyze the current directory:\n  \
shipready .",
    after_help = "\
Examples:
  shipready .                              Analyze current directory
  shipready analyze . --format json        JSON output for scripting
  shipready analyze . -f markdown -o r.md  Markdown summary written to a file
  shipready init                           Write a default shipready.toml
  shipready config                         Show the effective configuration"
)]
pub struct Cli {
    /// Path to the project (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of analyzer worker threads (1-64)
    #[arg(long, global = true, default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze the project and print the readiness verdict (default)
    #[command(after_help = "\
Examples:
  shipready analyze .                                  Analyze current directory
  shipready analyze /path/to/project --format json     JSON output for scripting
  shipready analyze . --record-dir ./reports           Keep run records next to the project
  shipready analyze . --packaging-ok true              Record the packaging tool outcome")]
    Analyze(AnalyzeArgs),

    /// Write a default shipready.toml into the project root
    Init {
        /// Overwrite an existing shipready.toml
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Explicit config file instead of the one found in the project root
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Output format: text, json, markdown (or md)
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
    pub format: String,

    /// Write the summary to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Explicit config file (overrides shipready.toml / .shipreadyrc.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for the durable run record (default: per-project cache dir)
    #[arg(long, conflicts_with = "no_record")]
    pub record_dir: Option<PathBuf>,

    /// Do not write a durable run record
    #[arg(long)]
    pub no_record: bool,

    /// No spinner and no status lines on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Outcome of the packaging tool
    #[arg(long, value_name = "BOOL")]
    pub packaging_ok: Option<bool>,

    /// Outcome of the installer compiler
    #[arg(long, value_name = "BOOL")]
    pub installer_ok: Option<bool>,

    /// Outcome of the installation-state probe
    #[arg(long, value_name = "BOOL")]
    pub install_probe_ok: Option<bool>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            output: None,
            config: None,
            record_dir: None,
            no_record: false,
            quiet: false,
            packaging_ok: None,
            installer_ok: None,
            install_probe_ok: None,
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze(args)) => analyze::run(&cli.path, &args, cli.workers),
        Some(Commands::Init { force }) => init::run(&cli.path, force),
        Some(Commands::Config { config }) => config::run(&cli.path, config.as_deref()),
        None => analyze::run(&cli.path, &AnalyzeArgs::default(), cli.workers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_default_command_is_analyze() {
        let cli = Cli::try_parse_from(["shipready", "some/project"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("some/project"));
        assert_eq!(cli.workers, DEFAULT_WORKERS);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::try_parse_from([
            "shipready",
            "analyze",
            "proj",
            "--format",
            "json",
            "--packaging-ok",
            "false",
            "--no-record",
            "--workers",
            "2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Analyze(args)) => {
                assert_eq!(args.format, "json");
                assert_eq!(args.packaging_ok, Some(false));
                assert_eq!(args.installer_ok, None);
                assert!(args.no_record);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.workers, 2);
    }

    #[test]
    fn test_record_dir_conflicts_with_no_record() {
        let result = Cli::try_parse_from([
            "shipready",
            "analyze",
            "--record-dir",
            "out",
            "--no-record",
        ]);
        assert!(result.is_err());
    }
}
