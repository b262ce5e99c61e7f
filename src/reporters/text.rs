//! Text (terminal) reporter with colors and formatting

use super::RunRecord;
use crate::scoring::{Status, Tier};
use anyhow::Result;

/// Tier colors (ANSI escape codes)
fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Ready => "\x1b[32m",       // Green
        Tier::AlmostReady => "\x1b[92m", // Light green
        Tier::NeedsWork => "\x1b[33m",   // Yellow
        Tier::NotReady => "\x1b[31m",    // Red
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Warnings listed individually before the rest are summarized
const MAX_LISTED_WARNINGS: usize = 10;

fn mark(ok: bool) -> String {
    if ok {
        format!("{GREEN}✓{RESET}")
    } else {
        format!("{RED}✗{RESET}")
    }
}

fn outcome(fact: Option<bool>) -> &'static str {
    match fact {
        Some(true) => "passed",
        Some(false) => "failed",
        None => "unknown",
    }
}

/// Render record as formatted terminal output
pub fn render(record: &RunRecord) -> Result<String> {
    let mut out = String::new();
    let verdict = &record.verdict;
    let reports = &record.reports;

    // Header
    let tier_c = tier_color(verdict.tier);
    out.push_str(&format!("\n{BOLD}Release Readiness{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!("Project: {}\n", record.run_info.root));
    out.push_str(&format!(
        "Score: {BOLD}{:.1}/100{RESET}  Tier: {tier_c}{BOLD}{}{RESET} ({})\n\n",
        verdict.overall_score, verdict.tier, verdict.tier_message
    ));

    // Project overview
    let structure = &reports.structure.metrics;
    out.push_str(&format!("{BOLD}PROJECT OVERVIEW{RESET}\n"));
    out.push_str(&format!(
        "  Files: {}  Lines: {}  Key directories: {}/{}  Critical files: {}/{}\n\n",
        structure.total_files,
        structure.total_lines,
        structure.directories_present(),
        structure.directories.len(),
        structure.critical_files_present(),
        structure.critical_files.len()
    ));

    // Code quality
    let source = &reports.source.metrics;
    out.push_str(&format!("{BOLD}CODE QUALITY{RESET}\n"));
    out.push_str(&format!(
        "  Source units: {}  Functions: {}  Classes: {}\n",
        source.total_units, source.total_functions, source.total_classes
    ));
    out.push_str(&format!(
        "  Docstring coverage: {:.1}%  Average file size: {:.1} lines\n",
        source.docstring_coverage, source.average_file_size
    ));
    if source.parse_failures > 0 {
        out.push_str(&format!("  Parse failures: {}\n", source.parse_failures));
    }
    if !source.large_files.is_empty() {
        out.push_str(&format!(
            "  Large files (>{} lines): {}\n",
            source.large_file_threshold,
            source.large_files.len()
        ));
        for large in &source.large_files {
            out.push_str(&format!("    {DIM}{} ({} lines){RESET}\n", large.path, large.lines));
        }
    }
    if !source.top_imports.is_empty() {
        let imports: Vec<String> = source
            .top_imports
            .iter()
            .map(|i| format!("{} ({})", i.module, i.count))
            .collect();
        out.push_str(&format!("  Top imports: {}\n", imports.join(", ")));
    }
    out.push('\n');

    // Documentation
    let docs = &reports.documentation.metrics;
    out.push_str(&format!("{BOLD}DOCUMENTATION{RESET}\n"));
    out.push_str(&format!(
        "  Completeness: {:.1}%  Required: {}/{}  Optional: {}/{}\n",
        docs.completeness_score,
        docs.required_present,
        docs.required_total,
        docs.optional_present,
        docs.optional_total
    ));
    for doc in &docs.documents {
        out.push_str(&format!("  {} {}\n", mark(doc.exists), doc.name));
    }
    if !docs.notes.is_empty() {
        let notes: Vec<String> = docs
            .notes
            .iter()
            .map(|n| format!("{} {}", n.name, n.count))
            .collect();
        out.push_str(&format!("  Notes: {}\n", notes.join(", ")));
    }
    out.push('\n');

    // Build artifacts
    let build = &reports.build.metrics;
    out.push_str(&format!("{BOLD}BUILD ARTIFACTS{RESET}\n"));
    out.push_str(&format!("  Executables: {}\n", build.executables.len()));
    for exe in &build.executables {
        out.push_str(&format!(
            "    {DIM}{} ({:.1} MB){RESET}\n",
            exe.path,
            exe.size_bytes as f64 / (1024.0 * 1024.0)
        ));
    }
    out.push_str(&format!(
        "  {} Packaging spec ({})\n",
        mark(build.packaging_spec.exists),
        build.packaging_spec.path
    ));
    out.push_str(&format!(
        "  {} Installer script ({})\n",
        mark(build.installer_script.exists),
        build.installer_script.path
    ));
    out.push_str(&format!(
        "  Build files: {}/{}  Distribution files: {}/{}\n\n",
        build.build_files_present(),
        build.build_files_total(),
        build.distribution_files_present(),
        build.distribution_files.len()
    ));

    // Tests
    let tests = &reports.tests.metrics;
    out.push_str(&format!("{BOLD}TESTS{RESET}\n"));
    out.push_str(&format!(
        "  Test files: {}  Estimated coverage: {:.1}% (ratio {:.2})\n",
        tests.total_test_files, tests.estimated_coverage, tests.test_to_source_ratio
    ));
    let categories: Vec<String> = tests
        .categories
        .iter()
        .map(|c| format!("{} {} ({})", mark(c.present), c.name, c.files.len()))
        .collect();
    out.push_str(&format!("  {}\n\n", categories.join("  ")));

    // External checks
    let facts = &record.external_facts;
    if !facts.is_empty() {
        out.push_str(&format!("{BOLD}EXTERNAL CHECKS{RESET}\n"));
        out.push_str(&format!(
            "  Packaging: {}  Installer: {}  Install probe: {}\n\n",
            outcome(facts.packaging_ok),
            outcome(facts.installer_ok),
            outcome(facts.install_probe_ok)
        ));
    }

    // Readiness
    out.push_str(&format!("{BOLD}READINESS{RESET}\n"));
    for d in &verdict.dimensions {
        out.push_str(&format!(
            "  {} {:<22} {:>5.1}  {DIM}{}{RESET}\n",
            mark(d.status == Status::Good),
            d.dimension.title(),
            d.score,
            d.detail
        ));
    }
    out.push('\n');

    // Recommendations
    out.push_str(&format!("{BOLD}RECOMMENDATIONS{RESET}\n"));
    for (i, rec) in verdict.recommendations.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, rec));
    }

    // Warnings
    let warning_count = reports.warning_count();
    if warning_count > 0 {
        out.push_str(&format!("\n{BOLD}WARNINGS{RESET} ({} total)\n", warning_count));
        for warning in reports.warnings().take(MAX_LISTED_WARNINGS) {
            out.push_str(&format!("  {DIM}{}{RESET}\n", warning));
        }
        if warning_count > MAX_LISTED_WARNINGS {
            out.push_str(&format!(
                "  {DIM}... and {} more{RESET}\n",
                warning_count - MAX_LISTED_WARNINGS
            ));
        }
    }

    out.push_str(&format!(
        "\n{DIM}Completed in {:.2}s{RESET}\n",
        record.run_info.duration_seconds
    ));

    Ok(out)
}
