//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates summaries suitable for:
//! - Pull request comments
//! - Release checklists
//! - Project wikis

use super::RunRecord;
use crate::scoring::{Status, Tier};
use anyhow::Result;

/// Render record as GitHub-flavored Markdown
pub fn render(record: &RunRecord) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(record));
    md.push('\n');

    md.push_str(&render_dimensions(record));
    md.push('\n');

    md.push_str(&render_metrics(record));
    md.push('\n');

    md.push_str(&render_recommendations(record));

    if record.reports.warning_count() > 0 {
        md.push('\n');
        md.push_str(&render_warnings(record));
    }

    md.push('\n');
    md.push_str(&render_footer(record));

    Ok(md)
}

fn render_header(record: &RunRecord) -> String {
    let verdict = &record.verdict;
    let tier_emoji = match verdict.tier {
        Tier::Ready => "🚀",
        Tier::AlmostReady => "✅",
        Tier::NeedsWork => "⚠️",
        Tier::NotReady => "❌",
    };

    format!(
        "# {} Release Readiness: {}\n\n\
         **Score:** {:.1}/100 &nbsp; **Tier:** `{}` ({})\n\n\
         **Project:** `{}`\n",
        tier_emoji,
        verdict.tier,
        verdict.overall_score,
        verdict.tier,
        verdict.tier_message,
        record.run_info.root
    )
}

fn render_dimensions(record: &RunRecord) -> String {
    let mut md = String::from("## Dimensions\n\n");
    md.push_str("| Dimension | Score | Threshold | Status | Detail |\n");
    md.push_str("|-----------|------:|----------:|--------|--------|\n");
    for d in &record.verdict.dimensions {
        let status = match d.status {
            Status::Good => "✅ GOOD",
            Status::NeedsImprovement => "❌ NEEDS_IMPROVEMENT",
        };
        md.push_str(&format!(
            "| {} | {:.1} | {:.0} | {} | {} |\n",
            d.dimension.title(),
            d.score,
            d.threshold,
            status,
            d.detail
        ));
    }
    md
}

fn render_metrics(record: &RunRecord) -> String {
    let r = &record.reports;
    let structure = &r.structure.metrics;
    let source = &r.source.metrics;
    let docs = &r.documentation.metrics;
    let build = &r.build.metrics;
    let tests = &r.tests.metrics;

    let mut md = String::from("## Key Metrics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    let mut row = |name: &str, value: String| {
        md.push_str(&format!("| {} | {} |\n", name, value));
    };

    row("Files in key directories", structure.total_files.to_string());
    row("Lines in key directories", structure.total_lines.to_string());
    row("Source units", source.total_units.to_string());
    row("Functions / classes", format!("{} / {}", source.total_functions, source.total_classes));
    row("Docstring coverage", format!("{:.1}%", source.docstring_coverage));
    row("Average file size", format!("{:.1} lines", source.average_file_size));
    row("Large files", source.large_files.len().to_string());
    row("Documentation completeness", format!("{:.1}%", docs.completeness_score));
    row("Packaged executables", build.executables.len().to_string());
    row("Test files", tests.total_test_files.to_string());
    row("Estimated coverage", format!("{:.1}%", tests.estimated_coverage));

    let facts = &record.external_facts;
    let outcome = |fact: Option<bool>| match fact {
        Some(true) => "passed".to_string(),
        Some(false) => "failed".to_string(),
        None => "unknown".to_string(),
    };
    if !facts.is_empty() {
        row("Packaging tool", outcome(facts.packaging_ok));
        row("Installer compiler", outcome(facts.installer_ok));
        row("Install probe", outcome(facts.install_probe_ok));
    }

    if !source.top_imports.is_empty() {
        md.push_str("\n<details>\n<summary>Top imports</summary>\n\n");
        for import in &source.top_imports {
            md.push_str(&format!("- `{}` ({})\n", import.module, import.count));
        }
        md.push_str("\n</details>\n");
    }

    md
}

fn render_recommendations(record: &RunRecord) -> String {
    let mut md = String::from("## Recommendations\n\n");
    for (i, rec) in record.verdict.recommendations.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    md
}

fn render_warnings(record: &RunRecord) -> String {
    let mut md = format!("## Warnings ({})\n\n", record.reports.warning_count());
    for warning in record.reports.warnings() {
        md.push_str(&format!("- {}\n", warning));
    }
    md
}

fn render_footer(record: &RunRecord) -> String {
    format!(
        "---\n\n*Generated by {} {} on {}*\n",
        record.run_info.tool,
        record.run_info.version,
        record.run_info.generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_record;

    #[test]
    fn test_markdown_render() {
        let record = test_record();
        let md = render(&record).expect("render markdown");
        assert!(md.starts_with("# "));
        assert!(md.contains("## Dimensions"));
        assert!(md.contains("| Core functionality |"));
        assert!(md.contains("## Recommendations"));
        assert!(md.contains("Generated by shipready"));
        assert!(md.contains("2024-03-09 14:05:07"));
    }

    #[test]
    fn test_markdown_has_six_dimension_rows() {
        let record = test_record();
        let md = render(&record).unwrap();
        let rows = md
            .lines()
            .filter(|l| l.contains("GOOD |") || l.contains("NEEDS_IMPROVEMENT |"))
            .count();
        assert_eq!(rows, 6);
    }
}
