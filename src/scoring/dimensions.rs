//! The six readiness dimensions and their scoring rules

use crate::analyzers::ReportSet;
use crate::models::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points for deployment files, scaled by the fraction present
const DEPLOYMENT_FILES_WEIGHT: f64 = 70.0;
/// Flat bonus when at least one packaged executable exists
const EXECUTABLE_BONUS: f64 = 30.0;

/// Average file size (lines) that scores 100 regardless of the band
const IDEAL_FILE_SIZE: f64 = 175.0;
const FILE_SIZE_BAND: (f64, f64) = (50.0, 300.0);

/// One readiness facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CoreFunctionality,
    DocumentationQuality,
    BuildSystem,
    TestCoverage,
    CodeQuality,
    DeploymentReadiness,
}

/// Score and explanation produced by a rule
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub score: f64,
    pub detail: String,
}

/// Fixed scoring rule for one dimension
pub struct DimensionRule {
    pub dimension: Dimension,
    /// GOOD iff score >= threshold
    pub threshold: f64,
    pub remediation: &'static str,
    pub measure: fn(&ReportSet) -> Measurement,
}

/// Declaration order is recommendation order
pub static RULES: [DimensionRule; 6] = [
    DimensionRule {
        dimension: Dimension::CoreFunctionality,
        threshold: 80.0,
        remediation: "Add the missing critical files",
        measure: core_functionality,
    },
    DimensionRule {
        dimension: Dimension::DocumentationQuality,
        threshold: 80.0,
        remediation: "Complete the project documentation",
        measure: documentation_quality,
    },
    DimensionRule {
        dimension: Dimension::BuildSystem,
        threshold: 80.0,
        remediation: "Finish the build system files",
        measure: build_system,
    },
    DimensionRule {
        dimension: Dimension::TestCoverage,
        threshold: 66.0,
        remediation: "Improve test coverage",
        measure: test_coverage,
    },
    DimensionRule {
        dimension: Dimension::CodeQuality,
        threshold: 70.0,
        remediation: "Improve code quality (docstrings, file structure)",
        measure: code_quality,
    },
    DimensionRule {
        dimension: Dimension::DeploymentReadiness,
        threshold: 80.0,
        remediation: "Prepare the distribution files and packaged executable",
        measure: deployment_readiness,
    },
];

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::CoreFunctionality,
        Dimension::DocumentationQuality,
        Dimension::BuildSystem,
        Dimension::TestCoverage,
        Dimension::CodeQuality,
        Dimension::DeploymentReadiness,
    ];

    pub fn rule(&self) -> &'static DimensionRule {
        // RULES is declared in the same order as ALL
        &RULES[*self as usize]
    }

    pub fn threshold(&self) -> f64 {
        self.rule().threshold
    }

    pub fn remediation(&self) -> &'static str {
        self.rule().remediation
    }

    pub fn measure(&self, reports: &ReportSet) -> Measurement {
        (self.rule().measure)(reports)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::CoreFunctionality => "core_functionality",
            Dimension::DocumentationQuality => "documentation_quality",
            Dimension::BuildSystem => "build_system",
            Dimension::TestCoverage => "test_coverage",
            Dimension::CodeQuality => "code_quality",
            Dimension::DeploymentReadiness => "deployment_readiness",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dimension::CoreFunctionality => "Core functionality",
            Dimension::DocumentationQuality => "Documentation quality",
            Dimension::BuildSystem => "Build system",
            Dimension::TestCoverage => "Test coverage",
            Dimension::CodeQuality => "Code quality",
            Dimension::DeploymentReadiness => "Deployment readiness",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// present / total × 100, or 0 for an empty requirement list
pub fn presence_ratio(present: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        present as f64 / total as f64 * 100.0
    }
}

/// 100 inside the comfortable band, otherwise distance from the ideal size
pub fn size_score(average_file_size: f64) -> f64 {
    let (low, high) = FILE_SIZE_BAND;
    if (low..=high).contains(&average_file_size) {
        100.0
    } else {
        (100.0 - (average_file_size - IDEAL_FILE_SIZE).abs()).max(0.0)
    }
}

fn core_functionality(reports: &ReportSet) -> Measurement {
    let m = &reports.structure.metrics;
    let present = m.critical_files_present();
    let total = m.critical_files.len();
    Measurement {
        score: round_to(presence_ratio(present, total), 1),
        detail: format!("{}/{} critical files present", present, total),
    }
}

fn documentation_quality(reports: &ReportSet) -> Measurement {
    let completeness = reports.documentation.metrics.completeness_score;
    Measurement {
        score: completeness,
        detail: format!("documentation completeness {:.1}%", completeness),
    }
}

fn build_system(reports: &ReportSet) -> Measurement {
    let m = &reports.build.metrics;
    let present = m.build_files_present();
    let total = m.build_files_total();
    Measurement {
        score: round_to(presence_ratio(present, total), 1),
        detail: format!("{}/{} build files present", present, total),
    }
}

fn test_coverage(reports: &ReportSet) -> Measurement {
    let m = &reports.tests.metrics;
    let present = m.scored_present();
    let total = m.scored_categories.len();
    Measurement {
        score: round_to(presence_ratio(present, total), 1),
        detail: format!("{}/{} test categories implemented", present, total),
    }
}

fn code_quality(reports: &ReportSet) -> Measurement {
    let m = &reports.source.metrics;
    let score = (m.docstring_coverage + size_score(m.average_file_size)) / 2.0;
    Measurement {
        score: round_to(score, 1),
        detail: format!(
            "docstring coverage {:.1}%, average file size {:.1} lines",
            m.docstring_coverage, m.average_file_size
        ),
    }
}

fn deployment_readiness(reports: &ReportSet) -> Measurement {
    let m = &reports.build.metrics;
    let present = m.distribution_files_present();
    let total = m.distribution_files.len();
    let files = presence_ratio(present, total) / 100.0 * DEPLOYMENT_FILES_WEIGHT;
    let bonus = if m.has_executable() { EXECUTABLE_BONUS } else { 0.0 };
    Measurement {
        score: round_to(files + bonus, 1),
        detail: format!(
            "{}/{} distribution files, executable {}",
            present,
            total,
            if m.has_executable() { "present" } else { "missing" }
        ),
    }
}
